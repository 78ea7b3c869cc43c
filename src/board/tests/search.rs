//! Search algorithm tests.
//!
//! Tests for alpha-beta against a plain minimax, mate handling, banned
//! moves and time limits.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::board::search::{search, SearchConfig, SearchParams, SearchState, BAN, INF};
use crate::board::{Board, PieceGrid, SearchError, SearchIterationInfo, StaticEvaluator, Team};

/// A quiet endgame small enough for an unpruned minimax.
const SPARSE: &str = "3ak4/9/2n6/p3p4/9/2P3N2/9/9/4A4/3K5 w - - 0 1";
/// RED mates with i0i9.
const MATE_IN_ONE: &str = "4k4/9/4P4/9/9/9/9/9/9/3K4R w - - 0 1";
/// Kings only: no captures and no checks anywhere in the tree.
const BARE_KINGS: &str = "4k4/9/9/9/9/9/9/9/9/3K5 w - - 0 1";

/// Scores every position the same for the side to move.
struct ConstantEvaluator(i32);

impl StaticEvaluator for ConstantEvaluator {
    fn evaluate(&self, _grid: &PieceGrid, _side: Team) -> i32 {
        self.0
    }
}

// ============================================================================
// Reference minimax
// ============================================================================

fn reference_quiesce(board: &mut Board, left: i32, params: &SearchParams) -> i32 {
    let team = board.team();
    let distance = board.distance() as i32;
    if !board.has_king(team) {
        return -INF + distance;
    }
    if left <= 0 {
        return board.evaluate();
    }
    let in_check = board.in_check(team);
    let (moves, left, mut best) = if in_check {
        (
            board.generate_moves(),
            left.min(params.quiescence_check_extend),
            -INF,
        )
    } else {
        (board.generate_captures(), left, board.evaluate())
    };
    for mv in &moves {
        board.do_move(mv);
        best = best.max(-reference_quiesce(board, left - 1, params));
        board.undo_move();
    }
    if best == -INF {
        -INF + distance
    } else {
        best
    }
}

fn reference_negamax(board: &mut Board, depth: i32, params: &SearchParams) -> i32 {
    let distance = board.distance() as i32;
    if !board.has_king(board.team()) {
        return -INF + distance;
    }
    if depth <= 0 {
        return reference_quiesce(board, params.quiescence_extend, params);
    }
    let moves = board.generate_moves();
    if moves.is_empty() {
        return -INF + distance;
    }
    let mut best = -INF;
    for mv in &moves {
        board.do_move(mv);
        best = best.max(-reference_negamax(board, depth - 1, params));
        board.undo_move();
    }
    best
}

// ============================================================================
// Alpha-beta search tests
// ============================================================================

#[test]
fn alphabeta_matches_minimax_without_pruning() {
    let params = SearchParams::exhaustive();
    for depth in 1..=3u32 {
        let mut board = Board::from_fen(SPARSE).unwrap();
        let expected = reference_negamax(&mut board, depth as i32, &params);

        let mut state = SearchState::with_hash_level(14);
        state.set_params(params.clone());
        let stop = AtomicBool::new(false);
        let result = search(&mut board, &mut state, SearchConfig::depth(depth), &stop).unwrap();
        assert_eq!(result.depth, depth);
        assert_eq!(result.score, expected, "depth {depth}");
        assert_eq!(board.to_fen(), SPARSE, "search must leave the board as found");
    }
}

#[test]
fn installed_evaluator_scores_the_leaves() {
    let params = SearchParams::exhaustive();
    let mut board = Board::from_fen(BARE_KINGS).unwrap();
    let mut state = SearchState::with_hash_level(12);
    state.set_params(params.clone());
    let constant: Arc<dyn StaticEvaluator> = Arc::new(ConstantEvaluator(7));
    state.set_evaluator(Some(constant));
    let stop = AtomicBool::new(false);

    let result = search(&mut board, &mut state, SearchConfig::depth(2), &stop).unwrap();
    assert_eq!(result.score, 7);
    assert!(state.stats.root_values.iter().all(|&(_, value)| value == 7));

    // Back to the board's own evaluation.
    state.set_evaluator(None);
    let expected = reference_negamax(&mut board, 2, &params);
    let result = search(&mut board, &mut state, SearchConfig::depth(2), &stop).unwrap();
    assert_eq!(result.score, expected);
}

#[test]
fn root_values_cover_every_move() {
    let mut board = Board::from_fen(SPARSE).unwrap();
    let mut state = SearchState::with_hash_level(14);
    state.set_params(SearchParams::exhaustive());
    let stop = AtomicBool::new(false);
    let result = search(&mut board, &mut state, SearchConfig::depth(1), &stop).unwrap();

    let legal = board.generate_moves().len();
    assert_eq!(state.stats.root_values.len(), legal);
    let best = state
        .stats
        .root_values
        .iter()
        .map(|&(_, value)| value)
        .max()
        .unwrap();
    assert_eq!(best, result.score);
}

#[test]
fn pruned_search_returns_legal_move() {
    let mut board = Board::new();
    let mut state = SearchState::with_hash_level(16);
    let stop = AtomicBool::new(false);
    let result = search(&mut board, &mut state, SearchConfig::depth(4), &stop).unwrap();
    let best = result.best_move.unwrap();
    assert!(board.generate_moves().contains(&best));
    assert!(result.score.abs() < BAN);
    assert!(state.stats.nodes > 0);
}

#[test]
fn search_is_repeatable() {
    let mut board = Board::new();
    let stop = AtomicBool::new(false);
    let mut state = SearchState::with_hash_level(14);
    let first = search(&mut board, &mut state, SearchConfig::depth(3), &stop).unwrap();
    let second = search(&mut board, &mut state, SearchConfig::depth(3), &stop).unwrap();
    assert_eq!(first, second);
}

#[test]
fn alphabeta_finds_mate_in_one() {
    // Rook to the back rank: the pawn covers e8 and the facing king d9.
    let mut board = Board::from_fen(MATE_IN_ONE).unwrap();
    let mut state = SearchState::with_hash_level(14);
    let stop = AtomicBool::new(false);
    let result = search(&mut board, &mut state, SearchConfig::depth(3), &stop).unwrap();
    assert_eq!(result.best_move.unwrap().to_string(), "i0i9");
    assert!(result.score >= BAN, "expected a mate score, got {}", result.score);
}

#[test]
fn checkmated_side_has_no_move() {
    let mut board = Board::from_fen("4k3R/9/4P4/9/9/9/9/9/9/3K5 b - - 0 1").unwrap();
    let mut state = SearchState::with_hash_level(14);
    let stop = AtomicBool::new(false);
    let result = search(&mut board, &mut state, SearchConfig::depth(2), &stop).unwrap();
    assert!(result.best_move.is_none());
    assert_eq!(result.score, -INF);
}

#[test]
fn missing_king_is_an_error() {
    let mut board = Board::from_fen("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1").unwrap();
    board.apply_move("e0e9").unwrap();
    let mut state = SearchState::with_hash_level(14);
    let stop = AtomicBool::new(false);
    let err = search(&mut board, &mut state, SearchConfig::depth(2), &stop).unwrap_err();
    assert_eq!(err, SearchError::MissingKing(Team::Black));
}

#[test]
fn banned_moves_are_not_chosen() {
    let mut board = Board::from_fen(MATE_IN_ONE).unwrap();
    let mate = board.parse_move("i0i9").unwrap().key();
    let mut state = SearchState::with_hash_level(14);
    let stop = AtomicBool::new(false);
    let config = SearchConfig::depth(2).with_banned(vec![mate]);
    let result = search(&mut board, &mut state, config, &stop).unwrap();
    assert_ne!(result.best_move.unwrap().key(), mate);
}

#[test]
fn banning_every_move_leaves_nothing() {
    let mut board = Board::from_fen("4k4/9/9/9/9/9/9/9/4N4/4K4 w - - 0 1").unwrap();
    let banned = board.generate_moves().iter().map(|mv| mv.key()).collect();
    let mut state = SearchState::with_hash_level(14);
    let stop = AtomicBool::new(false);
    let config = SearchConfig::depth(2).with_banned(banned);
    let result = search(&mut board, &mut state, config, &stop).unwrap();
    assert!(result.best_move.is_none());
}

#[test]
fn iterations_are_reported_in_order() {
    let mut board = Board::new();
    let mut state = SearchState::with_hash_level(14);
    let stop = AtomicBool::new(false);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = SearchConfig::depth(3).with_info_callback(Arc::new(
        move |info: &SearchIterationInfo| {
            sink.lock().unwrap().push(info.depth);
        },
    ));
    let result = search(&mut board, &mut state, config, &stop).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(result.depth, 3);
}

#[test]
fn stop_flag_keeps_first_iteration() {
    let mut board = Board::new();
    let mut state = SearchState::with_hash_level(14);
    // Already stopped: depth 1 still completes.
    let stop = AtomicBool::new(true);
    let result = search(&mut board, &mut state, SearchConfig::depth(10), &stop).unwrap();
    assert_eq!(result.depth, 1);
    assert!(result.best_move.is_some());
}

#[test]
fn time_limit_is_respected() {
    let mut board = Board::new();
    let mut state = SearchState::with_hash_level(16);
    let stop = AtomicBool::new(false);
    let start = Instant::now();
    let result = search(&mut board, &mut state, SearchConfig::time(200), &stop).unwrap();
    assert!(result.best_move.is_some());
    assert!(start.elapsed().as_millis() < 5_000);
}
