use std::sync::atomic::AtomicBool;

use serde::Deserialize;

use xiangqi_engine::board::{search, Board, SearchConfig, SearchState};
use xiangqi_engine::ucci::build_position;

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

fn coordinate_from_problem_moves(moves: &str) -> String {
    moves.replace('-', "")
}

fn is_checkmate(board: &mut Board) -> bool {
    board.in_check(board.team()) && board.generate_moves().is_empty()
}

fn load_problems() -> ProblemSet {
    let data = include_str!("data/problems.json");
    serde_json::from_str(data).expect("invalid problems.json")
}

#[test]
fn mate_in_one_suite() {
    let set = load_problems();
    for problem in set.problems.iter().filter(|p| p.kind == "Mate in One") {
        let mv = coordinate_from_problem_moves(&problem.moves);
        let mut board = build_position(Some(&problem.fen), &[mv]).unwrap();

        assert!(
            is_checkmate(&mut board),
            "mate in one failed for fen: {} move: {}",
            problem.fen,
            problem.moves
        );
    }
}

#[test]
fn mate_search_suite() {
    let set = load_problems();
    let mut failures = 0;

    for problem in &set.problems {
        let depth = match problem.kind.as_str() {
            "Mate in One" => 2,
            _ => continue,
        };

        let mut board = Board::from_fen(&problem.fen).unwrap();
        let mut state = SearchState::with_hash_level(16);
        let stop = AtomicBool::new(false);
        let result = search(&mut board, &mut state, SearchConfig::depth(depth), &stop).unwrap();

        let Some(best) = result.best_move else {
            failures += 1;
            eprintln!("Mismatch: type={} fen={} no move", problem.kind, problem.fen);
            continue;
        };
        let mut after = build_position(Some(&problem.fen), &[best.to_string()]).unwrap();
        if !is_checkmate(&mut after) {
            failures += 1;
            eprintln!(
                "Mismatch: type={} fen={} move={} not checkmate",
                problem.kind, problem.fen, best
            );
        }
    }

    assert_eq!(failures, 0, "mate search mismatches: {}", failures);
}
