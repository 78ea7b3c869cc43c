//! Core search implementation.
//!
//! This module implements:
//! - Root search over a persistent, re-ordered root move list
//! - Principal-variation nodes with full windows and PVS re-search
//! - Cut nodes searched with a null window around `beta`
//! - Null move pruning with verification, multi-prob-cut
//! - Internal iterative deepening for PV nodes without a hash move
//! - Mate distance pruning and repetition detection
//! - Quiescence search with check extension

mod iterative;
mod pruning;
mod quiescence;
mod repetition;

pub use repetition::{detect as detect_repetition, Repetition};

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::trace;

use super::move_order::{order_moves, reorder_root};
use super::{SearchInfoCallback, SearchState, INF};
use crate::board::{Board, Move, MoveClass, MoveKey, MoveList, MAX_PLY};
use crate::tt::BoundType;

/// Search context for a single search
pub(crate) struct SearchContext<'a> {
    pub board: &'a mut Board,
    pub state: &'a mut SearchState,
    pub stop: &'a AtomicBool,
    pub start_time: Instant,
    pub time_limit_ms: u64,
    pub nodes: u64,
    /// Deepest fully searched iteration; 0 until the first one completes.
    pub completed_depth: u32,
    /// Legal, non-banned root moves, best of the last iteration first.
    pub root_moves: MoveList,
    pub info_callback: Option<SearchInfoCallback>,
}

/// Where the moves of a node come from, in the order they are tried.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Hash,
    Killers,
    Generated,
}

const STAGES: [Stage; 3] = [Stage::Hash, Stage::Killers, Stage::Generated];

impl SearchContext<'_> {
    #[inline]
    fn distance(&self) -> i32 {
        self.board.distance() as i32
    }

    /// Leaf evaluation from the side to move's point of view.
    fn evaluate(&self) -> i32 {
        match &self.state.evaluator {
            Some(evaluator) => evaluator.evaluate(&self.board.grid(), self.board.team()),
            None => self.board.evaluate(),
        }
    }

    /// Whether the current iteration must be abandoned. Never true before
    /// the first iteration has completed.
    fn should_abort(&self) -> bool {
        if self.completed_depth == 0 {
            return false;
        }
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        self.time_limit_ms > 0
            && self.start_time.elapsed().as_millis() as u64 >= self.time_limit_ms
    }

    /// The first still-legal move remembered by the transposition table.
    fn hash_move(&mut self) -> Option<Move> {
        let keys = self
            .state
            .tables
            .tt
            .probe_moves(self.board.key(), self.board.lock());
        let mut mv = keys
            .into_iter()
            .find_map(|key| self.board.validate_move(key))?;
        mv.set_order(MoveClass::Hash, 0);
        Some(mv)
    }

    /// Still-legal killers for the current distance from the root.
    fn killer_moves(&mut self) -> Vec<Move> {
        let ply = self.board.distance();
        let killers = self.state.tables.killers.killers(ply);
        killers
            .into_iter()
            .flatten()
            .filter_map(|key| self.board.validate_move(key))
            .map(|mut mv| {
                mv.set_order(MoveClass::Killer, 0);
                mv
            })
            .collect()
    }

    /// All legal moves, captures first, quiet moves by history.
    fn ordered_moves(&mut self) -> MoveList {
        let mut moves = self.board.generate_moves();
        let team = self.board.team();
        order_moves(&mut moves, &self.state.tables.history, team);
        moves
    }

    fn stage_moves(&mut self, stage: Stage, hash_move: Option<Move>) -> Vec<Move> {
        match stage {
            Stage::Hash => hash_move.into_iter().collect(),
            Stage::Killers => self.killer_moves(),
            Stage::Generated => self.ordered_moves(),
        }
    }

    /// Record the outcome of a node in the history, killer and hash tables.
    fn record(&mut self, best: &Move, bound: BoundType, depth: i32, value: i32) {
        let team = self.board.team();
        let tables = &mut self.state.tables;
        tables.history.update(team, best.key(), depth);
        if bound != BoundType::UpperBound && !best.is_capture() {
            tables.killers.update(self.board.distance(), best.key());
        }
        tables.tt.store(
            self.board.key(),
            self.board.lock(),
            self.board.distance(),
            bound,
            depth,
            value,
            Some(best.key()),
        );
    }

    /// Common node prologue after the king check: mate distance pruning,
    /// check marking and repetition scoring.
    fn enter_node(&mut self, alpha: &mut i32, beta: &mut i32) -> Option<i32> {
        if let Some(value) = self.mate_distance_pruning(alpha, beta) {
            return Some(value);
        }
        if self.board.in_check(self.board.team()) {
            self.board.mark_last_move_checking();
        }
        if self.board.distance() >= MAX_PLY - 1 {
            return Some(self.evaluate());
        }
        self.repetition_value()
    }

    /// Search every root move once at `depth`.
    ///
    /// Returns `None` if the iteration was abandoned; the root list is then
    /// left in its previous order.
    pub(super) fn search_root(&mut self, depth: i32) -> Option<i32> {
        let mut best_value = -INF;
        let mut best_index = None;
        let mut root_values = Vec::with_capacity(self.root_moves.len());

        for i in 0..self.root_moves.len() {
            if i > 0 && self.should_abort() {
                return None;
            }
            let mv = self.root_moves[i];
            self.board.do_move(&mv);
            let value = if best_index.is_none() {
                -self.search_pv(depth - 1, -INF, INF)
            } else {
                let value = -self.search_cut(depth - 1, -best_value, false);
                if value > best_value {
                    -self.search_pv(depth - 1, -INF, -best_value)
                } else {
                    value
                }
            };
            self.board.undo_move();
            trace!("root {} depth {} value {}", mv, depth, value);

            root_values.push((mv.key(), value));
            if value > best_value {
                best_value = value;
                best_index = Some(i);
            }
        }

        let best = best_index?;
        let best_move = self.root_moves[best];
        self.record(&best_move, BoundType::Exact, depth, best_value);
        let team = self.board.team();
        reorder_root(&mut self.root_moves, best, &self.state.tables.history, team);
        self.state.stats.root_values = root_values;
        Some(best_value)
    }

    /// Full-window search of a node on the principal variation.
    pub(super) fn search_pv(&mut self, depth: i32, mut alpha: i32, mut beta: i32) -> i32 {
        if !self.board.has_king(self.board.team()) {
            return -INF + self.distance();
        }
        if depth <= 0 {
            let left = self.state.params.quiescence_extend;
            return self.quiesce(alpha, beta, left);
        }
        self.nodes += 1;
        if let Some(value) = self.enter_node(&mut alpha, &mut beta) {
            return value;
        }

        let mut hash_move = self.hash_move();
        if hash_move.is_none()
            && self.state.params.internal_iterative
            && depth >= self.state.params.iid_min_depth
        {
            self.search_pv(depth / 2, alpha, beta);
            hash_move = self.hash_move();
        }

        let mut best_value = -INF;
        let mut best_move: Option<Move> = None;
        let mut bound = BoundType::UpperBound;
        let mut tried: Vec<MoveKey> = Vec::with_capacity(3);

        'stages: for stage in STAGES {
            let moves = self.stage_moves(stage, hash_move);
            for mv in moves {
                let key = mv.key();
                if tried.contains(&key) {
                    continue;
                }
                if stage != Stage::Generated {
                    tried.push(key);
                }

                self.board.do_move(&mv);
                let value = if best_move.is_none() {
                    -self.search_pv(depth - 1, -beta, -alpha)
                } else {
                    let value = -self.search_cut(depth - 1, -alpha, false);
                    if value > alpha && value < beta {
                        -self.search_pv(depth - 1, -beta, -alpha)
                    } else {
                        value
                    }
                };
                self.board.undo_move();

                if value > best_value || best_move.is_none() {
                    best_value = value;
                    best_move = Some(mv);
                    if value >= beta {
                        bound = BoundType::LowerBound;
                        break 'stages;
                    }
                    if value > alpha {
                        alpha = value;
                        bound = BoundType::Exact;
                    }
                }
            }
        }

        let Some(best) = best_move else {
            return -INF + self.distance();
        };
        self.record(&best, bound, depth, best_value);
        best_value
    }

    /// Null-window search: is the node worth at least `beta`?
    pub(super) fn search_cut(&mut self, depth: i32, beta: i32, ban_null: bool) -> i32 {
        let team = self.board.team();
        if !self.board.has_king(team) {
            return -INF + self.distance();
        }
        if let Some(value) = self.state.tables.tt.probe_value(
            self.board.key(),
            self.board.lock(),
            self.board.distance(),
            depth,
            beta - 1,
            beta,
        ) {
            self.state.stats.tt_hits += 1;
            return value;
        }
        if depth <= 0 {
            let left = self.state.params.quiescence_extend;
            return self.quiesce(beta - 1, beta, left);
        }
        self.nodes += 1;
        let (mut alpha, mut window_beta) = (beta - 1, beta);
        if let Some(value) = self.enter_node(&mut alpha, &mut window_beta) {
            return value;
        }

        let in_check = self.board.in_check(team);
        if !ban_null && !in_check {
            if let Some(value) = self.null_move_pruning(depth, beta) {
                return value;
            }
        }
        if !in_check {
            if let Some(value) = self.multi_prob_cut(depth, beta) {
                return value;
            }
        }

        let hash_move = self.hash_move();
        let mut best_value = -INF;
        let mut best_move: Option<Move> = None;
        let mut tried: Vec<MoveKey> = Vec::with_capacity(3);

        'stages: for stage in STAGES {
            let moves = self.stage_moves(stage, hash_move);
            for mv in moves {
                let key = mv.key();
                if tried.contains(&key) {
                    continue;
                }
                if stage != Stage::Generated {
                    tried.push(key);
                }

                self.board.do_move(&mv);
                let value = -self.search_cut(depth - 1, 1 - beta, false);
                self.board.undo_move();

                if value > best_value || best_move.is_none() {
                    best_value = value;
                    best_move = Some(mv);
                    if value >= beta {
                        break 'stages;
                    }
                }
            }
        }

        let Some(best) = best_move else {
            return -INF + self.distance();
        };
        let bound = if best_value >= beta {
            BoundType::LowerBound
        } else {
            BoundType::UpperBound
        };
        self.record(&best, bound, depth, best_value);
        best_value
    }
}
