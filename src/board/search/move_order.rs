//! Move ordering utilities for search.

use super::HistoryTable;
use crate::board::{sort_moves, Move, MoveClass, Team};

/// Tag quiet moves with their history score and sort the list.
///
/// Captures keep the exchange score assigned at generation, so they stay
/// ahead of every quiet move; quiet moves follow by history, best first.
pub fn order_moves(moves: &mut [Move], history: &HistoryTable, team: Team) {
    for mv in moves.iter_mut() {
        if mv.class() == MoveClass::Normal {
            let score = history.score(team, mv.key());
            if score > 0 {
                mv.set_order(MoveClass::History, score);
            }
        }
    }
    sort_moves(moves);
}

/// Re-sort root moves after an iteration: `best` first, the rest by history.
pub fn reorder_root(moves: &mut Vec<Move>, best: usize, history: &HistoryTable, team: Team) {
    if best >= moves.len() {
        return;
    }
    let best_move = moves.remove(best);
    moves.sort_by_key(|mv| std::cmp::Reverse(history.score(team, mv.key())));
    moves.insert(0, best_move);
}
