use super::SearchContext;
use crate::board::search::INF;
use crate::board::sort_moves;

impl SearchContext<'_> {
    /// Quiescence search: captures only, or every evasion when in check.
    ///
    /// `left` bounds the remaining plies; once in check it is capped at
    /// `quiescence_check_extend`.
    pub fn quiesce(&mut self, mut alpha: i32, mut beta: i32, left: i32) -> i32 {
        let team = self.board.team();
        if !self.board.has_king(team) {
            return -INF + self.distance();
        }
        self.nodes += 1;
        if left <= 0 {
            return self.evaluate();
        }
        if let Some(value) = self.enter_node(&mut alpha, &mut beta) {
            return value;
        }

        let in_check = self.board.in_check(team);
        let mut best_value = -INF;
        let (moves, left) = if in_check {
            let mut moves = self.board.generate_moves();
            sort_moves(&mut moves);
            (moves, left.min(self.state.params.quiescence_check_extend))
        } else {
            let stand_pat = self.evaluate();
            if stand_pat >= beta {
                return stand_pat;
            }
            best_value = stand_pat;
            if stand_pat > alpha {
                alpha = stand_pat;
            }
            let mut moves = self.board.generate_captures();
            sort_moves(&mut moves);
            (moves, left)
        };

        for mv in &moves {
            self.board.do_move(mv);
            let value = -self.quiesce(-beta, -alpha, left - 1);
            self.board.undo_move();

            if value > best_value {
                best_value = value;
                if value >= beta {
                    return value;
                }
                if value > alpha {
                    alpha = value;
                }
            }
        }

        if best_value == -INF {
            -INF + self.distance()
        } else {
            best_value
        }
    }
}
