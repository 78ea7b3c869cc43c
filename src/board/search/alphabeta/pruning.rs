use log::trace;

use super::SearchContext;
use crate::board::search::{BAN, INF};

impl SearchContext<'_> {
    /// Narrow the window to the mate scores still reachable at this
    /// distance; returns a value if the window closes.
    pub(super) fn mate_distance_pruning(&self, alpha: &mut i32, beta: &mut i32) -> Option<i32> {
        let distance = self.distance();
        let best_possible = INF - distance;
        if best_possible < *beta {
            *beta = best_possible;
            if *alpha >= best_possible {
                return Some(best_possible);
            }
        }
        let worst_possible = -INF + distance;
        if worst_possible > *alpha {
            *alpha = worst_possible;
            if worst_possible >= *beta {
                return Some(worst_possible);
            }
        }
        None
    }

    /// Pass the turn and search reduced; a fail high means the real moves
    /// will fail high too. Only tried with enough major material on board,
    /// and verified by a reduced real search when that material is thin.
    pub(super) fn null_move_pruning(&mut self, depth: i32, beta: i32) -> Option<i32> {
        let params = &self.state.params;
        if !params.null_move {
            return None;
        }
        let weight = self.board.major_weight(self.board.team());
        if weight < params.null_okay_weight {
            return None;
        }
        let reduced = depth - 1 - params.null_reduction;
        let safe = weight >= params.null_safe_weight;

        self.board.do_null_move();
        let value = -self.search_cut(reduced, 1 - beta, true);
        self.board.undo_move();

        if value < beta {
            return None;
        }
        // A pass never proves a forced win.
        let value = if value >= BAN { beta } else { value };
        if safe {
            trace!("null move cutoff at depth {depth}");
            return Some(value);
        }
        let verified = self.search_cut(reduced, beta, true);
        (verified >= beta).then_some(verified)
    }

    /// Predict the deep result from a shallow search; cut when the shallow
    /// value clears the predicted bound with confidence `mpc_t`.
    pub(super) fn multi_prob_cut(&mut self, depth: i32, beta: i32) -> Option<i32> {
        let params = &self.state.params;
        if !params.multi_prob_cut || depth < params.mpc_min_depth || depth % 4 != 0 {
            return None;
        }
        let a = params.mpc_a;
        let b = params.mpc_b * params.mpc_scale;
        let sigma = params.mpc_sigma * params.mpc_scale;
        let t = params.mpc_t;
        let alpha = beta - 1;
        let upper = ((t * sigma + f64::from(beta) - b) / a) as i32;
        let lower = ((-t * sigma + f64::from(alpha) - b) / a) as i32;

        if upper.abs() < BAN && self.search_cut(depth - 2, upper, false) >= upper {
            return Some(beta);
        }
        if lower.abs() < BAN && self.search_cut(depth - 2, lower + 1, false) <= lower {
            return Some(alpha);
        }
        None
    }
}
