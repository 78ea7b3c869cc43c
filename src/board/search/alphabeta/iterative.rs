use log::{debug, info};

use super::SearchContext;
use crate::board::search::move_order::order_moves;
use crate::board::search::{SearchIterationInfo, SearchResult, BAN, INF};
use crate::board::MoveKey;

impl SearchContext<'_> {
    /// Iterative deepening over the root move list.
    ///
    /// Each iteration runs to completion unless stopped at a root-move
    /// boundary; an abandoned iteration leaves the previous result intact.
    pub fn iterative_deepening(&mut self, max_depth: u32, banned: &[MoveKey]) -> SearchResult {
        let mut moves = self.board.generate_moves();
        moves.retain(|mv| !banned.contains(&mv.key()));
        let team = self.board.team();
        order_moves(&mut moves, &self.state.tables.history, team);
        self.root_moves = moves;

        let mut result = SearchResult {
            best_move: None,
            score: -INF,
            depth: 0,
            from_book: false,
        };
        if self.root_moves.is_empty() {
            debug!("no legal root move for {team}");
            return result;
        }

        let divisor = self.state.params.iteration_time_divisor.max(1);
        for depth in 1..=max_depth {
            if self.should_abort() {
                break;
            }
            let Some(score) = self.search_root(depth as i32) else {
                debug!("depth {depth} abandoned");
                break;
            };
            self.completed_depth = depth;
            let best = self.root_moves[0];
            result = SearchResult {
                best_move: Some(best),
                score,
                depth,
                from_book: false,
            };
            self.state.stats.depth = depth;

            let elapsed = self.start_time.elapsed().as_millis() as u64;
            let nps = if elapsed > 0 {
                self.nodes * 1000 / elapsed
            } else {
                0
            };
            info!(
                "depth {depth} score {score} move {best} nodes {} time {elapsed}ms",
                self.nodes
            );
            if let Some(cb) = &self.info_callback {
                cb(&SearchIterationInfo {
                    depth,
                    nodes: self.nodes,
                    nps,
                    time_ms: elapsed,
                    score,
                    best_move: best.key(),
                });
            }

            if score.abs() >= BAN {
                break;
            }
            if self.time_limit_ms > 0 && elapsed >= self.time_limit_ms / divisor {
                break;
            }
        }

        result
    }
}
