use super::super::types::{MoveList, Piece};
use super::super::Board;

impl Board {
    pub(crate) fn pawn_moves(&self, pawn: Piece, captures_only: bool, out: &mut MoveList) {
        if let Some(to) = pawn.square.offset(0, pawn.team.forward()) {
            self.push_target(pawn, to, captures_only, out);
        }
        if pawn.square.crossed_river(pawn.team) {
            for df in [-1, 1] {
                if let Some(to) = pawn.square.offset(df, 0) {
                    self.push_target(pawn, to, captures_only, out);
                }
            }
        }
    }
}
