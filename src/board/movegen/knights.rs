use super::super::types::{MoveList, Piece};
use super::super::Board;
use super::kings::DIAGONAL;

/// Knight jumps as (destination offset, leg offset).
pub(super) const KNIGHT_JUMPS: [((i32, i32), (i32, i32)); 8] = [
    ((1, 2), (0, 1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, -2), (0, -1)),
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
];

impl Board {
    pub(crate) fn knight_moves(&self, knight: Piece, captures_only: bool, out: &mut MoveList) {
        for ((df, dr), (lf, lr)) in KNIGHT_JUMPS {
            let Some(to) = knight.square.offset(df, dr) else {
                continue;
            };
            let leg_blocked = knight
                .square
                .offset(lf, lr)
                .is_some_and(|leg| self.bitlines.is_occupied(leg));
            if !leg_blocked {
                self.push_target(knight, to, captures_only, out);
            }
        }
    }

    pub(crate) fn bishop_moves(&self, bishop: Piece, captures_only: bool, out: &mut MoveList) {
        for (df, dr) in DIAGONAL {
            let Some(to) = bishop
                .square
                .offset(2 * df, 2 * dr)
                .filter(|sq| sq.on_own_side(bishop.team))
            else {
                continue;
            };
            let eye = bishop.square.offset(df, dr);
            if eye.is_some_and(|eye| !self.bitlines.is_occupied(eye)) {
                self.push_target(bishop, to, captures_only, out);
            }
        }
    }
}
