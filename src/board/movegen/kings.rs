use super::super::types::{Move, MoveList, Piece, Square};
use super::super::Board;

pub(super) const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(super) const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl Board {
    pub(crate) fn king_moves(&self, king: Piece, captures_only: bool, out: &mut MoveList) {
        for (df, dr) in ORTHOGONAL {
            if let Some(to) = palace_step(king, df, dr) {
                self.push_target(king, to, captures_only, out);
            }
        }
        // Facing kings: the king may capture straight down an open file.
        if let Some(enemy) = self.king(king.team.opponent()) {
            if enemy.square.file() == king.square.file()
                && self.bitlines.count_between(king.square, enemy.square) == Some(0)
            {
                out.push(Move::new(king, enemy.square, Some(enemy)));
            }
        }
    }

    pub(crate) fn guard_moves(&self, guard: Piece, captures_only: bool, out: &mut MoveList) {
        for (df, dr) in DIAGONAL {
            if let Some(to) = palace_step(guard, df, dr) {
                self.push_target(guard, to, captures_only, out);
            }
        }
    }
}

#[inline]
fn palace_step(piece: Piece, df: i32, dr: i32) -> Option<Square> {
    piece
        .square
        .offset(df, dr)
        .filter(|sq| sq.in_palace(piece.team))
}
