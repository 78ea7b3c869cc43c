//! Legal move generation.
//!
//! Each piece family has its own pseudo-legal generator; the results are
//! filtered by playing each candidate and rejecting those that leave the
//! mover's king attacked.

mod attacks;
mod kings;
mod knights;
mod pawns;
mod sliders;

use super::types::{Move, MoveKey, MoveList, Piece, PieceKind, Square};
use super::Board;

impl Board {
    /// Add a move to `to` unless it lands on a friendly piece.
    #[inline]
    fn push_target(&self, mover: Piece, to: Square, captures_only: bool, out: &mut MoveList) {
        match self.piece_at(to) {
            Some(target) if target.team == mover.team => {}
            Some(target) => out.push(Move::new(mover, to, Some(target))),
            None if !captures_only => out.push(Move::new(mover, to, None)),
            None => {}
        }
    }

    /// Pseudo-legal moves of one piece.
    pub(crate) fn piece_moves(&self, piece: Piece, captures_only: bool, out: &mut MoveList) {
        match piece.kind {
            PieceKind::King => self.king_moves(piece, captures_only, out),
            PieceKind::Guard => self.guard_moves(piece, captures_only, out),
            PieceKind::Bishop => self.bishop_moves(piece, captures_only, out),
            PieceKind::Knight => self.knight_moves(piece, captures_only, out),
            PieceKind::Rook => self.rook_moves(piece, captures_only, out),
            PieceKind::Cannon => self.cannon_moves(piece, captures_only, out),
            PieceKind::Pawn => self.pawn_moves(piece, captures_only, out),
        }
    }

    fn generate(&mut self, captures_only: bool) -> MoveList {
        let mut moves = MoveList::with_capacity(if captures_only { 16 } else { 64 });
        for index in 0..self.pieces.len() {
            let piece = self.pieces[index];
            if piece.alive && piece.team == self.team {
                self.piece_moves(piece, captures_only, &mut moves);
            }
        }
        moves.retain(|mv| self.is_king_safe_after(mv));
        moves
    }

    /// All legal moves for the side to move.
    pub fn generate_moves(&mut self) -> MoveList {
        self.generate(false)
    }

    /// Legal captures for the side to move.
    pub fn generate_captures(&mut self) -> MoveList {
        self.generate(true)
    }

    /// Legal moves of the piece on `sq`. Empty if the point is empty or
    /// holds an opponent piece.
    pub fn moves_from(&mut self, sq: Square) -> MoveList {
        let mut moves = MoveList::new();
        if let Some(piece) = self.piece_at(sq).filter(|p| p.team == self.team) {
            self.piece_moves(piece, false, &mut moves);
            moves.retain(|mv| self.is_king_safe_after(mv));
        }
        moves
    }

    /// Rebuild a legal move from a remembered key, if it is still legal.
    pub fn validate_move(&mut self, key: MoveKey) -> Option<Move> {
        let piece = self.piece_at(key.from).filter(|p| p.team == self.team)?;
        let mut moves = MoveList::new();
        self.piece_moves(piece, false, &mut moves);
        let mv = moves.into_iter().find(|mv| mv.to == key.to)?;
        self.is_king_safe_after(&mv).then_some(mv)
    }

    fn is_king_safe_after(&mut self, mv: &Move) -> bool {
        // Taking the king ends the game, whatever then attacks our own.
        if mv.captured.is_some_and(|victim| victim.kind == PieceKind::King) {
            return true;
        }
        let team = self.team;
        self.do_move(mv);
        let safe = !self.in_check(team);
        self.undo_move();
        safe
    }

    /// Count leaf nodes of the legal move tree.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in &moves {
            self.do_move(mv);
            nodes += self.perft(depth - 1);
            self.undo_move();
        }
        nodes
    }
}
