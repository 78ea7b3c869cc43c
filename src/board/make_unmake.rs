use crate::zobrist::ZOBRIST;

use super::types::{Move, Piece, Square};
use super::Board;

impl Board {
    #[inline]
    fn index_at(&self, sq: Square) -> Option<u8> {
        self.index_map[sq.file() as usize][sq.rank() as usize]
    }

    #[inline]
    fn set_index(&mut self, sq: Square, index: Option<u8>) {
        self.index_map[sq.file() as usize][sq.rank() as usize] = index;
    }

    #[inline]
    fn toggle_piece_hash(&mut self, piece: &Piece, sq: Square) {
        let (key, lock) = ZOBRIST.piece(piece.team, piece.kind, sq);
        self.key ^= key;
        self.lock ^= lock;
    }

    #[inline]
    fn toggle_side_hash(&mut self) {
        let (key, lock) = ZOBRIST.side();
        self.key ^= key;
        self.lock ^= lock;
    }

    /// Play `mv`, which must be a legal move generated on this board.
    /// Outside the crate, moves are played through [`Board::play_move`],
    /// which checks legality first.
    ///
    /// The history entry is snapshotted from the board, not from `mv`.
    pub(crate) fn do_move(&mut self, mv: &Move) {
        let Some(mover_index) = self.index_at(mv.from) else {
            debug_assert!(false, "no piece on {}", mv.from);
            return;
        };
        let mover = self.pieces[mover_index as usize];
        debug_assert_eq!(mover.team, self.team, "moving an opponent piece");
        let captured = self.index_at(mv.to).map(|i| self.pieces[i as usize]);

        self.hash_stack.push((self.key, self.lock));

        self.toggle_piece_hash(&mover, mv.from);
        self.toggle_piece_hash(&mover, mv.to);
        self.scores[mover.team.index()] += self.evaluator.weight(mover.team, mover.kind, mv.to)
            - self.evaluator.weight(mover.team, mover.kind, mv.from);

        if let Some(victim) = captured {
            self.toggle_piece_hash(&victim, mv.to);
            self.scores[victim.team.index()] -=
                self.evaluator.weight(victim.team, victim.kind, mv.to);
            self.pieces[victim.index()].alive = false;
        }

        self.bitlines.clear(mv.from);
        self.bitlines.set(mv.to);
        self.set_index(mv.from, None);
        self.set_index(mv.to, Some(mover_index));
        self.pieces[mover_index as usize].square = mv.to;

        self.toggle_side_hash();
        self.team = self.team.opponent();
        self.distance += 1;

        let mut record = Move::new(mover, mv.to, captured);
        record.checking = mv.checking;
        self.history.push(Some(record));
    }

    /// Pass the turn. Undone by [`Board::undo_move`].
    pub fn do_null_move(&mut self) {
        self.hash_stack.push((self.key, self.lock));
        self.toggle_side_hash();
        self.team = self.team.opponent();
        self.distance += 1;
        self.history.push(None);
    }

    /// Revert the most recent `do_move` or `do_null_move`.
    ///
    /// Returns the undone move, or `None` for a null move or an empty
    /// history.
    pub fn undo_move(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        let Some((key, lock)) = self.hash_stack.pop() else {
            debug_assert!(false, "hash stack out of step with history");
            return None;
        };

        self.team = self.team.opponent();
        self.distance = self.distance.saturating_sub(1);
        self.key = key;
        self.lock = lock;

        let mv = entry?;
        let mover = mv.mover;

        self.pieces[mover.index()].square = mv.from;
        self.set_index(mv.from, Some(mover.index));
        self.bitlines.set(mv.from);
        self.scores[mover.team.index()] -= self.evaluator.weight(mover.team, mover.kind, mv.to)
            - self.evaluator.weight(mover.team, mover.kind, mv.from);

        match mv.captured {
            Some(victim) => {
                self.pieces[victim.index()].alive = true;
                self.set_index(mv.to, Some(victim.index));
                self.scores[victim.team.index()] +=
                    self.evaluator.weight(victim.team, victim.kind, mv.to);
            }
            None => {
                self.set_index(mv.to, None);
                self.bitlines.clear(mv.to);
            }
        }

        Some(mv)
    }

    /// Flag the last move as check-giving.
    pub(crate) fn mark_last_move_checking(&mut self) {
        if let Some(Some(last)) = self.history.last_mut() {
            last.checking = true;
        }
    }
}
