//! Zobrist hashing for Xiangqi positions.
//!
//! Two independent 32-bit tables are kept: the key picks the transposition
//! bucket, the lock verifies it.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{PieceGrid, PieceKind, Square, Team, BOARD_POINTS};

const PIECE_SLOTS: usize = 14;

pub(crate) struct ZobristKeys {
    // keys[team * 7 + kind][square_index]
    keys: [[u32; BOARD_POINTS]; PIECE_SLOTS],
    locks: [[u32; BOARD_POINTS]; PIECE_SLOTS],
    black_to_move_key: u32,
    black_to_move_lock: u32,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x5851_4951_u64);
        let mut keys = [[0; BOARD_POINTS]; PIECE_SLOTS];
        let mut locks = [[0; BOARD_POINTS]; PIECE_SLOTS];

        for (key_row, lock_row) in keys.iter_mut().zip(locks.iter_mut()) {
            for (key, lock) in key_row.iter_mut().zip(lock_row.iter_mut()) {
                *key = rng.gen();
                *lock = rng.gen();
            }
        }

        ZobristKeys {
            keys,
            locks,
            black_to_move_key: rng.gen(),
            black_to_move_lock: rng.gen(),
        }
    }

    /// (key, lock) contribution of one piece on one square.
    #[inline]
    pub(crate) fn piece(&self, team: Team, kind: PieceKind, sq: Square) -> (u32, u32) {
        let slot = team.index() * 7 + kind.index();
        (self.keys[slot][sq.index()], self.locks[slot][sq.index()])
    }

    #[inline]
    pub(crate) fn side(&self) -> (u32, u32) {
        (self.black_to_move_key, self.black_to_move_lock)
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// Hash a placement from scratch, optionally mirrored left-right.
#[must_use]
pub fn hash_grid(grid: &PieceGrid, side: Team, mirrored: bool) -> (u32, u32) {
    let mut key = 0u32;
    let mut lock = 0u32;
    for (file, column) in grid.iter().enumerate() {
        for (rank, slot) in column.iter().enumerate() {
            if let Some((team, kind)) = *slot {
                let mut sq = Square::new(file as u8, rank as u8);
                if mirrored {
                    sq = sq.mirror();
                }
                let (k, l) = ZOBRIST.piece(team, kind, sq);
                key ^= k;
                lock ^= l;
            }
        }
    }
    if side == Team::Black {
        let (k, l) = ZOBRIST.side();
        key ^= k;
        lock ^= l;
    }
    (key, lock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic_and_distinct() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        let sq = Square::new(4, 0);
        assert_eq!(
            a.piece(Team::Red, PieceKind::King, sq),
            b.piece(Team::Red, PieceKind::King, sq)
        );
        assert_ne!(
            a.piece(Team::Red, PieceKind::King, sq),
            a.piece(Team::Black, PieceKind::King, sq)
        );
    }

    #[test]
    fn test_side_changes_hash() {
        let mut grid: PieceGrid = [[None; 10]; 9];
        grid[4][0] = Some((Team::Red, PieceKind::King));
        grid[4][9] = Some((Team::Black, PieceKind::King));
        assert_ne!(
            hash_grid(&grid, Team::Red, false),
            hash_grid(&grid, Team::Black, false)
        );
    }

    #[test]
    fn test_mirror_of_symmetric_grid_is_identity() {
        let mut grid: PieceGrid = [[None; 10]; 9];
        grid[4][0] = Some((Team::Red, PieceKind::King));
        grid[4][9] = Some((Team::Black, PieceKind::King));
        grid[0][3] = Some((Team::Red, PieceKind::Pawn));
        grid[8][3] = Some((Team::Red, PieceKind::Pawn));
        assert_eq!(
            hash_grid(&grid, Team::Red, false),
            hash_grid(&grid, Team::Red, true)
        );
    }
}
