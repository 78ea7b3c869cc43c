//! Core Xiangqi types.
//!
//! - `Team` and `PieceKind` - sides and piece kinds, plus the arena `Piece`
//! - `Square` - a (file, rank) point on the 9x10 grid
//! - `Move`, `MoveKey` and `MoveList` - move representation and ordering class

mod moves;
mod piece;
mod square;

pub use moves::{sort_moves, Move, MoveClass, MoveKey, MoveList};
pub use piece::{Piece, PieceKind, Team};
pub use square::Square;

/// Number of files (columns) on the board.
pub const BOARD_FILES: usize = 9;

/// Number of ranks (rows) on the board.
pub const BOARD_RANKS: usize = 10;

/// Number of points on the board.
pub const BOARD_POINTS: usize = BOARD_FILES * BOARD_RANKS;

/// Hard bound on search distance from the root, quiescence included.
pub const MAX_PLY: usize = 160;

/// Piece placement indexed as `grid[file][rank]`.
pub type PieceGrid = [[Option<(Team, PieceKind)>; BOARD_RANKS]; BOARD_FILES];
