pub mod board;
pub mod book;
pub mod engine;
pub mod tt;
pub mod ucci;
pub mod zobrist;

pub use board::{Board, Move, MoveKey, Piece, PieceKind, Square, Team};
pub use book::OpeningBook;
pub use engine::{EngineController, SearchEngine};
pub use tt::TranspositionTable;
