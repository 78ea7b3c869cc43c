//! Xiangqi board representation and game logic.
//!
//! Pieces live in a fixed table indexed by piece number, with a point map
//! and per-file/per-rank occupancy lines for fast slider generation. The
//! board keeps incremental Zobrist keys and positional scores, and records
//! every move so the search can detect repetition cycles.
//!
//! # Example
//! ```
//! use xiangqi_engine::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 44);
//! ```

mod bitline;
mod error;
mod eval;
mod eval_tables;
mod fen;
mod make_unmake;
mod movegen;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use bitline::{BitLine, BitRegionCache, Bitlines, CannonRegion, RookRegion};
pub use error::{BoardError, FenError, MoveParseError, SquareError};
pub use eval::{Evaluator, StaticEvaluator};
pub use state::{Board, START_FEN};
pub use types::{
    sort_moves, Move, MoveClass, MoveKey, MoveList, Piece, PieceGrid, PieceKind, Square, Team,
    BOARD_FILES, BOARD_POINTS, BOARD_RANKS, MAX_PLY,
};

// Public API - search functions and configuration
pub use search::{
    detect_repetition, search, Repetition, SearchConfig, SearchError, SearchInfoCallback,
    SearchIterationInfo, SearchResult, SearchState, BAN, DRAW_VALUE, INF, MAX_SEARCH_DEPTH,
};

// Re-export search internals for users who need fine-grained control
pub use search::{HistoryTable, KillerTable, SearchParams, SearchStats, SearchTables};
