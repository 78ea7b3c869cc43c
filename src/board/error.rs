//! Error types for board operations.

use std::fmt;

use super::Team;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has no placement field
    Empty,
    /// Invalid piece character in the placement field
    InvalidPiece { char: char },
    /// Placement field does not have 10 ranks
    WrongRankCount { found: usize },
    /// A rank does not describe exactly 9 files
    WrongFileCount { rank: usize, files: usize },
    /// Invalid side to move (must be 'w', 'r' or 'b')
    InvalidSideToMove { found: String },
    /// Placement is not a playable position
    Board(BoardError),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::Empty => write!(f, "FEN has no placement field"),
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN must describe 10 ranks, found {found}")
            }
            FenError::WrongFileCount { rank, files } => {
                write!(f, "Rank {rank} describes {files} files, expected 9")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::Board(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FenError {}

impl From<BoardError> for FenError {
    fn from(err: BoardError) -> Self {
        FenError::Board(err)
    }
}

/// Error type for placements that cannot form a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A side has no king
    MissingKing { team: Team },
    /// A side has more than one king
    DuplicateKing { team: Team },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::MissingKing { team } => write!(f, "No {team} king on the board"),
            BoardError::DuplicateKing { team } => write!(f, "More than one {team} king"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string must be exactly 4 characters
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Notation must be a file letter and a rank digit
    InvalidLength { len: usize },
    /// File letter outside a-i
    InvalidFile { char: char },
    /// Rank is not a digit
    InvalidRank { char: char },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidLength { len } => {
                write!(f, "Square must be 2 characters, found {len}")
            }
            SquareError::InvalidFile { char } => {
                write!(f, "Invalid file '{char}' (must be a-i)")
            }
            SquareError::InvalidRank { char } => {
                write!(f, "Invalid rank '{char}' (must be 0-9)")
            }
        }
    }
}

impl std::error::Error for SquareError {}
