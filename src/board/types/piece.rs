//! Piece kinds, teams and the arena piece record.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Square;

/// The two sides. RED starts on ranks 0-4 and moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Team {
    Red,
    Black,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Black];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Team::Red => 0,
            Team::Black => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Black,
            Team::Black => Team::Red,
        }
    }

    /// +1 for RED, -1 for BLACK; the sign of a signed piece id.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Team::Red => 1,
            Team::Black => -1,
        }
    }

    /// Rank step of a pawn moving forward.
    #[inline]
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Team::Red => 1,
            Team::Black => -1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "red"),
            Team::Black => write!(f, "black"),
        }
    }
}

/// Xiangqi piece kinds. Discriminants are the unsigned piece ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    King = 1,
    Guard = 2,
    Bishop = 3,
    Knight = 4,
    Rook = 5,
    Cannon = 6,
    Pawn = 7,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::King,
        PieceKind::Guard,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Cannon,
        PieceKind::Pawn,
    ];

    /// Zero-based table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Weight used to measure game phase. Kings do not count.
    #[inline]
    #[must_use]
    pub const fn phase_weight(self) -> i32 {
        match self {
            PieceKind::King => 0,
            PieceKind::Rook => 6,
            PieceKind::Knight | PieceKind::Cannon => 3,
            PieceKind::Guard | PieceKind::Bishop | PieceKind::Pawn => 1,
        }
    }

    /// Coarse exchange weight for capture ordering.
    #[inline]
    #[must_use]
    pub const fn exchange_weight(self) -> i32 {
        match self {
            PieceKind::King => 5,
            PieceKind::Rook => 4,
            PieceKind::Knight | PieceKind::Cannon => 3,
            PieceKind::Guard | PieceKind::Bishop => 2,
            PieceKind::Pawn => 1,
        }
    }

    /// Whether the piece can chase (rook, knight, cannon).
    #[inline]
    #[must_use]
    pub const fn is_chaser(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Knight | PieceKind::Cannon)
    }

    /// Signed id: positive for RED, negative for BLACK.
    #[inline]
    #[must_use]
    pub const fn signed_id(self, team: Team) -> i8 {
        self as i8 * team.sign()
    }

    /// FEN letter: uppercase for RED, lowercase for BLACK.
    #[must_use]
    pub const fn to_char(self, team: Team) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Guard => 'a',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Pawn => 'p',
        };
        match team {
            Team::Red => c.to_ascii_uppercase(),
            Team::Black => c,
        }
    }

    /// Parse a FEN letter. Accepts the `e`/`h` aliases for bishop/knight.
    #[must_use]
    pub fn from_char(c: char) -> Option<(Team, PieceKind)> {
        let team = if c.is_ascii_uppercase() {
            Team::Red
        } else {
            Team::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'a' => PieceKind::Guard,
            'b' | 'e' => PieceKind::Bishop,
            'n' | 'h' => PieceKind::Knight,
            'r' => PieceKind::Rook,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((team, kind))
    }
}

/// A piece in the board's arena.
///
/// The index is stable for the lifetime of the owning board; captures only
/// clear `alive`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    pub(crate) kind: PieceKind,
    pub(crate) team: Team,
    pub(crate) square: Square,
    pub(crate) index: u8,
    pub(crate) alive: bool,
}

impl Piece {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    #[inline]
    #[must_use]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    #[must_use]
    pub const fn signed_id(&self) -> i8 {
        self.kind.signed_id(self.team)
    }
}
