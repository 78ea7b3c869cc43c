//! Move representation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Piece, Square};

/// Ordering class of a move. Higher classes are tried first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveClass {
    #[default]
    Normal = 0,
    History = 1,
    Capture = 2,
    Killer = 3,
    Hash = 4,
}

/// Source and destination only. This is what the heuristic tables remember;
/// a key is turned back into a `Move` by validating it on the current board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveKey {
    pub from: Square,
    pub to: Square,
}

impl MoveKey {
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        MoveKey { from, to }
    }

    /// `x1*1000 + y1*100 + x2*10 + y2`
    #[inline]
    #[must_use]
    pub const fn id(self) -> i32 {
        self.from.file() as i32 * 1000
            + self.from.rank() as i32 * 100
            + self.to.file() as i32 * 10
            + self.to.rank() as i32
    }

    /// Inverse of [`MoveKey::id`]. Returns `None` for ids off the board.
    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        if !(0..10_000).contains(&id) {
            return None;
        }
        let from = Square::try_new(id / 1000, id / 100 % 10)?;
        let to = Square::try_new(id / 10 % 10, id % 10)?;
        Some(MoveKey { from, to })
    }
}

impl fmt::Display for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A move with snapshots of the moving and captured pieces.
///
/// Equality and hashing use the move id only.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) mover: Piece,
    pub(crate) captured: Option<Piece>,
    pub(crate) class: MoveClass,
    pub(crate) score: i32,
    pub(crate) checking: bool,
}

impl Move {
    /// Build a move for `mover` to `to`. Captures are tagged with the
    /// captured weight minus the attacker weight.
    #[must_use]
    pub(crate) fn new(mover: Piece, to: Square, captured: Option<Piece>) -> Self {
        let (class, score) = match captured {
            Some(victim) => (
                MoveClass::Capture,
                victim.kind.exchange_weight() - mover.kind.exchange_weight(),
            ),
            None => (MoveClass::Normal, 0),
        };
        Move {
            from: mover.square,
            to,
            mover,
            captured,
            class,
            score,
            checking: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline]
    #[must_use]
    pub const fn mover(&self) -> Piece {
        self.mover
    }

    #[inline]
    #[must_use]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn class(&self) -> MoveClass {
        self.class
    }

    #[inline]
    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Whether this move was seen to give check.
    #[inline]
    #[must_use]
    pub const fn is_checking(&self) -> bool {
        self.checking
    }

    #[inline]
    #[must_use]
    pub const fn key(&self) -> MoveKey {
        MoveKey::new(self.from, self.to)
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.key().id()
    }

    #[inline]
    pub(crate) fn set_order(&mut self, class: MoveClass, score: i32) {
        self.class = class;
        self.score = score;
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Moves produced by the generator.
pub type MoveList = Vec<Move>;

/// Sort by class, then score, both descending. Stable.
pub fn sort_moves(moves: &mut [Move]) {
    moves.sort_by(|a, b| match b.class.cmp(&a.class) {
        Ordering::Equal => b.score.cmp(&a.score),
        other => other,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_id_round_trip() {
        let key = MoveKey::new(Square::new(7, 2), Square::new(4, 2));
        assert_eq!(key.id(), 7242);
        assert_eq!(MoveKey::from_id(7242), Some(key));
        assert_eq!(key.to_string(), "h2e2");
        assert_eq!(MoveKey::from_id(9999), None);
        assert_eq!(MoveKey::from_id(-1), None);
    }
}
