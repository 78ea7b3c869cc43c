use super::SearchContext;
use crate::board::search::{DRAW_VALUE, INF};
use crate::board::{Board, Move, PieceKind};

/// How a repeated move cycle is judged, from the side to move's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repetition {
    /// Both sides repeat without violation, or both violate.
    Draw,
    /// The opponent keeps checking or chasing while we only evade.
    OpponentViolates,
}

/// Judge the last five plies of `board`'s history.
///
/// The cycle is ply1 == ply5 with plies 1/3 and 2/4 undoing each other
/// (ply1 is the most recent). Null moves and captures break a cycle. When
/// we are the side repeating checks, the cycle is left to the search so
/// the checker is forced to deviate one ply later.
pub fn detect(board: &Board) -> Option<Repetition> {
    let history = board.history();
    if history.len() < 5 {
        return None;
    }
    let mut plies: [Option<&Move>; 5] = [None; 5];
    for (slot, entry) in plies.iter_mut().zip(history.iter().rev()) {
        *slot = entry.as_ref();
    }
    let [Some(p1), Some(p2), Some(p3), Some(p4), Some(p5)] = plies else {
        return None;
    };
    if [p1, p2, p3, p4, p5].iter().any(|mv| mv.is_capture()) {
        return None;
    }
    let cycle = p1.key() == p5.key()
        && p1.from() == p3.to()
        && p1.to() == p3.from()
        && p2.from() == p4.to()
        && p2.to() == p4.from();
    if !cycle {
        return None;
    }

    let they_check = p1.is_checking() && p3.is_checking();
    let we_check = p2.is_checking() && p4.is_checking();
    match (they_check, we_check) {
        (true, false) => Some(Repetition::OpponentViolates),
        (true, true) => Some(Repetition::Draw),
        (false, true) => None,
        (false, false) if is_long_chase(board, p1, p2) => Some(Repetition::OpponentViolates),
        (false, false) => Some(Repetition::Draw),
    }
}

/// The opponent's shuttling piece attacks the piece we keep moving, which
/// is not a king and cannot hit back.
fn is_long_chase(board: &Board, theirs: &Move, ours: &Move) -> bool {
    let chaser = board.piece(theirs.mover().index());
    let target = board.piece(ours.mover().index());
    chaser.kind().is_chaser()
        && chaser.is_alive()
        && target.is_alive()
        && target.kind() != PieceKind::King
        && board.piece_attacks(chaser, target.square())
        && !board.piece_attacks(target, chaser.square())
}

impl SearchContext<'_> {
    /// Value of the node if its history ends in a repetition cycle.
    pub(super) fn repetition_value(&self) -> Option<i32> {
        detect(self.board).map(|repetition| match repetition {
            Repetition::Draw => DRAW_VALUE,
            Repetition::OpponentViolates => INF - self.distance(),
        })
    }
}
