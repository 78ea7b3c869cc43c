//! Phase-aware static evaluation.
//!
//! An [`Evaluator`] is built once per board from the initial placement. It
//! fixes the blended piece-square weights for that board's lifetime; the
//! board then keeps one running total per team and updates it on every move.

use super::eval_tables::{
    WeightTable, BISHOP_SAFE, BISHOP_THREATENED, CANNON_ENDGAME, CANNON_OPENING, GUARD_SAFE,
    GUARD_THREATENED, KING_ENDGAME, KING_OPENING, KNIGHT_ENDGAME, KNIGHT_OPENING, PAWN_ENDGAME,
    PAWN_OPENING, ROOK_ENDGAME, ROOK_OPENING,
};
use super::types::{PieceGrid, PieceKind, Square, Team, BOARD_POINTS};

/// Phase weight of a full board (kings excluded).
pub const TOTAL_PHASE: i32 = 66;
/// Cap on a side's attack value.
pub const TOTAL_ATTACK: i32 = 8;
/// Advanced bonus once the board is nearly empty.
pub const TOTAL_ADVANCED: i32 = 6;

/// A static evaluator that only looks at the placement and side to move.
///
/// Installed on a search it replaces the board's incremental evaluation at
/// the leaves.
pub trait StaticEvaluator: Send + Sync {
    /// Centipawn-scale score from the point of view of `side`.
    fn evaluate(&self, grid: &PieceGrid, side: Team) -> i32;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluator {
    // weights[team][kind][square index], already flipped for BLACK
    weights: [[[i32; BOARD_POINTS]; 7]; 2],
    phase: i32,
    advanced: i32,
    attack: [i32; 2],
}

fn live_pieces(grid: &PieceGrid) -> impl Iterator<Item = (Square, Team, PieceKind)> + '_ {
    grid.iter().enumerate().flat_map(|(file, column)| {
        column.iter().enumerate().filter_map(move |(rank, slot)| {
            slot.map(|(team, kind)| (Square::new(file as u8, rank as u8), team, kind))
        })
    })
}

fn blend(a: &WeightTable, b: &WeightTable, a_share: i32, total: i32) -> WeightTable {
    let mut out = [[0; 10]; 9];
    for file in 0..9 {
        for rank in 0..10 {
            out[file][rank] = (a[file][rank] * a_share + b[file][rank] * (total - a_share)) / total;
        }
    }
    out
}

impl Evaluator {
    /// Derive phase, attack values and blended weights from a placement.
    #[must_use]
    pub fn new(grid: &PieceGrid) -> Self {
        let material: i32 = live_pieces(grid)
            .map(|(_, _, kind)| kind.phase_weight())
            .sum::<i32>()
            .min(TOTAL_PHASE);
        // Quadratic: stays near the opening until most material is gone.
        let phase = (2 * TOTAL_PHASE - material) * material / TOTAL_PHASE;
        let advanced =
            (TOTAL_ADVANCED * (TOTAL_PHASE - phase) + TOTAL_PHASE / 2) / TOTAL_PHASE;

        let mut attack = [0i32; 2];
        let mut light = [0i32; 2];
        for (sq, team, kind) in live_pieces(grid) {
            let t = team.index();
            if sq.crossed_river(team) {
                attack[t] += match kind {
                    PieceKind::Rook | PieceKind::Knight => 2,
                    PieceKind::Cannon | PieceKind::Pawn => 1,
                    _ => 0,
                };
            }
            light[t] += match kind {
                PieceKind::Rook => 2,
                PieceKind::Knight | PieceKind::Cannon => 1,
                _ => 0,
            };
        }
        if light[0] > light[1] {
            attack[0] += (light[0] - light[1]) * 2;
        } else {
            attack[1] += (light[1] - light[0]) * 2;
        }
        let attack = attack.map(|a| a.min(TOTAL_ATTACK));

        let mut weights = [[[0; BOARD_POINTS]; 7]; 2];
        for team in Team::ALL {
            let threat = attack[team.opponent().index()];
            let tables = [
                blend(&KING_OPENING, &KING_ENDGAME, phase, TOTAL_PHASE),
                blend(&GUARD_THREATENED, &GUARD_SAFE, threat, TOTAL_ATTACK),
                blend(&BISHOP_THREATENED, &BISHOP_SAFE, threat, TOTAL_ATTACK),
                blend(&KNIGHT_OPENING, &KNIGHT_ENDGAME, phase, TOTAL_PHASE),
                blend(&ROOK_OPENING, &ROOK_ENDGAME, phase, TOTAL_PHASE),
                blend(&CANNON_OPENING, &CANNON_ENDGAME, phase, TOTAL_PHASE),
                blend(&PAWN_OPENING, &PAWN_ENDGAME, phase, TOTAL_PHASE),
            ];
            for (kind_weights, table) in weights[team.index()].iter_mut().zip(tables.iter()) {
                for (index, weight) in kind_weights.iter_mut().enumerate() {
                    let sq = Square::from_index(index).relative_to(team);
                    *weight = table[sq.file() as usize][sq.rank() as usize];
                }
            }
        }

        Evaluator {
            weights,
            phase,
            advanced,
            attack,
        }
    }

    /// Positional value of a `team` `kind` standing on `sq`.
    #[inline]
    #[must_use]
    pub fn weight(&self, team: Team, kind: PieceKind, sq: Square) -> i32 {
        self.weights[team.index()][kind.index()][sq.index()]
    }

    /// Game phase: `TOTAL_PHASE` for a full board, 0 for bare kings.
    #[must_use]
    pub fn phase(&self) -> i32 {
        self.phase
    }

    /// Bonus credited to the side to move.
    #[must_use]
    pub fn advanced_bonus(&self) -> i32 {
        self.advanced
    }

    #[must_use]
    pub fn attack(&self, team: Team) -> i32 {
        self.attack[team.index()]
    }

    /// Per-team positional totals computed from scratch.
    #[must_use]
    pub fn totals(&self, grid: &PieceGrid) -> [i32; 2] {
        let mut totals = [0; 2];
        for (sq, team, kind) in live_pieces(grid) {
            totals[team.index()] += self.weight(team, kind, sq);
        }
        totals
    }
}

impl StaticEvaluator for Evaluator {
    fn evaluate(&self, grid: &PieceGrid, side: Team) -> i32 {
        let totals = self.totals(grid);
        totals[side.index()] - totals[side.opponent().index()] + self.advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_full_board_is_opening_phase() {
        let board = Board::new();
        let evaluator = Evaluator::new(&board.grid());
        assert_eq!(evaluator.phase(), TOTAL_PHASE);
        assert_eq!(evaluator.advanced_bonus(), 0);
        assert_eq!(evaluator.attack(Team::Red), 0);
        assert_eq!(evaluator.attack(Team::Black), 0);
    }

    #[test]
    fn test_bare_kings_are_endgame_phase() {
        let board = Board::from_fen("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1").unwrap();
        let evaluator = Evaluator::new(&board.grid());
        assert_eq!(evaluator.phase(), 0);
        assert_eq!(evaluator.advanced_bonus(), TOTAL_ADVANCED);
    }

    #[test]
    fn test_crossed_attackers_raise_attack_value() {
        // Red rook and knight across the river, black has nothing to attack with.
        let board =
            Board::from_fen("3akab2/9/4b4/2N1R4/9/9/9/9/9/4K4 w - - 0 1").unwrap();
        let evaluator = Evaluator::new(&board.grid());
        assert_eq!(evaluator.attack(Team::Red), TOTAL_ATTACK);
        assert_eq!(evaluator.attack(Team::Black), 0);
        // Black defenders are worth more under threat.
        let guard = Square::new(3, 9);
        assert_eq!(evaluator.weight(Team::Black, PieceKind::Guard, guard), 100);
        assert_eq!(evaluator.weight(Team::Red, PieceKind::Guard, Square::new(3, 0)), 80);
    }

    #[test]
    fn test_black_weights_are_rank_flipped() {
        let board = Board::new();
        let evaluator = Evaluator::new(&board.grid());
        for kind in PieceKind::ALL {
            for index in 0..BOARD_POINTS {
                let sq = Square::from_index(index);
                assert_eq!(
                    evaluator.weight(Team::Red, kind, sq),
                    evaluator.weight(Team::Black, kind, sq.relative_to(Team::Black))
                );
            }
        }
    }
}
