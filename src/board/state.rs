use super::bitline::{Bitlines, BitRegionCache, REGIONS};
use super::error::BoardError;
use super::eval::Evaluator;
use super::types::{Move, Piece, PieceGrid, PieceKind, Square, Team, BOARD_FILES, BOARD_RANKS};
use crate::zobrist::hash_grid;

/// Standard opening position.
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// Canonical Xiangqi position with incremental evaluation and hashing.
///
/// Pieces live in a fixed arena whose indices never change; `index_map`
/// resolves a point to an arena index and captured pieces are only marked
/// dead. Every `do_move` pushes one history entry and one hash snapshot,
/// which `undo_move` pops.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: Vec<Piece>,
    pub(crate) index_map: [[Option<u8>; BOARD_RANKS]; BOARD_FILES],
    pub(crate) bitlines: Bitlines,
    pub(crate) regions: &'static BitRegionCache,
    pub(crate) team: Team,
    pub(crate) distance: usize,
    pub(crate) evaluator: Evaluator,
    pub(crate) scores: [i32; 2],
    pub(crate) key: u32,
    pub(crate) lock: u32,
    pub(crate) hash_stack: Vec<(u32, u32)>,
    /// `None` entries are null moves.
    pub(crate) history: Vec<Option<Move>>,
    pub(crate) kings: [Option<u8>; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn start_grid() -> PieceGrid {
    let mut grid: PieceGrid = [[None; BOARD_RANKS]; BOARD_FILES];
    let back_rank = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Guard,
        PieceKind::King,
        PieceKind::Guard,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    for (file, kind) in back_rank.into_iter().enumerate() {
        grid[file][0] = Some((Team::Red, kind));
        grid[file][9] = Some((Team::Black, kind));
    }
    for file in [1, 7] {
        grid[file][2] = Some((Team::Red, PieceKind::Cannon));
        grid[file][7] = Some((Team::Black, PieceKind::Cannon));
    }
    for file in [0, 2, 4, 6, 8] {
        grid[file][3] = Some((Team::Red, PieceKind::Pawn));
        grid[file][6] = Some((Team::Black, PieceKind::Pawn));
    }
    grid
}

impl Board {
    /// The standard starting position, RED to move.
    #[must_use]
    pub fn new() -> Self {
        Board::build(&start_grid(), Team::Red)
    }

    /// Build a board from a placement. Each side needs exactly one king.
    pub fn from_grid(grid: &PieceGrid, team: Team) -> Result<Self, BoardError> {
        for side in Team::ALL {
            let kings = grid
                .iter()
                .flatten()
                .filter(|slot| **slot == Some((side, PieceKind::King)))
                .count();
            match kings {
                0 => return Err(BoardError::MissingKing { team: side }),
                1 => {}
                _ => return Err(BoardError::DuplicateKing { team: side }),
            }
        }
        Ok(Board::build(grid, team))
    }

    fn build(grid: &PieceGrid, team: Team) -> Self {
        let mut pieces = Vec::with_capacity(32);
        let mut index_map = [[None; BOARD_RANKS]; BOARD_FILES];
        let mut bitlines = Bitlines::default();
        let mut kings = [None; 2];

        for (file, column) in grid.iter().enumerate() {
            for (rank, slot) in column.iter().enumerate() {
                let Some((piece_team, kind)) = *slot else {
                    continue;
                };
                let square = Square::new(file as u8, rank as u8);
                let index = pieces.len() as u8;
                pieces.push(Piece {
                    kind,
                    team: piece_team,
                    square,
                    index,
                    alive: true,
                });
                index_map[file][rank] = Some(index);
                bitlines.set(square);
                if kind == PieceKind::King {
                    kings[piece_team.index()] = Some(index);
                }
            }
        }

        let evaluator = Evaluator::new(grid);
        let scores = evaluator.totals(grid);
        let (key, lock) = hash_grid(grid, team, false);

        Board {
            pieces,
            index_map,
            bitlines,
            regions: &REGIONS,
            team,
            distance: 0,
            evaluator,
            scores,
            key,
            lock,
            hash_stack: Vec::new(),
            history: Vec::new(),
            kings,
        }
    }

    /// Side to move.
    #[inline]
    #[must_use]
    pub fn team(&self) -> Team {
        self.team
    }

    /// Plies made since the board was built (or the search root).
    #[inline]
    #[must_use]
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Restart ply counting at the current position.
    pub fn reset_distance(&mut self) {
        self.distance = 0;
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> u32 {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn lock(&self) -> u32 {
        self.lock
    }

    #[inline]
    #[must_use]
    pub fn bitlines(&self) -> &Bitlines {
        &self.bitlines
    }

    #[inline]
    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Running positional totals, indexed by `Team::index`.
    #[inline]
    #[must_use]
    pub fn scores(&self) -> [i32; 2] {
        self.scores
    }

    /// Static evaluation from the side to move's point of view.
    #[inline]
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        self.scores[self.team.index()] - self.scores[self.team.opponent().index()]
            + self.evaluator.advanced_bonus()
    }

    /// Arena entry by stable index.
    #[inline]
    #[must_use]
    pub fn piece(&self, index: usize) -> Piece {
        self.pieces[index]
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.index_map[sq.file() as usize][sq.rank() as usize].map(|i| self.pieces[i as usize])
    }

    pub fn live_pieces(&self, team: Team) -> impl Iterator<Item = Piece> + '_ {
        self.pieces
            .iter()
            .copied()
            .filter(move |p| p.alive && p.team == team)
    }

    /// The live king of `team`, if any.
    #[inline]
    #[must_use]
    pub fn king(&self, team: Team) -> Option<Piece> {
        self.kings[team.index()]
            .map(|i| self.pieces[i as usize])
            .filter(|p| p.alive)
    }

    #[inline]
    #[must_use]
    pub fn has_king(&self, team: Team) -> bool {
        self.king(team).is_some()
    }

    /// Moves made on this board, oldest first. `None` marks a null move.
    #[must_use]
    pub fn history(&self) -> &[Option<Move>] {
        &self.history
    }

    #[must_use]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().and_then(Option::as_ref)
    }

    /// Current placement as a grid.
    #[must_use]
    pub fn grid(&self) -> PieceGrid {
        let mut grid: PieceGrid = [[None; BOARD_RANKS]; BOARD_FILES];
        for piece in self.pieces.iter().filter(|p| p.alive) {
            grid[piece.square.file() as usize][piece.square.rank() as usize] =
                Some((piece.team, piece.kind));
        }
        grid
    }

    /// (key, lock) of the current position hashed from scratch.
    #[must_use]
    pub fn compute_hash(&self) -> (u32, u32) {
        hash_grid(&self.grid(), self.team, false)
    }

    /// (key, lock) of the left-right mirror of the current position.
    #[must_use]
    pub fn mirror_hash(&self) -> (u32, u32) {
        hash_grid(&self.grid(), self.team, true)
    }

    /// Weighted count of `team`'s rooks, knights and cannons.
    #[must_use]
    pub fn major_weight(&self, team: Team) -> i32 {
        self.live_pieces(team)
            .filter(|p| p.kind.is_chaser())
            .map(|p| p.kind.phase_weight())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_layout() {
        let board = Board::new();
        assert_eq!(board.team(), Team::Red);
        assert_eq!(board.pieces.len(), 32);
        let king = board.king(Team::Red).unwrap();
        assert_eq!(king.square(), Square::new(4, 0));
        assert_eq!(board.king(Team::Black).unwrap().square(), Square::new(4, 9));
        assert_eq!(
            board.piece_at(Square::new(1, 7)).map(|p| (p.team(), p.kind())),
            Some((Team::Black, PieceKind::Cannon))
        );
        assert_eq!(board.compute_hash(), (board.key(), board.lock()));
        assert_eq!(board.major_weight(Team::Red), 24);
    }

    #[test]
    fn test_from_grid_requires_kings() {
        let mut grid: PieceGrid = [[None; BOARD_RANKS]; BOARD_FILES];
        grid[4][0] = Some((Team::Red, PieceKind::King));
        assert_eq!(
            Board::from_grid(&grid, Team::Red).unwrap_err(),
            BoardError::MissingKing { team: Team::Black }
        );
        grid[4][9] = Some((Team::Black, PieceKind::King));
        grid[3][9] = Some((Team::Black, PieceKind::King));
        assert_eq!(
            Board::from_grid(&grid, Team::Red).unwrap_err(),
            BoardError::DuplicateKing { team: Team::Black }
        );
    }

    #[test]
    fn test_start_position_is_balanced() {
        let board = Board::new();
        let [red, black] = board.scores();
        assert_eq!(red, black);
        assert_eq!(board.evaluate(), 0);
    }
}
