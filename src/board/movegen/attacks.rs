use super::super::bitline::{BitLine, FILE_LINE_END, RANK_LINE_END};
use super::super::types::{MoveList, Piece, PieceKind, Square, Team};
use super::super::Board;
use super::kings::ORTHOGONAL;
use super::knights::KNIGHT_JUMPS;

impl Board {
    /// Whether `team`'s king is attacked. Facing kings count as check.
    /// A side without a king is never in check.
    #[must_use]
    pub fn in_check(&self, team: Team) -> bool {
        self.king(team)
            .is_some_and(|king| self.is_attacked(king.square, team.opponent()))
    }

    /// Whether any `by` piece could capture on `sq`.
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Team) -> bool {
        self.line_attack(sq, by) || self.knight_attack(sq, by) || self.short_attack(sq, by)
    }

    fn enemy_at(&self, sq: Square, by: Team, kinds: &[PieceKind]) -> bool {
        self.piece_at(sq)
            .is_some_and(|p| p.team == by && kinds.contains(&p.kind))
    }

    /// Rooks, cannons and the facing king along the file and rank of `sq`.
    fn line_attack(&self, sq: Square, by: Team) -> bool {
        let (file, rank) = (sq.file(), sq.rank());
        // Regions are looked up as if `sq` were occupied.
        let file_line: BitLine = self.bitlines.file(file) | (1 << rank);
        let rank_line: BitLine = self.bitlines.rank(rank) | (1 << file);

        let rook = self.regions.rook_region(file_line, rank, FILE_LINE_END);
        let rook_or_king = [PieceKind::Rook, PieceKind::King];
        if [rook.low, rook.high].into_iter().any(|r| {
            r != rank && self.enemy_at(Square::new(file, r), by, &rook_or_king)
        }) {
            return true;
        }
        let rook = self.regions.rook_region(rank_line, file, RANK_LINE_END);
        if [rook.low, rook.high].into_iter().any(|f| {
            f != file && self.enemy_at(Square::new(f, rank), by, &[PieceKind::Rook])
        }) {
            return true;
        }

        let cannon = self.regions.cannon_region(file_line, rank, FILE_LINE_END);
        if [cannon.low_capture(), cannon.high_capture()]
            .into_iter()
            .flatten()
            .any(|r| self.enemy_at(Square::new(file, r), by, &[PieceKind::Cannon]))
        {
            return true;
        }
        let cannon = self.regions.cannon_region(rank_line, file, RANK_LINE_END);
        [cannon.low_capture(), cannon.high_capture()]
            .into_iter()
            .flatten()
            .any(|f| self.enemy_at(Square::new(f, rank), by, &[PieceKind::Cannon]))
    }

    /// A knight attacking `sq` is blocked by the point diagonally next to
    /// `sq` on the knight's side.
    fn knight_attack(&self, sq: Square, by: Team) -> bool {
        KNIGHT_JUMPS.iter().any(|&((df, dr), _)| {
            let Some(from) = sq.offset(df, dr) else {
                return false;
            };
            if !self.enemy_at(from, by, &[PieceKind::Knight]) {
                return false;
            }
            sq.offset(df.signum(), dr.signum())
                .is_some_and(|leg| !self.bitlines.is_occupied(leg))
        })
    }

    /// Pawns, plus a king standing next to `sq` inside its palace.
    fn short_attack(&self, sq: Square, by: Team) -> bool {
        if let Some(from) = sq.offset(0, -by.forward()) {
            if self.enemy_at(from, by, &[PieceKind::Pawn]) {
                return true;
            }
        }
        for df in [-1, 1] {
            if let Some(pawn) = sq
                .offset(df, 0)
                .and_then(|from| self.piece_at(from))
                .filter(|p| p.team == by && p.kind == PieceKind::Pawn)
            {
                if pawn.square.crossed_river(by) {
                    return true;
                }
            }
        }
        sq.in_palace(by)
            && ORTHOGONAL.iter().any(|&(df, dr)| {
                sq.offset(df, dr)
                    .is_some_and(|from| self.enemy_at(from, by, &[PieceKind::King]))
            })
    }

    /// Whether `piece` could capture on `target` right now, ignoring the
    /// safety of its own king.
    #[must_use]
    pub fn piece_attacks(&self, piece: Piece, target: Square) -> bool {
        let mut captures = MoveList::new();
        self.piece_moves(piece, true, &mut captures);
        captures.iter().any(|mv| mv.to == target)
    }
}
