use super::super::bitline::{FILE_LINE_END, RANK_LINE_END};
use super::super::types::{MoveList, Piece, Square};
use super::super::Board;

impl Board {
    pub(crate) fn rook_moves(&self, rook: Piece, captures_only: bool, out: &mut MoveList) {
        let (file, rank) = (rook.square.file(), rook.square.rank());

        let region = self
            .regions
            .rook_region(self.bitlines.file(file), rank, FILE_LINE_END);
        for r in region.low..=region.high {
            if r != rank && (!captures_only || r == region.low || r == region.high) {
                self.push_target(rook, Square::new(file, r), captures_only, out);
            }
        }

        let region = self
            .regions
            .rook_region(self.bitlines.rank(rank), file, RANK_LINE_END);
        for f in region.low..=region.high {
            if f != file && (!captures_only || f == region.low || f == region.high) {
                self.push_target(rook, Square::new(f, rank), captures_only, out);
            }
        }
    }

    pub(crate) fn cannon_moves(&self, cannon: Piece, captures_only: bool, out: &mut MoveList) {
        let (file, rank) = (cannon.square.file(), cannon.square.rank());

        let region = self
            .regions
            .cannon_region(self.bitlines.file(file), rank, FILE_LINE_END);
        if !captures_only {
            for r in (region.low..=region.high).filter(|&r| r != rank) {
                self.push_target(cannon, Square::new(file, r), false, out);
            }
        }
        for r in [region.low_capture(), region.high_capture()].into_iter().flatten() {
            self.push_target(cannon, Square::new(file, r), true, out);
        }

        let region = self
            .regions
            .cannon_region(self.bitlines.rank(rank), file, RANK_LINE_END);
        if !captures_only {
            for f in (region.low..=region.high).filter(|&f| f != file) {
                self.push_target(cannon, Square::new(f, rank), false, out);
            }
        }
        for f in [region.low_capture(), region.high_capture()].into_iter().flatten() {
            self.push_target(cannon, Square::new(f, rank), true, out);
        }
    }
}
