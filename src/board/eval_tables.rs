//! Piece-square tables, written from RED's side as `[file][rank]`.
//!
//! Only files 0-4 are spelled out; files 5-8 mirror them so that every
//! table is left-right symmetric.

pub(crate) type WeightTable = [[i32; 10]; 9];

const fn mirror_files(half: [[i32; 10]; 5]) -> WeightTable {
    let mut table = [[0; 10]; 9];
    let mut file = 0;
    while file < 5 {
        table[file] = half[file];
        table[8 - file] = half[file];
        file += 1;
    }
    table
}

pub(crate) const KING_OPENING: WeightTable = mirror_files([
    [0; 10],
    [0; 10],
    [0; 10],
    [9990, 9975, 9960, 0, 0, 0, 0, 0, 0, 0],
    [10000, 9980, 9965, 0, 0, 0, 0, 0, 0, 0],
]);

pub(crate) const KING_ENDGAME: WeightTable = mirror_files([
    [0; 10],
    [0; 10],
    [0; 10],
    [9990, 9995, 9985, 0, 0, 0, 0, 0, 0, 0],
    [10000, 10005, 9995, 0, 0, 0, 0, 0, 0, 0],
]);

pub(crate) const GUARD_THREATENED: WeightTable = mirror_files([
    [0; 10],
    [0; 10],
    [0; 10],
    [100, 0, 90, 0, 0, 0, 0, 0, 0, 0],
    [0, 130, 0, 0, 0, 0, 0, 0, 0, 0],
]);

pub(crate) const GUARD_SAFE: WeightTable = mirror_files([
    [0; 10],
    [0; 10],
    [0; 10],
    [80, 0, 75, 0, 0, 0, 0, 0, 0, 0],
    [0, 95, 0, 0, 0, 0, 0, 0, 0, 0],
]);

pub(crate) const BISHOP_THREATENED: WeightTable = mirror_files([
    [0, 0, 90, 0, 0, 0, 0, 0, 0, 0],
    [0; 10],
    [100, 0, 0, 0, 90, 0, 0, 0, 0, 0],
    [0; 10],
    [0, 0, 130, 0, 0, 0, 0, 0, 0, 0],
]);

pub(crate) const BISHOP_SAFE: WeightTable = mirror_files([
    [0, 0, 75, 0, 0, 0, 0, 0, 0, 0],
    [0; 10],
    [85, 0, 0, 0, 80, 0, 0, 0, 0, 0],
    [0; 10],
    [0, 0, 100, 0, 0, 0, 0, 0, 0, 0],
]);

pub(crate) const KNIGHT_OPENING: WeightTable = mirror_files([
    [250, 270, 300, 300, 300, 290, 290, 310, 280, 305],
    [300, 300, 320, 310, 320, 340, 360, 350, 350, 270],
    [290, 300, 310, 310, 315, 315, 315, 320, 370, 300],
    [280, 300, 305, 300, 320, 330, 360, 360, 320, 300],
    [250, 250, 290, 300, 310, 310, 320, 330, 250, 250],
]);

pub(crate) const KNIGHT_ENDGAME: WeightTable = mirror_files([
    [270, 280, 290, 300, 300, 300, 300, 300, 290, 280],
    [280, 290, 300, 310, 310, 320, 320, 320, 310, 290],
    [290, 300, 310, 320, 320, 330, 330, 330, 320, 300],
    [290, 300, 310, 320, 330, 330, 340, 340, 330, 310],
    [280, 290, 300, 320, 330, 330, 340, 340, 320, 300],
]);

pub(crate) const ROOK_OPENING: WeightTable = mirror_files([
    [580, 608, 604, 606, 612, 612, 612, 612, 616, 614],
    [610, 604, 608, 610, 616, 614, 618, 612, 620, 614],
    [606, 608, 606, 608, 614, 612, 616, 612, 618, 612],
    [614, 616, 614, 614, 620, 618, 622, 618, 624, 618],
    [612, 608, 612, 614, 620, 618, 622, 618, 626, 616],
]);

pub(crate) const ROOK_ENDGAME: WeightTable = mirror_files([
    [630, 632, 632, 634, 636, 638, 638, 638, 638, 636],
    [632, 634, 634, 636, 638, 640, 640, 640, 640, 638],
    [632, 634, 634, 636, 638, 640, 640, 640, 640, 638],
    [634, 636, 636, 638, 640, 642, 642, 642, 642, 640],
    [634, 636, 636, 638, 640, 642, 642, 642, 642, 640],
]);

pub(crate) const CANNON_OPENING: WeightTable = mirror_files([
    [300, 300, 304, 300, 298, 300, 300, 302, 302, 306],
    [300, 302, 300, 300, 300, 300, 300, 302, 302, 304],
    [302, 304, 308, 300, 302, 300, 298, 300, 300, 300],
    [306, 306, 310, 302, 304, 302, 304, 290, 296, 290],
    [306, 306, 320, 304, 306, 308, 310, 292, 286, 288],
]);

pub(crate) const CANNON_ENDGAME: WeightTable = mirror_files([
    [270, 270, 270, 272, 272, 272, 272, 272, 270, 270],
    [270, 272, 272, 272, 274, 274, 274, 272, 272, 270],
    [272, 272, 274, 274, 276, 276, 276, 274, 272, 272],
    [272, 274, 276, 276, 278, 278, 278, 276, 274, 272],
    [274, 276, 278, 278, 280, 280, 280, 278, 276, 274],
]);

pub(crate) const PAWN_OPENING: WeightTable = mirror_files([
    [30, 30, 30, 30, 32, 36, 40, 44, 48, 30],
    [30, 30, 30, 30, 30, 42, 50, 56, 66, 33],
    [30, 30, 30, 28, 38, 48, 60, 72, 86, 36],
    [30, 30, 30, 30, 30, 48, 64, 90, 110, 39],
    [30, 30, 30, 34, 38, 50, 70, 110, 150, 42],
]);

pub(crate) const PAWN_ENDGAME: WeightTable = mirror_files([
    [40, 40, 40, 40, 42, 60, 70, 80, 90, 50],
    [40, 40, 40, 40, 42, 70, 85, 100, 110, 60],
    [40, 40, 40, 40, 44, 80, 100, 120, 130, 70],
    [40, 40, 40, 42, 46, 90, 115, 140, 150, 80],
    [40, 40, 40, 44, 48, 95, 120, 150, 160, 90],
]);
