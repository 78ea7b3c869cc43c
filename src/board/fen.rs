use super::error::{FenError, MoveParseError};
use super::types::{Move, MoveKey, PieceGrid, PieceKind, Square, Team, BOARD_FILES, BOARD_RANKS};
use super::Board;

impl Board {
    /// Parse a position from Xiangqi FEN. Only the placement and side fields
    /// are read; the rest are ignored.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::Empty)?;

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != BOARD_RANKS {
            return Err(FenError::WrongRankCount { found: rows.len() });
        }

        let mut grid: PieceGrid = [[None; BOARD_RANKS]; BOARD_FILES];
        for (row, text) in rows.iter().enumerate() {
            let rank = BOARD_RANKS - 1 - row;
            let mut file = 0usize;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let piece = PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= BOARD_FILES {
                    return Err(FenError::WrongFileCount {
                        rank,
                        files: file + 1,
                    });
                }
                grid[file][rank] = Some(piece);
                file += 1;
            }
            if file != BOARD_FILES {
                return Err(FenError::WrongFileCount { rank, files: file });
            }
        }

        let team = match parts.next() {
            None | Some("w" | "r") => Team::Red,
            Some("b") => Team::Black,
            Some(other) => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        Ok(Board::from_grid(&grid, team)?)
    }

    /// Serialize the position as Xiangqi FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let grid = self.grid();
        let mut fen = String::with_capacity(64);
        for rank in (0..BOARD_RANKS).rev() {
            let mut empty = 0;
            for column in &grid {
                match column[rank] {
                    Some((team, kind)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(kind.to_char(team));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen.push_str(match self.team {
            Team::Red => " w",
            Team::Black => " b",
        });
        fen.push_str(" - - 0 1");
        fen
    }

    /// Parse a coordinate move such as `h2e2` and check it is legal here.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if text.len() != 4 || !text.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }
        let invalid = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text[..2].parse().map_err(|_| invalid())?;
        let to: Square = text[2..].parse().map_err(|_| invalid())?;
        self.validate_move(MoveKey::new(from, to))
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse and play a coordinate move, recording whether it gives check.
    /// The board is unchanged on error.
    pub fn apply_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(text)?;
        self.play_legal(mv);
        Ok(mv)
    }

    /// Play the move `key` if it is legal here. Undone by
    /// [`Board::undo_move`]; the board is unchanged on error.
    pub fn play_move(&mut self, key: MoveKey) -> Result<Move, MoveParseError> {
        let mv = self
            .validate_move(key)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: key.to_string(),
            })?;
        self.play_legal(mv);
        Ok(mv)
    }

    fn play_legal(&mut self, mv: Move) {
        self.do_move(&mv);
        if self.in_check(self.team) {
            self.mark_last_move_checking();
        }
    }
}
