//! Universal Chinese Chess Interface (UCCI) protocol implementation.
//!
//! Reads commands line by line, drives an [`EngineController`] and writes
//! replies to a shared writer. Search results arrive on the search thread
//! and are written through the same writer.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::board::{
    Board, FenError, MoveKey, MoveParseError, SearchInfoCallback, SearchIterationInfo,
};
use crate::engine::{EngineController, SearchEngine};

pub mod command;
pub mod options;

use command::{parse_ucci_command, UcciCommand};
use options::{UcciOptionAction, UcciOptions};

/// Error type for UCCI command arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UcciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid or illegal move in a move list
    InvalidMove(MoveParseError),
}

impl fmt::Display for UcciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UcciError::InvalidFen(e) => write!(f, "invalid fen: {e}"),
            UcciError::InvalidMove(e) => write!(f, "invalid move: {e}"),
        }
    }
}

impl std::error::Error for UcciError {}

impl From<FenError> for UcciError {
    fn from(e: FenError) -> Self {
        UcciError::InvalidFen(e)
    }
}

impl From<MoveParseError> for UcciError {
    fn from(e: MoveParseError) -> Self {
        UcciError::InvalidMove(e)
    }
}

/// Build the board for a `position` command: the start position or `fen`,
/// with `moves` replayed on it.
///
/// # Errors
/// Fails on a bad FEN or on the first move that is not legal in turn.
pub fn build_position(fen: Option<&str>, moves: &[String]) -> Result<Board, UcciError> {
    let mut board = match fen {
        Some(fen) => Board::from_fen(fen)?,
        None => Board::new(),
    };
    for mv in moves {
        board.apply_move(mv)?;
    }
    Ok(board)
}

/// Parse `banmoves` arguments against the current position.
///
/// # Errors
/// Fails on the first move that is not legal on `board`.
pub fn parse_banned_moves(board: &mut Board, moves: &[String]) -> Result<Vec<MoveKey>, UcciError> {
    moves
        .iter()
        .map(|mv| Ok(board.parse_move(mv)?.key()))
        .collect()
}

#[must_use]
pub fn format_info(info: &SearchIterationInfo) -> String {
    format!(
        "info depth {} score {} time {} nodes {} nps {} pv {}",
        info.depth, info.score, info.time_ms, info.nodes, info.nps, info.best_move
    )
}

fn write_line<W: Write>(out: &Mutex<W>, line: impl fmt::Display) {
    let mut out = out.lock();
    // The peer may have gone away; there is nobody left to tell.
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

/// One protocol session.
pub struct UcciSession<W: Write + Send + 'static> {
    controller: EngineController,
    options: UcciOptions,
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send + 'static> UcciSession<W> {
    /// Session on the start position with the default table size.
    pub fn new(out: W) -> Self {
        let options = UcciOptions::default();
        let mut engine = SearchEngine::default();
        engine.state_mut().reset_tables(options.hash_mb);
        Self::with_engine(out, engine, options)
    }

    pub fn with_engine(out: W, engine: SearchEngine, options: UcciOptions) -> Self {
        let out = Arc::new(Mutex::new(out));
        let mut controller = EngineController::new(engine);
        let info_out = Arc::clone(&out);
        let callback: SearchInfoCallback = Arc::new(move |info: &SearchIterationInfo| {
            write_line(&info_out, format_info(info));
        });
        controller.set_info_callback(Some(callback));
        UcciSession {
            controller,
            options,
            out,
        }
    }

    /// The writer replies go to.
    #[must_use]
    pub fn output(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.out)
    }

    /// Block until a running search has reported.
    pub fn wait_for_search(&mut self) {
        self.controller.wait_for_search();
    }

    fn say(&self, line: impl fmt::Display) {
        write_line(&self.out, line);
    }

    fn report_error(&self, error: impl fmt::Display) {
        debug!("rejected command: {error}");
        self.say(format_args!("info string error: {error}"));
    }

    /// Handle one input line. Returns `false` after `quit`.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let Some(command) = parse_ucci_command(line) else {
            return true;
        };

        match command {
            UcciCommand::Ucci => {
                self.controller
                    .with_engine(|engine| engine.set_position(Board::new()));
                let mut text = Vec::new();
                if self.options.print(&mut text).is_ok() {
                    self.say(String::from_utf8_lossy(&text).trim_end());
                }
            }
            UcciCommand::IsReady => self.say("readyok"),
            UcciCommand::SetOption { name, value } => {
                match self.options.apply_setoption(&name, value.as_deref()) {
                    Some(action) => self.apply_option(action),
                    None => debug!("option {name} unchanged"),
                }
            }
            UcciCommand::Position { fen, moves } => match build_position(fen.as_deref(), &moves) {
                Ok(board) => self.controller.with_engine(|engine| engine.set_position(board)),
                Err(e) => self.report_error(e),
            },
            UcciCommand::BanMoves(moves) => {
                let banned = self.controller.with_engine(|engine| {
                    let banned = parse_banned_moves(engine.board_mut(), &moves)?;
                    engine.ban_moves(banned.clone());
                    Ok::<_, UcciError>(banned)
                });
                if let Err(e) = banned {
                    self.report_error(e);
                }
            }
            UcciCommand::Go(params) => {
                let out = Arc::clone(&self.out);
                let started = self.controller.start_search(params, move |result| match result {
                    Ok(result) => match result.best_move {
                        Some(mv) => write_line(&out, format_args!("bestmove {mv}")),
                        None => write_line(&out, "nobestmove"),
                    },
                    Err(e) => {
                        write_line(&out, format_args!("info string error: {e}"));
                        write_line(&out, "nobestmove");
                    }
                });
                if let Err(e) = started {
                    self.report_error(e);
                    self.say("nobestmove");
                }
            }
            UcciCommand::Stop => {
                if let Some(info) = self.controller.signal_stop() {
                    self.say(format_args!("bestmove {}", info.best_move));
                }
            }
            UcciCommand::Quit => {
                self.controller.stop_search();
                self.say("bye");
                return false;
            }
            UcciCommand::Unknown(text) => warn!("unknown command: {text}"),
        }
        true
    }

    fn apply_option(&mut self, action: UcciOptionAction) {
        match action {
            UcciOptionAction::ResizeHash(mb) => self
                .controller
                .with_engine(|engine| engine.state_mut().reset_tables(mb)),
            UcciOptionAction::UseBook(on) => {
                self.controller.with_engine(|engine| engine.set_use_book(on));
            }
            UcciOptionAction::LoadBook(path) => {
                if let Err(e) = self.controller.with_engine(|engine| engine.load_book(&path)) {
                    self.report_error(format_args!("cannot read book {path}: {e}"));
                }
            }
        }
    }
}

/// Run the protocol on stdin/stdout until `quit` or end of input.
pub fn run_ucci_loop() {
    let stdin = io::stdin();
    let mut session = UcciSession::new(io::stdout());
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if !session.handle_line(&line) {
            return;
        }
    }
    session.wait_for_search();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_position_replays_moves() {
        let board = build_position(None, &["h2e2".to_string(), "h9g7".to_string()]).unwrap();
        assert_eq!(board.history().len(), 2);
        assert_eq!(board.team(), crate::board::Team::Red);
    }

    #[test]
    fn build_position_rejects_illegal_move() {
        let err = build_position(None, &["h2e2".to_string(), "h2e2".to_string()]).unwrap_err();
        assert!(matches!(err, UcciError::InvalidMove(_)));
    }

    #[test]
    fn build_position_rejects_bad_fen() {
        let err = build_position(Some("xyz w"), &[]).unwrap_err();
        assert!(matches!(err, UcciError::InvalidFen(_)));
    }

    #[test]
    fn banned_moves_must_be_legal() {
        let mut board = Board::new();
        let keys = parse_banned_moves(&mut board, &["h2e2".to_string()]).unwrap();
        assert_eq!(keys[0].id(), 7242);
        assert!(parse_banned_moves(&mut board, &["a0a9".to_string()]).is_err());
    }

    #[test]
    fn info_line_format() {
        let info = SearchIterationInfo {
            depth: 3,
            nodes: 1200,
            nps: 40000,
            time_ms: 30,
            score: 12,
            best_move: MoveKey::from_id(7242).unwrap(),
        };
        assert_eq!(
            format_info(&info),
            "info depth 3 score 12 time 30 nodes 1200 nps 40000 pv h2e2"
        );
    }
}
