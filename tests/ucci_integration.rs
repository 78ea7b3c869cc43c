use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use xiangqi_engine::ucci::options::UcciOptions;
use xiangqi_engine::ucci::{build_position, UcciSession};
use xiangqi_engine::SearchEngine;

/// Read engine output until a line starting with `prefix`.
fn read_until(reader: &mut impl BufRead, prefix: &str, output: &mut String) -> Option<String> {
    loop {
        let mut line = String::new();
        let bytes = reader.read_line(&mut line).expect("read failed");
        if bytes == 0 {
            return None;
        }
        output.push_str(&line);
        if line.starts_with(prefix) {
            return Some(line);
        }
    }
}

fn assert_legal(position_moves: &[&str], bestmove: &str) {
    let parts: Vec<&str> = bestmove.split_whitespace().collect();
    assert!(parts.len() >= 2, "bestmove missing move: {}", bestmove);
    let mut moves: Vec<String> = position_moves.iter().map(|m| m.to_string()).collect();
    moves.push(parts[1].to_string());
    assert!(
        build_position(None, &moves).is_ok(),
        "bestmove not legal in position: {}",
        parts[1]
    );
}

#[test]
fn ucci_smoke_test_returns_legal_move() {
    let exe = env!("CARGO_BIN_EXE_xiangqi_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);

    stdin
        .write_all(b"ucci\nisready\nposition startpos moves h2e2\ngo depth 3\n")
        .unwrap();

    let mut output = String::new();
    let bestmove = read_until(&mut reader, "bestmove", &mut output);

    stdin.write_all(b"quit\n").unwrap();
    let _ = child.wait();

    assert!(output.contains("ucciok"));
    assert!(output.contains("readyok"));
    assert!(output.contains("info depth 3 score"));

    let bestmove = bestmove.expect("no bestmove found");
    assert_legal(&["h2e2"], &bestmove);
}

#[test]
fn ucci_reports_options_and_handles_setoption() {
    let exe = env!("CARGO_BIN_EXE_xiangqi_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let input = b"ucci\nsetoption hashsize 4\nsetoption usebook false\nsetoption name bookfiles value /nonexistent/book.obk\nisready\nquit\n";
    child.stdin.as_mut().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("id name xiangqi_engine"));
    assert!(stdout.contains("option hashsize"));
    assert!(stdout.contains("option usebook"));
    assert!(stdout.contains("option bookfiles"));
    assert!(stdout.contains("ucciok"));
    assert!(stdout.contains("info string error: cannot read book"));
    assert!(stdout.contains("readyok"));
    assert!(stdout.contains("bye"));
}

#[test]
fn ucci_stop_interrupts_search() {
    let exe = env!("CARGO_BIN_EXE_xiangqi_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let stdin = Arc::new(Mutex::new(child.stdin.take().unwrap()));
    let stdout = child.stdout.take().unwrap();
    let mut reader = BufReader::new(stdout);

    stdin
        .lock()
        .unwrap()
        .write_all(b"ucci\nisready\nposition startpos\ngo infinite\n")
        .unwrap();

    let stdin_clone = Arc::clone(&stdin);
    let stop_thread = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        let _ = stdin_clone.lock().unwrap().write_all(b"stop\n");
    });

    let mut output = String::new();
    let bestmove = read_until(&mut reader, "bestmove", &mut output);

    let _ = stop_thread.join();
    stdin.lock().unwrap().write_all(b"quit\n").unwrap();
    let mut rest = String::new();
    let bye = read_until(&mut reader, "bye", &mut rest);
    let _ = child.wait();

    let bestmove = bestmove.expect("no bestmove found");
    assert_legal(&[], &bestmove);
    assert!(bye.is_some());
    // Exactly one answer per go.
    assert!(!rest.contains("bestmove"), "second bestmove: {}", rest);
}

#[test]
fn ucci_rejects_illegal_position() {
    let exe = env!("CARGO_BIN_EXE_xiangqi_engine");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn engine binary");

    let input = b"ucci\nposition startpos moves h2e2 h2e2\nposition fen bad w\nisready\nquit\n";
    child.stdin.as_mut().unwrap().write_all(input).unwrap();

    let output = child.wait_with_output().expect("failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("info string error").count(), 2);
    assert!(stdout.contains("readyok"));
}

// ============================================================================
// In-process session
// ============================================================================

fn session() -> UcciSession<Vec<u8>> {
    UcciSession::with_engine(Vec::new(), SearchEngine::new(14), UcciOptions::default())
}

fn take_output(session: &UcciSession<Vec<u8>>) -> String {
    let out = session.output();
    let mut out = out.lock();
    let text = String::from_utf8_lossy(&out).into_owned();
    out.clear();
    text
}

#[test]
fn session_banmoves_apply_to_next_go_only() {
    let mut session = session();
    // RED mates with i0i9 unless it is banned.
    assert!(session.handle_line("position fen 4k4/9/4P4/9/9/9/9/9/9/3K4R w - - 0 1"));
    assert!(session.handle_line("banmoves i0i9"));
    assert!(session.handle_line("go depth 3"));
    session.wait_for_search();
    let first = take_output(&session);
    assert!(first.contains("bestmove"));
    assert!(!first.contains("bestmove i0i9"), "{first}");

    assert!(session.handle_line("go depth 3"));
    session.wait_for_search();
    let second = take_output(&session);
    assert!(second.contains("bestmove i0i9"), "{second}");
}

#[test]
fn session_reports_nobestmove_without_legal_moves() {
    let mut session = session();
    assert!(session.handle_line("position fen 4k3R/9/4P4/9/9/9/9/9/9/3K5 b - - 0 1"));
    assert!(session.handle_line("go depth 2"));
    session.wait_for_search();
    assert!(take_output(&session).contains("nobestmove"));
}

#[test]
fn session_rejects_illegal_banmove() {
    let mut session = session();
    assert!(session.handle_line("position startpos"));
    assert!(session.handle_line("banmoves a0a9"));
    assert!(take_output(&session).contains("info string error"));
}

#[test]
fn session_quit_ends_loop() {
    let mut session = session();
    assert!(session.handle_line("isready"));
    assert!(!session.handle_line("quit"));
    let text = take_output(&session);
    assert!(text.contains("readyok"));
    assert!(text.trim_end().ends_with("bye"));
}
