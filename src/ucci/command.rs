use crate::engine::GoParams;

/// Clock share used when `go time` gives the remaining time.
const MOVES_TO_GO: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UcciCommand {
    Ucci,
    IsReady,
    SetOption { name: String, value: Option<String> },
    /// `fen: None` is the start position.
    Position { fen: Option<String>, moves: Vec<String> },
    BanMoves(Vec<String>),
    Go(GoParams),
    Stop,
    Quit,
    Unknown(String),
}

pub fn parse_ucci_command(line: &str) -> Option<UcciCommand> {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    let owned = |items: &[&str]| items.iter().map(|p| (*p).to_string()).collect::<Vec<String>>();

    let cmd = match parts[0] {
        "ucci" => UcciCommand::Ucci,
        "isready" => UcciCommand::IsReady,
        "setoption" => match parse_setoption(&parts) {
            Some((name, value)) => UcciCommand::SetOption { name, value },
            None => UcciCommand::Unknown(trimmed.to_string()),
        },
        "position" => match parse_position(&parts) {
            Some((fen, moves)) => UcciCommand::Position {
                fen,
                moves: owned(moves),
            },
            None => UcciCommand::Unknown(trimmed.to_string()),
        },
        "banmoves" => UcciCommand::BanMoves(owned(&parts[1..])),
        "go" => UcciCommand::Go(parse_go(&parts)),
        "stop" => UcciCommand::Stop,
        "quit" => UcciCommand::Quit,
        _ => UcciCommand::Unknown(trimmed.to_string()),
    };

    Some(cmd)
}

/// `position startpos|fen <fen...> [moves m1 m2 ...]`
fn parse_position<'p>(parts: &'p [&'p str]) -> Option<(Option<String>, &'p [&'p str])> {
    let moves_at = parts.iter().position(|p| *p == "moves").unwrap_or(parts.len());
    let moves = parts.get(moves_at + 1..).unwrap_or(&[]);
    match parts.get(1).copied() {
        Some("startpos") => Some((None, moves)),
        Some("fen") if moves_at > 2 => Some((Some(parts[2..moves_at].join(" ")), moves)),
        _ => None,
    }
}

/// `go [depth N] [time T [increment I]] [movetime T] [infinite]`
fn parse_go(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut clock: Option<u64> = None;
    let mut increment = 0u64;
    let value = |i: usize| parts.get(i + 1).and_then(|v| v.parse::<u64>().ok());

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                params.depth = value(i).map(|d| d.clamp(1, u64::from(u32::MAX)) as u32);
                i += 2;
            }
            "time" => {
                clock = value(i);
                i += 2;
            }
            "increment" => {
                increment = value(i).unwrap_or(0);
                i += 2;
            }
            "movetime" => {
                params.time_ms = value(i);
                i += 2;
            }
            "infinite" => {
                params.time_ms = Some(0);
                i += 1;
            }
            _ => i += 1,
        }
    }

    if params.time_ms.is_none() {
        params.time_ms = clock.map(|t| (t / MOVES_TO_GO + increment).max(1));
    }
    params
}

/// UCCI options are `setoption <name> <value>`; the UCI form
/// `setoption name <name> value <value>` is accepted too.
#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.first() != Some(&"setoption") || parts.len() < 2 {
        return None;
    }

    if parts[1] == "name" {
        let value_at = parts.iter().position(|p| *p == "value");
        let name_end = value_at.unwrap_or(parts.len());
        if name_end <= 2 {
            return None;
        }
        let name = parts[2..name_end].join(" ");
        let value = value_at
            .filter(|&v| v + 1 < parts.len())
            .map(|v| parts[v + 1..].join(" "));
        return Some((name, value));
    }

    let value = (parts.len() > 2).then(|| parts[2..].join(" "));
    Some((parts[1].to_string(), value))
}
