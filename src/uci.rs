//! Universal Chess Interface command loop: parses stdin lines into
//! commands, drives an `Engine`, and writes UCI-formatted responses to
//! stdout.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::engine::{resolve_move, Engine, GoRequest};
use crate::moves::Move;
use crate::position::Position;
use crate::search::{SearchInfo, MATE_SCORE, MATE_THRESHOLD};

const ENGINE_NAME: &str = "chess_core";
const ENGINE_AUTHOR: &str = "chess_core contributors";

#[derive(Debug, Clone)]
enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    SetOption { name: String, value: Option<String> },
    Position { fen: Option<String>, moves: Vec<String> },
    Go(GoRequest),
    Stop,
    Quit,
}

fn parse_command(line: &str) -> Option<UciCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    match parts[0] {
        "uci" => Some(UciCommand::Uci),
        "isready" => Some(UciCommand::IsReady),
        "ucinewgame" => Some(UciCommand::UciNewGame),
        "setoption" => {
            let (name, value) = crate::config::parse_setoption_args(&parts[1..])?;
            Some(UciCommand::SetOption { name, value })
        }
        "position" => parse_position(&parts),
        "go" => Some(UciCommand::Go(parse_go(&parts))),
        "stop" => Some(UciCommand::Stop),
        "quit" => Some(UciCommand::Quit),
        _ => None,
    }
}

fn parse_position(parts: &[&str]) -> Option<UciCommand> {
    let mut i = 1;
    let fen = if parts.get(i) == Some(&"startpos") {
        i += 1;
        None
    } else if parts.get(i) == Some(&"fen") {
        if i + 6 >= parts.len() {
            return None;
        }
        let fen_str = parts[i + 1..i + 7].join(" ");
        i += 7;
        Some(fen_str)
    } else {
        return None;
    };

    let mut moves = Vec::new();
    if parts.get(i) == Some(&"moves") {
        i += 1;
        moves.extend(parts[i..].iter().map(|s| s.to_string()));
    }

    Some(UciCommand::Position { fen, moves })
}

fn parse_go(parts: &[&str]) -> GoRequest {
    let mut request = GoRequest::default();
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                request.depth = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "nodes" => {
                request.nodes = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movetime" => {
                request.movetime_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "wtime" => {
                request.wtime_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "btime" => {
                request.btime_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "winc" => {
                request.winc_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "binc" => {
                request.binc_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movestogo" => {
                request.movestogo = parts.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "infinite" => {
                request.infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    request
}

fn format_score(score: i32) -> String {
    if score.abs() >= MATE_THRESHOLD {
        let plies_to_mate = MATE_SCORE - score.abs();
        let moves_to_mate = (plies_to_mate + 1) / 2;
        let signed = if score > 0 { moves_to_mate } else { -moves_to_mate };
        format!("mate {signed}")
    } else {
        format!("cp {score}")
    }
}

fn format_info_line(info: &SearchInfo) -> String {
    let mut line = format!(
        "info depth {} seldepth {} score {} nodes {} nps {} time {} hashfull {}",
        info.depth,
        info.seldepth,
        format_score(info.score),
        info.nodes,
        info.nps,
        info.time_ms,
        info.hashfull
    );
    if !info.pv.is_empty() {
        line.push_str(" pv");
        for mv in &info.pv {
            line.push(' ');
            line.push_str(&mv.to_long_algebraic());
        }
    }
    line
}

fn format_bestmove(mv: Option<Move>) -> String {
    match mv {
        Some(mv) => format!("bestmove {}", mv.to_long_algebraic()),
        None => "bestmove 0000".to_string(),
    }
}

fn print_uci_identity(engine: &Engine) {
    println!("id name {ENGINE_NAME}");
    println!("id author {ENGINE_AUTHOR}");
    for line in engine.config().uci_option_lines() {
        println!("{line}");
    }
    println!("uciok");
}

/// Applies a `position` command's FEN/startpos + move strings, logging (but
/// not failing the whole loop on) an unparseable or illegal move string.
fn apply_position_command(engine: &mut Engine, fen: Option<&str>, move_strings: &[String]) {
    let root = match fen {
        Some(fen) => match Position::from_fen(fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("info string invalid fen: {err}");
                return;
            }
        },
        None => Position::startpos(),
    };

    let mut replay = root;
    let mut moves = Vec::with_capacity(move_strings.len());
    for text in move_strings {
        match resolve_move(&replay, text) {
            Ok(mv) => {
                let mut next = replay;
                next = {
                    let mut stack = crate::position::PositionStack::new(next);
                    stack.play_move(mv);
                    *stack.current()
                };
                replay = next;
                moves.push(mv);
            }
            Err(err) => {
                eprintln!("info string invalid move '{text}': {err}");
                break;
            }
        }
    }

    engine.set_position(root, &moves);
}

/// Runs the UCI command loop against stdin/stdout until `quit`.
pub fn run() {
    let stdin = io::stdin();
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(command) = parse_command(&line) else { continue };

        match command {
            UciCommand::Uci => print_uci_identity(&engine),
            UciCommand::IsReady => {
                println!("readyok");
            }
            UciCommand::UciNewGame => engine.new_game(),
            UciCommand::SetOption { name, value } => {
                if let Err(err) = engine.set_option(&name, value.as_deref()) {
                    eprintln!("info string {err}");
                }
            }
            UciCommand::Position { fen, moves } => {
                apply_position_command(&mut engine, fen.as_deref(), &moves);
            }
            UciCommand::Go(request) => {
                engine.go(
                    request,
                    |info| {
                        println!("{}", format_info_line(info));
                        let _ = io::stdout().flush();
                    },
                    |best| {
                        println!("{}", format_bestmove(best));
                        let _ = io::stdout().flush();
                    },
                );
            }
            UciCommand::Stop => engine.stop(),
            UciCommand::Quit => {
                engine.stop();
                break;
            }
        }
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position_startpos_with_moves() {
        let cmd = parse_command("position startpos moves e2e4 e7e5").unwrap();
        match cmd {
            UciCommand::Position { fen, moves } => {
                assert_eq!(fen, None);
                assert_eq!(moves, vec!["e2e4", "e7e5"]);
            }
            _ => panic!("expected a Position command"),
        }
    }

    #[test]
    fn parses_position_fen() {
        let cmd = parse_command("position fen 8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        match cmd {
            UciCommand::Position { fen, moves } => {
                assert_eq!(fen.as_deref(), Some("8/8/8/8/8/8/8/K6k w - - 0 1"));
                assert!(moves.is_empty());
            }
            _ => panic!("expected a Position command"),
        }
    }

    #[test]
    fn parses_go_with_time_controls() {
        let cmd = parse_command("go wtime 30000 btime 25000 winc 100 binc 100").unwrap();
        match cmd {
            UciCommand::Go(request) => {
                assert_eq!(request.wtime_ms, Some(30000));
                assert_eq!(request.btime_ms, Some(25000));
                assert_eq!(request.winc_ms, Some(100));
                assert_eq!(request.binc_ms, Some(100));
            }
            _ => panic!("expected a Go command"),
        }
    }

    #[test]
    fn formats_mate_scores() {
        assert_eq!(format_score(MATE_SCORE - 1), "mate 1");
        assert_eq!(format_score(-(MATE_SCORE - 3)), "mate -2");
        assert_eq!(format_score(42), "cp 42");
    }

    #[test]
    fn formats_bestmove_with_no_legal_move_as_null() {
        assert_eq!(format_bestmove(None), "bestmove 0000");
    }

    #[test]
    #[allow(unused_must_use)]
    fn ignores_unknown_commands() {
        let _ = Duration::from_millis(0);
        assert!(parse_command("flibbertigibbet").is_none());
    }
}
