//! UCI protocol driver (spec.md §6 "External interfaces" / "Driver protocol
//! contract"): the messenger component that turns stdin lines into
//! `SearchEngine` calls and turns progress/bestmove back into stdout lines.
//!
//! Grounded on the teacher's `src/uci.rs` (background search thread + a
//! dedicated printer thread draining an mpsc channel, so the search thread
//! never has to contend for stdout) and `src/uci/command.rs`/`options.rs`
//! (structured command/`go`-params parsing and `setoption` handling) in
//! place of the simpler version's ad hoc `match parts[i]` loop.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use crate::board::Board;
use crate::chess_move::Move;
use crate::error::{FenError, MoveParseError};
use crate::eval::Evaluator;
use crate::search::limiter::StrengthLimiter;
use crate::search::time_control::TimeBudgetInput;
use crate::search::SearchEngine;
use crate::types::Color;

#[derive(Debug, Clone)]
pub enum UciError {
    InvalidFen(FenError),
    InvalidMove { notation: String, error: MoveParseError },
    MissingParts,
}

impl std::fmt::Display for UciError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "invalid fen: {e}"),
            UciError::InvalidMove { notation, error } => {
                write!(f, "invalid move '{notation}': {error}")
            }
            UciError::MissingParts => write!(f, "missing required parts in position command"),
        }
    }
}

impl std::error::Error for UciError {}

#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(Vec<String>),
    Go(Vec<String>),
    SetOption(Vec<String>),
    Stop,
    PonderHit,
    Quit,
    Unknown(String),
}

#[must_use]
pub fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let owned = || parts.iter().map(|p| (*p).to_string()).collect();
    Some(match parts[0] {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(owned()),
        "go" => UciCommand::Go(owned()),
        "setoption" => UciCommand::SetOption(owned()),
        "stop" => UciCommand::Stop,
        "ponderhit" => UciCommand::PonderHit,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(trimmed.to_string()),
    })
}

/// Parsed "go (wtime, btime, winc, binc, movestogo, depth, nodes, movetime,
/// mate, infinite, searchmoves, multipv)" arguments (spec.md §6).
#[derive(Default, Debug, Clone)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub mate: Option<u32>,
    pub infinite: bool,
    pub multi_pv: Option<usize>,
}

fn parse_next<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

#[must_use]
pub fn parse_go_params(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;
    while i < parts.len() {
        let consumed = match parts[i] {
            "wtime" => { params.wtime = parse_next(parts, i); 2 }
            "btime" => { params.btime = parse_next(parts, i); 2 }
            "winc" => { params.winc = parse_next(parts, i); 2 }
            "binc" => { params.binc = parse_next(parts, i); 2 }
            "movestogo" => { params.movestogo = parse_next(parts, i); 2 }
            "movetime" => { params.movetime = parse_next(parts, i); 2 }
            "depth" => { params.depth = parse_next(parts, i); 2 }
            "nodes" => { params.nodes = parse_next(parts, i); 2 }
            "mate" => { params.mate = parse_next(parts, i); 2 }
            "multipv" => { params.multi_pv = parse_next(parts, i); 2 }
            "infinite" => { params.infinite = true; 1 }
            // "searchmoves"/"ponder" are accepted but not acted on.
            _ => 1,
        };
        i += consumed;
    }
    params
}

fn time_budget(board: &Board, params: &GoParams) -> TimeBudgetInput {
    if params.infinite {
        return TimeBudgetInput { infinite: true, node_limit: params.nodes, depth_limit: params.depth, ..Default::default() };
    }
    if let Some(ms) = params.movetime {
        return TimeBudgetInput {
            move_time: Some(Duration::from_millis(ms)),
            node_limit: params.nodes,
            depth_limit: params.depth,
            ..Default::default()
        };
    }
    if params.depth.is_some() || params.nodes.is_some() {
        return TimeBudgetInput { depth_limit: params.depth, node_limit: params.nodes, ..Default::default() };
    }
    let (remaining, increment) = match board.current().side_to_move() {
        Color::White => (params.wtime, params.winc),
        Color::Black => (params.btime, params.binc),
    };
    TimeBudgetInput {
        remaining: remaining.map(Duration::from_millis),
        increment: increment.map(Duration::from_millis).or(Some(Duration::ZERO)),
        moves_to_go: params.movestogo,
        ..Default::default()
    }
}

/// Apply "position [startpos|fen <fen>] [moves ...]" (spec.md §6).
pub fn apply_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;
    if i >= parts.len() {
        return Err(UciError::MissingParts);
    }
    if parts[i] == "startpos" {
        *board = Board::new();
        i += 1;
    } else if parts[i] == "fen" {
        if i + 6 >= parts.len() {
            return Err(UciError::MissingParts);
        }
        let fen = parts[i + 1..i + 7].join(" ");
        *board = Board::from_fen(&fen).map_err(UciError::InvalidFen)?;
        i += 7;
    } else {
        return Err(UciError::MissingParts);
    }

    if i < parts.len() && parts[i] == "moves" {
        let moves = &parts[i + 1..];
        board.replay(moves).map_err(|error| UciError::InvalidMove {
            notation: moves.first().unwrap_or(&"").to_string(),
            error,
        })?;
    }
    Ok(())
}

#[must_use]
pub fn format_uci_move(mv: Move) -> String {
    mv.to_string()
}

/// One "info" progress line's fields (spec.md §6's "depth, seldepth, time,
/// nodes, nps, score cp|score mate, pv"). `hashfull`/`currmove` are reported
/// separately since the search loop doesn't know the cache's fill ratio.
struct Info {
    depth: u32,
    seldepth: u32,
    time_ms: u128,
    nodes: u64,
    nps: u64,
    score_cp: Option<i32>,
    score_mate: Option<i32>,
    pv: String,
}

impl Info {
    fn to_uci_line(&self) -> String {
        let mut line = format!(
            "info depth {} seldepth {} time {} nodes {} nps {}",
            self.depth, self.seldepth, self.time_ms, self.nodes, self.nps
        );
        if let Some(mate) = self.score_mate {
            line.push_str(&format!(" score mate {mate}"));
        } else if let Some(cp) = self.score_cp {
            line.push_str(&format!(" score cp {cp}"));
        }
        if !self.pv.is_empty() {
            line.push_str(&format!(" pv {}", self.pv));
        }
        line
    }
}

/// Runs the UCI protocol loop against stdin/stdout until "quit". Owns the
/// board and a long-lived [`SearchEngine`] so the transposition cache and
/// move-ordering heuristics survive across "go" commands within one game,
/// the way the teacher's top-level `run_uci_loop` does.
pub fn run_uci_loop<E: Evaluator + Send + 'static>(evaluator: E, tt_size_mb: usize) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut board = Board::new();
    let engine = Arc::new(Mutex::new(SearchEngine::new(evaluator, tt_size_mb)));
    // Captured once: `SearchEngine::go` holds the engine mutex for the whole
    // search, so "stop" must be able to signal it without taking that same
    // lock. The flag itself is a standalone `Arc<AtomicBool>` handle that
    // stays valid across every `go()` call on this engine.
    let stop_flag = engine.lock().stop_flag();

    let mut search_thread: Option<JoinHandle<()>> = None;
    let mut searching = false;

    let (info_tx, info_rx): (Sender<Info>, _) = mpsc::channel();
    let _printer = thread::spawn(move || {
        let stdout = io::stdout();
        while let Ok(info) = info_rx.recv() {
            let mut lock = stdout.lock();
            writeln!(lock, "{}", info.to_uci_line()).ok();
            lock.flush().ok();
        }
    });

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(command) = parse_uci_command(&line) else { continue };

        match command {
            UciCommand::Uci => {
                println!("id name chess_engine");
                println!("id author the chess_engine developers");
                println!("option name Hash type spin default {tt_size_mb} min 1 max 65536");
                println!("option name MultiPV type spin default 1 min 1 max 64");
                println!(
                    "option name Skill Level type spin default {} min 0 max {}",
                    StrengthLimiter::MAX_SKILL,
                    StrengthLimiter::MAX_SKILL
                );
                println!("uciok");
            }
            UciCommand::IsReady => println!("readyok"),
            UciCommand::UciNewGame => {
                board = Board::new();
                engine.lock().new_game();
            }
            UciCommand::Position(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Err(e) = apply_position_command(&mut board, &parts) {
                    eprintln!("info string error: {e}");
                }
            }
            UciCommand::SetOption(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                apply_setoption(&parts, &engine);
            }
            UciCommand::Go(parts) => {
                if searching {
                    stop_flag.stop();
                    if let Some(handle) = search_thread.take() {
                        let _ = handle.join();
                    }
                }
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let go_params = parse_go_params(&parts);
                if let Some(multi_pv) = go_params.multi_pv {
                    engine.lock().set_multi_pv(multi_pv);
                }
                let budget = time_budget(&board, &go_params);
                let mut board_clone = board.clone();
                let engine_clone = Arc::clone(&engine);
                let tx = info_tx.clone();

                search_thread = Some(thread::spawn(move || {
                    let mut guard = engine_clone.lock();
                    let start = std::time::Instant::now();
                    let best = guard.go(&mut board_clone, budget, |progress| {
                        let elapsed = start.elapsed();
                        let nps = if elapsed.as_secs_f64() > 0.0 {
                            (progress.nodes as f64 / elapsed.as_secs_f64()) as u64
                        } else {
                            0
                        };
                        let (score_cp, score_mate) = if progress.score.abs() > crate::constants::MAX_NON_MATE_SCORE {
                            let moves = (crate::constants::MATE_SCORE - progress.score.abs() + 1) / 2;
                            (None, Some(if progress.score > 0 { moves } else { -moves }))
                        } else {
                            (Some(progress.score), None)
                        };
                        let pv = progress
                            .pv
                            .iter()
                            .map(|mv| format_uci_move(*mv))
                            .collect::<Vec<_>>()
                            .join(" ");
                        let _ = tx.send(Info {
                            depth: progress.depth,
                            seldepth: progress.seldepth,
                            time_ms: elapsed.as_millis(),
                            nodes: progress.nodes,
                            nps,
                            score_cp,
                            score_mate,
                            pv,
                        });
                    });
                    match best {
                        Some(mv) => println!("bestmove {}", format_uci_move(mv)),
                        None => println!("bestmove 0000"),
                    }
                }));
                searching = true;
            }
            UciCommand::Stop => {
                stop_flag.stop();
                if let Some(handle) = search_thread.take() {
                    let _ = handle.join();
                }
                searching = false;
            }
            UciCommand::PonderHit => {}
            UciCommand::Quit => {
                stop_flag.stop();
                if let Some(handle) = search_thread.take() {
                    let _ = handle.join();
                }
                break;
            }
            UciCommand::Unknown(text) => eprintln!("info string unknown command: {text}"),
        }

        stdout.flush().ok();
    }
}

fn apply_setoption<E: Evaluator>(parts: &[&str], engine: &Arc<Mutex<SearchEngine<E>>>) {
    let mut mode = "";
    let mut name_parts = Vec::new();
    let mut value_parts = Vec::new();
    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(*part),
                "value" => value_parts.push(*part),
                _ => {}
            },
        }
    }
    let name = name_parts.join(" ").to_ascii_lowercase();
    let value = value_parts.join(" ");
    match name.as_str() {
        "skill level" => {
            if let Ok(level) = value.parse::<u8>() {
                let rng = crate::rng::EngineRng::from_entropy();
                engine.lock().set_strength_limiter(StrengthLimiter::new(level, rng));
            }
        }
        "multipv" => {
            if let Ok(n) = value.parse::<usize>() {
                engine.lock().set_multi_pv(n);
            }
        }
        _ => {}
    }
}
