use std::io::{self, BufRead, Write};

use shakmaty::{CastlingMode, Move};
use tracing::{debug, info, warn};

use crate::error::{SearchError, UciError};
use crate::evaluation::{EvalWeights, MAX_CHECK_BONUS, MAX_MATERIAL_WEIGHT, MAX_MOBILITY_WEIGHT};
use crate::register::{Horizon, MAX_HORIZON};
use crate::rules::Game;
use crate::search::{Engine, format_score};
use crate::types::{DEFAULT_HORIZON, EngineConfig};

/// Whether the command loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Current game and engine settings between commands.
#[derive(Debug, Default)]
pub struct UciSession {
    game: Game,
    config: EngineConfig,
}

impl UciSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handles one command line, writing any protocol output to `out`.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<Flow, UciError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            return Ok(Flow::Continue);
        };

        match command {
            "uci" => {
                writeln!(out, "id name packbot")?;
                writeln!(out, "id author packbot developers")?;
                writeln!(
                    out,
                    "option name Depth type spin default {DEFAULT_HORIZON} min 1 max {MAX_HORIZON}"
                )?;
                let weights = EvalWeights::default();
                writeln!(
                    out,
                    "option name MaterialWeight type spin default {} min 0 max {MAX_MATERIAL_WEIGHT}",
                    weights.material
                )?;
                writeln!(
                    out,
                    "option name MobilityWeight type spin default {} min 0 max {MAX_MOBILITY_WEIGHT}",
                    weights.mobility
                )?;
                writeln!(
                    out,
                    "option name CheckBonus type spin default {} min 0 max {MAX_CHECK_BONUS}",
                    weights.check_bonus
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.game = Game::default(),
            "position" => self.game = parse_position(&tokens)?,
            "go" => self.go(&tokens, out)?,
            "setoption" => parse_setoption(&tokens, &mut self.config)?,
            "quit" => return Ok(Flow::Quit),
            other => debug!(command = other, "ignoring unknown command"),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn go(&mut self, tokens: &[&str], out: &mut impl Write) -> Result<(), UciError> {
        let mut config = self.config;
        if let Some(horizon) = parse_go_depth(tokens)? {
            config.horizon = horizon;
        }

        match Engine::new(config).think(&mut self.game) {
            Ok(decision) => {
                let pv: Vec<String> = decision.pv.iter().map(uci_move).collect();
                writeln!(
                    out,
                    "info depth {} {} nodes {} pv {}",
                    config.horizon.plies(),
                    format_score(decision.score(), config.horizon),
                    decision.stats.nodes,
                    pv.join(" ")
                )?;
                writeln!(out, "bestmove {}", uci_move(&decision.best_move))?;
            }
            Err(SearchError::NoLegalMoves) => {
                info!("no legal move in current position");
                writeln!(out, "bestmove 0000")?;
            }
        }
        Ok(())
    }
}

/// Runs the command loop over stdin until `quit` or end of input.
pub fn run() -> Result<(), UciError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = UciSession::new();

    for line in stdin.lock().lines() {
        let line = line?;
        debug!(cmd = %line.trim(), "received UCI command");
        match session.handle(&line, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(UciError::Io { source }) => return Err(UciError::Io { source }),
            Err(e) => warn!(error = %e, "UCI command failed"),
        }
    }

    info!("packbot shutting down");
    Ok(())
}

fn uci_move(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

/// Builds the game described by a `position` command.
fn parse_position(tokens: &[&str]) -> Result<Game, UciError> {
    let mut idx = 1;
    let mut game = match tokens.get(idx) {
        Some(&"startpos") => {
            idx += 1;
            Game::default()
        }
        Some(&"fen") => {
            idx += 1;
            let start = idx;
            while idx < tokens.len() && tokens[idx] != "moves" {
                idx += 1;
            }
            Game::from_fen(&tokens[start..idx].join(" "))?
        }
        _ => return Err(UciError::MalformedPosition),
    };

    if tokens.get(idx) == Some(&"moves") {
        for &move_str in &tokens[idx + 1..] {
            game.play_uci(move_str)?;
        }
    }

    game.commit();
    Ok(game)
}

/// Extracts `depth N` from a `go` command. Clock parameters are ignored.
fn parse_go_depth(tokens: &[&str]) -> Result<Option<Horizon>, UciError> {
    let Some(pos) = tokens.iter().position(|&t| t == "depth") else {
        return Ok(None);
    };
    let value = tokens.get(pos + 1).copied().unwrap_or_default();
    parse_horizon(value).map(Some)
}

fn parse_horizon(value: &str) -> Result<Horizon, UciError> {
    let invalid = || UciError::InvalidDepth {
        value: value.to_string(),
    };
    let plies: u8 = value.parse().map_err(|_| invalid())?;
    Horizon::new(plies).map_err(|_| invalid())
}

fn parse_setoption(tokens: &[&str], config: &mut EngineConfig) -> Result<(), UciError> {
    let name_idx = tokens.iter().position(|&t| t == "name");
    let value_idx = tokens.iter().position(|&t| t == "value");

    let (Some(ni), Some(vi)) = (name_idx, value_idx) else {
        return Ok(());
    };
    if vi <= ni {
        return Ok(());
    }
    let name = tokens[ni + 1..vi].join(" ");
    let value = tokens[vi + 1..].join(" ");

    let weight = |max: i32| {
        value
            .parse::<i32>()
            .ok()
            .filter(|w| (0..=max).contains(w))
            .ok_or_else(|| UciError::InvalidOptionValue {
                name: name.clone(),
                value: value.clone(),
            })
    };

    match name.to_lowercase().as_str() {
        "depth" => config.horizon = parse_horizon(&value)?,
        "materialweight" => config.weights.material = weight(MAX_MATERIAL_WEIGHT)?,
        "mobilityweight" => config.weights.mobility = weight(MAX_MOBILITY_WEIGHT)?,
        "checkbonus" => config.weights.check_bonus = weight(MAX_CHECK_BONUS)?,
        _ => return Err(UciError::UnknownOption { name: name.clone() }),
    }
    Ok(())
}
