use crate::evaluation::EvalWeights;
use crate::register::{Horizon, Register};

/// Evaluation score as stored in the register's top 16 bits.
pub type Score = u16;

/// Score for a draw, or for the agent being checkmated.
pub const LOSS_SCORE: Score = 1;

/// Base score for checkmating the opponent; the remaining depth is added on top.
pub const MATE_SCORE: Score = 0xFFF0;

/// Neutral score a non-terminal evaluation starts from.
pub const BASELINE: i32 = 0x7FFF;

pub const DEFAULT_HORIZON: u8 = 4;

/// Upper bound on legal moves in any chess position; sizes move lists.
pub const MAX_MOVES: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub horizon: Horizon,
    pub weights: EvalWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon: Horizon::default(),
            weights: EvalWeights::default(),
        }
    }
}

/// Counters collected while searching one decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Interior and leaf nodes entered.
    pub nodes: u64,
    /// Evaluator calls.
    pub leaves: u64,
    /// Nodes abandoned by a cutoff.
    pub cutoffs: u64,
}

/// Outcome of one decision: the move to play and the line behind it.
#[derive(Clone, Debug)]
pub struct Decision<M> {
    pub best_move: M,
    pub pv: Vec<M>,
    pub register: Register,
    pub stats: SearchStats,
}

impl<M> Decision<M> {
    pub fn score(&self) -> Score {
        self.register.score()
    }
}
