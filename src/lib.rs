//! Fixed-horizon alpha-beta chess search.
//!
//! One recursive routine searches, picks the root move, and records the
//! principal variation, all through a packed [`Register`]. Chess rules come
//! from `shakmaty` behind the [`Rules`] trait.

pub mod error;
pub mod evaluation;
pub mod ordering;
pub mod pv;
pub mod register;
pub mod rules;
pub mod search;
pub mod types;
pub mod uci;

pub use error::{ConfigError, GameError, SearchError, UciError};
pub use evaluation::{EvalWeights, Evaluator, HeuristicEvaluator};
pub use ordering::order_moves;
pub use pv::extract_pv;
pub use register::{Horizon, Outcome, Register, Stance};
pub use rules::{Game, MoveList, Played, Rules};
pub use search::{Engine, Search, decide, format_score};
pub use types::{Decision, EngineConfig, Score, SearchStats};
