use shakmaty::{Color, Move};
use tracing::{debug, trace, warn};

use crate::error::SearchError;
use crate::evaluation::{Evaluator, HeuristicEvaluator};
use crate::ordering::order_moves;
use crate::pv::extract_pv;
use crate::register::{Horizon, Outcome, Register, Stance};
use crate::rules::{Game, Played, Rules};
use crate::types::{BASELINE, Decision, EngineConfig, MATE_SCORE, Score, SearchStats};

/// State for one decision: who is searching, how deep, and what it cost.
pub struct Search<'e, E> {
    evaluator: &'e E,
    horizon: Horizon,
    agent: Color,
    pub stats: SearchStats,
}

impl<'e, E> Search<'e, E> {
    pub fn new(evaluator: &'e E, horizon: Horizon, agent: Color) -> Self {
        Self {
            evaluator,
            horizon,
            agent,
            stats: SearchStats::default(),
        }
    }

    /// Searches the full horizon from `pos` with an open window.
    pub fn run<R>(&mut self, pos: &mut R) -> Outcome
    where
        R: Rules,
        E: Evaluator<R>,
    {
        self.alpha_beta(pos, None, None, self.horizon.plies(), Stance::Maximizing)
    }

    /// Minimax with alpha-beta pruning over packed registers.
    ///
    /// The returned register carries the best line below this node: the slot
    /// for `depth` holds the chosen move's index, deeper slots come from the
    /// child. `alpha` and `beta` are `None` while still open. Children only
    /// ever see the score part of the bounds, so their slots never collide
    /// with ours.
    ///
    /// Cutoffs compare scores and fire on ties, so a later move never
    /// displaces an earlier one of equal value. A node that accepts no child
    /// hands its inherited bound back without a path, and the parent cuts off
    /// on it.
    pub fn alpha_beta<R>(
        &mut self,
        pos: &mut R,
        mut alpha: Option<Register>,
        mut beta: Option<Register>,
        depth: u8,
        stance: Stance,
    ) -> Outcome
    where
        R: Rules,
        E: Evaluator<R>,
    {
        self.stats.nodes += 1;

        if depth == 0 || pos.is_draw() || pos.is_checkmate() {
            return self.leaf(pos, depth);
        }

        let moves = order_moves(pos);
        if moves.is_empty() {
            return self.leaf(pos, depth);
        }

        let slot = depth - 1;
        let mut best: Option<Register> = None;
        for (index, mv) in moves.iter().enumerate() {
            let child = {
                let mut played = Played::new(pos, mv);
                self.alpha_beta(
                    &mut *played,
                    alpha.map(Register::score_only),
                    beta.map(Register::score_only),
                    depth - 1,
                    stance.flip(),
                )
            };

            let Outcome::Scored(child) = child else {
                continue;
            };
            let Some(candidate) = child.with_move_index(slot, index) else {
                // Index no longer fits a slot; the rest of the list is unreachable.
                break;
            };
            let score = candidate.score();

            match stance {
                Stance::Minimizing => {
                    if alpha.is_some_and(|a| score <= a.score()) {
                        self.stats.cutoffs += 1;
                        trace!(depth, index, "fail low");
                        return Outcome::Pruned;
                    }
                    if best.is_none_or(|b| score < b.score()) {
                        best = Some(candidate);
                        if beta.is_none_or(|b| score < b.score()) {
                            beta = Some(candidate);
                        }
                    }
                }
                Stance::Maximizing => {
                    if beta.is_some_and(|b| score >= b.score()) {
                        self.stats.cutoffs += 1;
                        trace!(depth, index, "fail high");
                        return Outcome::Pruned;
                    }
                    if best.is_none_or(|b| score > b.score()) {
                        best = Some(candidate);
                        if alpha.is_none_or(|a| score > a.score()) {
                            alpha = Some(candidate);
                        }
                    }
                }
            }
        }

        let fallback = match stance {
            Stance::Minimizing => beta,
            Stance::Maximizing => alpha,
        };
        best.or(fallback).map_or(Outcome::Pruned, Outcome::Scored)
    }

    fn leaf<R>(&mut self, pos: &R, depth: u8) -> Outcome
    where
        R: Rules,
        E: Evaluator<R>,
    {
        self.stats.leaves += 1;
        let score = self.evaluator.evaluate(pos, self.agent, depth);
        Outcome::Scored(Register::from_score(score))
    }
}

/// Picks a move for the side to move at `pos`, searching `horizon` plies.
///
/// `pos` is left exactly as it was found.
pub fn decide<R, E>(
    pos: &mut R,
    evaluator: &E,
    horizon: Horizon,
) -> Result<Decision<R::Move>, SearchError>
where
    R: Rules,
    E: Evaluator<R>,
{
    if pos.legal_moves().is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    let mut search = Search::new(evaluator, horizon, pos.turn());
    let register = match search.run(pos) {
        Outcome::Scored(register) => register,
        Outcome::Pruned => {
            // An open window cannot fail; decode falls back to the first move.
            warn!("root search was pruned");
            Register::MIN
        }
    };

    let pv = extract_pv(pos, register, horizon);
    let best_move = pv.first().cloned().ok_or(SearchError::NoLegalMoves)?;

    debug!(
        horizon = horizon.plies(),
        score = register.score(),
        nodes = search.stats.nodes,
        leaves = search.stats.leaves,
        cutoffs = search.stats.cutoffs,
        pv_len = pv.len(),
        "search complete"
    );

    Ok(Decision {
        best_move,
        pv,
        register,
        stats: search.stats,
    })
}

/// A configured chess bot over [`Game`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    pub config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn think(&self, game: &mut Game) -> Result<Decision<Move>, SearchError> {
        let evaluator = HeuristicEvaluator::new(self.config.weights);
        decide(game, &evaluator, self.config.horizon)
    }
}

/// Format a register score for UCI output (centipawn-like or mate-in-N).
pub fn format_score(score: Score, horizon: Horizon) -> String {
    if score >= MATE_SCORE {
        let depth_left = score - MATE_SCORE;
        let mate_ply = u16::from(horizon.plies()).saturating_sub(depth_left);
        format!("score mate {}", mate_ply.div_ceil(2))
    } else {
        format!("score cp {}", i32::from(score) - BASELINE)
    }
}
