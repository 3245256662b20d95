use shakmaty::{Color, Role};

use crate::rules::Rules;
use crate::types::{BASELINE, LOSS_SCORE, MATE_SCORE, Score};

/// Material values for the non-king roles.
pub const PIECE_VALUES: [(Role, i32); 5] = [
    (Role::Pawn, 1),
    (Role::Knight, 3),
    (Role::Bishop, 3),
    (Role::Rook, 5),
    (Role::Queen, 9),
];

/// Scores leaf positions for the searching agent.
///
/// Scores are never negative and higher is better for `agent`, whoever is to
/// move.
pub trait Evaluator<R: Rules> {
    fn evaluate(&self, pos: &R, agent: Color, depth_remaining: u8) -> Score;
}

/// Largest accepted [`EvalWeights::material`].
pub const MAX_MATERIAL_WEIGHT: i32 = 400;
/// Largest accepted [`EvalWeights::mobility`].
pub const MAX_MOBILITY_WEIGHT: i32 = 50;
/// Largest accepted [`EvalWeights::check_bonus`].
pub const MAX_CHECK_BONUS: i32 = 500;

/// Term weights for [`HeuristicEvaluator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalWeights {
    /// Multiplier on the material difference.
    pub material: i32,
    /// Multiplier on the side to move's legal move count.
    pub mobility: i32,
    pub check_bonus: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 75,
            mobility: 1,
            check_bonus: 30,
        }
    }
}

/// Material, mobility, and check-framing evaluation with terminal handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeuristicEvaluator {
    pub weights: EvalWeights,
}

impl HeuristicEvaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }
}

impl<R: Rules> Evaluator<R> for HeuristicEvaluator {
    fn evaluate(&self, pos: &R, agent: Color, depth_remaining: u8) -> Score {
        let agent_to_move = pos.turn() == agent;

        if pos.is_checkmate() {
            return if agent_to_move {
                LOSS_SCORE
            } else {
                // Earlier mates keep more depth and score higher.
                MATE_SCORE.saturating_add(Score::from(depth_remaining))
            };
        }
        if pos.is_draw() {
            return LOSS_SCORE;
        }

        // Weights are caller-supplied, so every term saturates.
        let w = &self.weights;
        let mut eval = BASELINE;
        let balance = material(pos, agent) - material(pos, !agent);
        eval = eval.saturating_add(w.material.saturating_mul(balance));
        eval = eval.saturating_add(w.mobility.saturating_mul(pos.mobility() as i32));
        if agent_to_move != pos.is_check() {
            eval = eval.saturating_add(w.check_bonus);
        }

        eval.clamp(i32::from(LOSS_SCORE) + 1, i32::from(MATE_SCORE) - 1) as Score
    }
}

/// Sum of `color`'s piece values, king excluded.
pub fn material<R: Rules>(pos: &R, color: Color) -> i32 {
    PIECE_VALUES
        .iter()
        .map(|&(role, value)| pos.piece_count(color, role) as i32 * value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Game;

    const FOOLS_MATE: &str = "rnbqkbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

    fn eval(fen: &str, agent: Color, depth: u8) -> Score {
        let game = Game::from_fen(fen).unwrap();
        HeuristicEvaluator::default().evaluate(&game, agent, depth)
    }

    #[test]
    fn test_agent_checkmated_is_minimal() {
        assert_eq!(eval(FOOLS_MATE, Color::White, 0), LOSS_SCORE);
        assert_eq!(eval(FOOLS_MATE, Color::White, 3), LOSS_SCORE);
    }

    #[test]
    fn test_opponent_checkmated_prefers_shallow_mates() {
        let deep = eval(FOOLS_MATE, Color::Black, 0);
        let shallow = eval(FOOLS_MATE, Color::Black, 3);
        assert_eq!(deep, MATE_SCORE);
        assert_eq!(shallow, MATE_SCORE + 3);
        assert!(shallow > deep);
    }

    #[test]
    fn test_draw_scores_like_a_loss() {
        let stalemate = "k7/8/1Q6/8/8/8/8/7K b - - 0 1";
        assert_eq!(eval(stalemate, Color::White, 2), LOSS_SCORE);
        assert_eq!(eval(stalemate, Color::Black, 2), LOSS_SCORE);
    }

    #[test]
    fn test_startpos_breakdown() {
        // Equal material, 20 moves, agent to move and not in check.
        let score = eval(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            Color::White,
            0,
        );
        assert_eq!(i32::from(score), BASELINE + 20 + 30);
    }

    #[test]
    fn test_material_advantage_raises_score() {
        let fen = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let white = eval(fen, Color::White, 0);
        let black = eval(fen, Color::Black, 0);
        assert!(i32::from(white) > BASELINE + 9 * 75 - 100);
        assert!(i32::from(black) < BASELINE - 9 * 75 + 100);
    }

    #[test]
    fn test_check_bonus_when_opponent_in_check() {
        // Black to move and in check from the rook; agent is White.
        let game = Game::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        assert!(game.is_check());
        let with_bonus = HeuristicEvaluator::default().evaluate(&game, Color::White, 0);
        let no_bonus = HeuristicEvaluator::new(EvalWeights {
            check_bonus: 0,
            ..EvalWeights::default()
        })
        .evaluate(&game, Color::White, 0);
        assert_eq!(with_bonus - no_bonus, 30);
    }

    #[test]
    fn test_extreme_weights_clamp_instead_of_overflowing() {
        let fen = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let game = Game::from_fen(fen).unwrap();
        let evaluator = HeuristicEvaluator::new(EvalWeights {
            material: i32::MAX,
            mobility: i32::MAX,
            check_bonus: i32::MAX,
        });
        assert_eq!(evaluator.evaluate(&game, Color::White, 0), MATE_SCORE - 1);
        assert!(evaluator.evaluate(&game, Color::Black, 0) > LOSS_SCORE);
    }

    #[test]
    fn test_material_sum() {
        let game = Game::default();
        assert_eq!(material(&game, Color::White), 8 + 6 + 6 + 10 + 9);
        assert_eq!(material(&game, Color::Black), 39);
    }
}
