//! Principal variation reconstruction from a packed register.
//!
//! The register stores move indices, not moves. Because move ordering is a
//! pure function of the position, regenerating the ordered list at each ply
//! and taking the stored index replays exactly the line the search chose.

use crate::ordering::order_moves;
use crate::register::{Horizon, Register};
use crate::rules::{Played, Rules};

/// Decodes `register` into moves starting at `pos`.
///
/// Stops early when a ply has no legal moves or the stored index runs past the
/// regenerated list. `pos` is restored before returning.
pub fn extract_pv<R: Rules>(pos: &mut R, register: Register, horizon: Horizon) -> Vec<R::Move> {
    let mut pv = Vec::with_capacity(usize::from(horizon.plies()));
    replay(pos, register, horizon, 0, &mut pv);
    pv
}

fn replay<R: Rules>(
    pos: &mut R,
    register: Register,
    horizon: Horizon,
    ply: u8,
    pv: &mut Vec<R::Move>,
) {
    if ply >= horizon.plies() {
        return;
    }

    let moves = order_moves(pos);
    let index = register.move_index(horizon.slot_for_ply(ply));
    let Some(mv) = moves.get(index) else {
        return;
    };

    pv.push(mv.clone());
    let mut played = Played::new(pos, mv);
    replay(&mut *played, register, horizon, ply + 1, pv);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::HeuristicEvaluator;
    use crate::rules::Game;
    use crate::search::decide;
    use shakmaty::CastlingMode;

    #[test]
    fn test_pv_matches_decision() {
        let mut game = Game::default();
        let horizon = Horizon::new(3).unwrap();
        let decision = decide(&mut game, &HeuristicEvaluator::default(), horizon).unwrap();
        let pv = extract_pv(&mut game, decision.register, horizon);
        assert_eq!(pv.len(), 3);
        assert_eq!(pv[0], decision.best_move);
        assert_eq!(pv, decision.pv);
    }

    #[test]
    fn test_pv_follows_slots() {
        let mut game = Game::default();
        let horizon = Horizon::new(2).unwrap();
        let root = order_moves(&mut game);
        let register = Register::from_score(100)
            .with_move_index(1, 4)
            .and_then(|r| r.with_move_index(0, 2))
            .unwrap();

        let pv = extract_pv(&mut game, register, horizon);
        assert_eq!(pv.len(), 2);
        assert_eq!(pv[0], root[4]);

        game.play(&root[4]);
        let reply = order_moves(&mut game);
        game.undo();
        assert_eq!(pv[1], reply[2]);
        assert_eq!(game.undo_depth(), 0);
    }

    #[test]
    fn test_unset_register_decodes_first_moves() {
        let mut game = Game::default();
        let horizon = Horizon::new(2).unwrap();
        let pv = extract_pv(&mut game, Register::MIN, horizon);
        assert_eq!(pv.len(), 2);
        assert_eq!(pv[0], order_moves(&mut game)[0]);
    }

    #[test]
    fn test_pv_truncates_at_mate() {
        let mut game = Game::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .unwrap();
        let horizon = Horizon::new(4).unwrap();
        // Qxf7# is ordered first, and black has no reply.
        let pv = extract_pv(&mut game, Register::from_score(1), horizon);
        assert_eq!(pv.len(), 1);
        assert_eq!(pv[0].to_uci(CastlingMode::Standard).to_string(), "h5f7");
    }
}
