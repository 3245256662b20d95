use crate::rules::{MoveList, Played, Rules};

/// Sort key for a move nobody likes. Each satisfied predicate subtracts its
/// weight, and ascending keys are searched first.
const KEY_CEILING: u8 = 0b11111;

const TERMINAL: u8 = 0b10000;
const GIVES_CHECK: u8 = 0b01000;
const PROMOTION: u8 = 0b00100;
const CAPTURE: u8 = 0b00010;
const EVASION: u8 = 0b00001;

/// Generates the legal moves at `pos` and orders them most promising first.
///
/// Priority, each weight exceeding the sum of those below it:
/// 1. Moves that end the game (checkmate or draw)
/// 2. Checks
/// 3. Promotions
/// 4. Captures
/// 5. Moves of a piece currently attacked by the opponent
///
/// The sort is stable, so equal keys keep the rules engine's order. Nothing is
/// cached: the same position always yields the same list, which is what lets
/// the PV be rebuilt from move indices alone.
pub fn order_moves<R: Rules>(pos: &mut R) -> MoveList<R::Move> {
    let mut keyed: MoveList<(u8, R::Move)> = pos
        .legal_moves()
        .into_iter()
        .map(|mv| (move_key(pos, &mv), mv))
        .collect();

    keyed.sort_by_key(|&(key, _)| key);
    keyed.into_iter().map(|(_, mv)| mv).collect()
}

/// Priority key for one move; lower is searched earlier.
pub fn move_key<R: Rules>(pos: &mut R, mv: &R::Move) -> u8 {
    let mut key = KEY_CEILING;

    if pos.is_promotion(mv) {
        key -= PROMOTION;
    }
    if pos.is_capture(mv) {
        key -= CAPTURE;
    }
    if pos
        .origin(mv)
        .is_some_and(|from| pos.is_attacked_by_opponent(from))
    {
        key -= EVASION;
    }

    let after = Played::new(pos, mv);
    if after.is_checkmate() || after.is_draw() {
        key -= TERMINAL;
    }
    if after.is_check() {
        key -= GIVES_CHECK;
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Game;
    use shakmaty::CastlingMode;

    fn uci_list(game: &mut Game) -> Vec<String> {
        order_moves(game)
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    #[test]
    fn test_ordering_is_permutation() {
        let mut game = Game::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let mut native: Vec<String> = game
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect();
        let mut ordered = uci_list(&mut game);
        assert_eq!(ordered.len(), 48);
        native.sort();
        ordered.sort();
        assert_eq!(native, ordered);
    }

    #[test]
    fn test_mating_move_first() {
        let mut game = Game::from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .unwrap();
        assert_eq!(uci_list(&mut game)[0], "h5f7");
    }

    #[test]
    fn test_capture_before_quiet() {
        // Only capture available is exd5.
        let mut game = Game::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(uci_list(&mut game)[0], "e4d5");
    }

    #[test]
    fn test_ordering_restores_position() {
        let mut game = Game::default();
        let hash = game.hash();
        let _ = order_moves(&mut game);
        assert_eq!(game.hash(), hash);
        assert_eq!(game.undo_depth(), 0);
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let mut game = Game::default();
        assert_eq!(uci_list(&mut game), uci_list(&mut game));
    }
}
