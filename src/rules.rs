//! The seam between the search and the chess rules.
//!
//! The search only needs the handful of queries on [`Rules`]. [`Game`]
//! provides them on top of `shakmaty`, which has no undo of its own, so it
//! keeps a stack of earlier positions.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use arrayvec::ArrayVec;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position, Role, Square};

use crate::error::GameError;
use crate::types::MAX_MOVES;

/// Moves at one node, in the rules engine's enumeration order.
pub type MoveList<M> = ArrayVec<M, MAX_MOVES>;

/// Position queries and mutations the search consumes.
///
/// `play` and `undo` must nest: after any sequence of `play` calls, the same
/// number of `undo` calls restores the original position exactly.
pub trait Rules {
    type Move: Clone + Debug;

    fn turn(&self) -> Color;

    fn legal_moves(&self) -> MoveList<Self::Move>;

    fn play(&mut self, mv: &Self::Move);

    /// Reverts the most recent `play`.
    fn undo(&mut self);

    /// Side to move is checkmated.
    fn is_checkmate(&self) -> bool;

    /// Drawn by rule (stalemate, repetition, fifty moves, dead material).
    fn is_draw(&self) -> bool;

    /// Side to move is in check.
    fn is_check(&self) -> bool;

    fn is_capture(&self, mv: &Self::Move) -> bool;

    fn is_promotion(&self, mv: &Self::Move) -> bool;

    /// Square the move starts from, if it has one.
    fn origin(&self, mv: &Self::Move) -> Option<Square>;

    /// `square` is attacked by the side not to move.
    fn is_attacked_by_opponent(&self, square: Square) -> bool;

    /// Number of `color` pieces of kind `role` on the board.
    fn piece_count(&self, color: Color, role: Role) -> u32;

    fn mobility(&self) -> usize {
        self.legal_moves().len()
    }
}

/// A move applied for the lifetime of the guard, undone on drop.
///
/// Derefs to the position so the child search runs on the guard itself.
pub struct Played<'a, R: Rules> {
    pos: &'a mut R,
}

impl<'a, R: Rules> Played<'a, R> {
    pub fn new(pos: &'a mut R, mv: &R::Move) -> Self {
        pos.play(mv);
        Self { pos }
    }
}

impl<R: Rules> Deref for Played<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.pos
    }
}

impl<R: Rules> DerefMut for Played<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.pos
    }
}

impl<R: Rules> Drop for Played<'_, R> {
    fn drop(&mut self) {
        self.pos.undo();
    }
}

/// A chess game backed by `shakmaty`, with undo and repetition tracking.
#[derive(Clone, Debug)]
pub struct Game {
    pos: Chess,
    /// Positions before each `play`, most recent last.
    undo_stack: Vec<Chess>,
    /// Hash of every position reached, current one last.
    hashes: Vec<u64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::from_position(Chess::default())
    }
}

impl Game {
    pub fn from_position(pos: Chess) -> Self {
        let hash = zobrist(&pos);
        Self {
            pos,
            undo_stack: Vec::new(),
            hashes: vec![hash],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let invalid = |reason: String| GameError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;
        Ok(Self::from_position(pos))
    }

    /// Parses a UCI move and, if legal here, plays it.
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let illegal = || GameError::IllegalMove {
            uci_move: uci.to_string(),
        };
        let parsed: UciMove = uci.parse().map_err(|_| illegal())?;
        let mv = parsed.to_move(&self.pos).map_err(|_| illegal())?;
        self.play(&mv);
        Ok(mv)
    }

    /// Forgets the undo stack so the current position becomes the new base.
    ///
    /// Repetition history is kept.
    pub fn commit(&mut self) {
        self.undo_stack.clear();
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    pub fn hash(&self) -> u64 {
        self.hashes.last().copied().unwrap_or_else(|| zobrist(&self.pos))
    }

    /// Number of moves that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn is_repetition(&self) -> bool {
        match self.hashes.split_last() {
            Some((current, earlier)) => earlier.contains(current),
            None => false,
        }
    }
}

fn zobrist(pos: &Chess) -> u64 {
    let hash: Zobrist64 = pos.zobrist_hash(EnPassantMode::Legal);
    hash.0
}

impl Rules for Game {
    type Move = Move;

    fn turn(&self) -> Color {
        self.pos.turn()
    }

    fn legal_moves(&self) -> MoveList<Move> {
        self.pos.legal_moves()
    }

    fn play(&mut self, mv: &Move) {
        self.undo_stack.push(self.pos.clone());
        self.pos.play_unchecked(mv);
        self.hashes.push(zobrist(&self.pos));
    }

    fn undo(&mut self) {
        if let Some(prev) = self.undo_stack.pop() {
            self.pos = prev;
            self.hashes.pop();
        }
    }

    fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    fn is_draw(&self) -> bool {
        self.pos.is_stalemate()
            || self.pos.is_insufficient_material()
            || self.pos.halfmoves() >= 100
            || self.is_repetition()
    }

    fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    fn is_capture(&self, mv: &Move) -> bool {
        mv.is_capture()
    }

    fn is_promotion(&self, mv: &Move) -> bool {
        mv.is_promotion()
    }

    fn origin(&self, mv: &Move) -> Option<Square> {
        mv.from()
    }

    fn is_attacked_by_opponent(&self, square: Square) -> bool {
        let board = self.pos.board();
        board
            .attacks_to(square, !self.pos.turn(), board.occupied())
            .any()
    }

    fn piece_count(&self, color: Color, role: Role) -> u32 {
        self.pos.board().by_piece(Piece { color, role }).count() as u32
    }
}
