//! Packed search register: one `u64` carrying a score and the move path.
//!
//! Layout, most significant first:
//!
//! ```text
//! [ score: 16 ] [ slot 5: 8 ] [ slot 4: 8 ] ... [ slot 0: 8 ]
//! ```
//!
//! Each slot holds the 1-based index of the chosen move in the *ordered* move
//! list of one ply; 0 means unset. Slot `d - 1` belongs to the node searched
//! with `d` plies remaining, so the root lands in slot `horizon - 1` and the
//! deepest ply in slot 0.
//!
//! Because the score occupies the top bits and slots are written with masks
//! (never added), comparing two registers as integers orders them by score
//! first, with the path only breaking ties.

use std::fmt;

use crate::error::ConfigError;
use crate::types::{DEFAULT_HORIZON, Score};

/// Width of one move slot in bits.
pub const SLOT_BITS: u32 = 8;

/// Bit offset of the score field.
pub const SCORE_SHIFT: u32 = 48;

/// Number of move slots below the score field.
pub const MAX_HORIZON: u8 = (SCORE_SHIFT / SLOT_BITS) as u8;

const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;
const PATH_MASK: u64 = (1 << SCORE_SHIFT) - 1;

/// Score plus move path, compared as a plain integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Register(u64);

impl Register {
    /// Lowest possible register; the maximizer's initial bound.
    pub const MIN: Register = Register(0);

    /// Highest possible register; the minimizer's initial bound.
    pub const MAX: Register = Register(u64::MAX);

    /// A register holding only `score`, every slot unset.
    #[inline]
    pub const fn from_score(score: Score) -> Register {
        Register((score as u64) << SCORE_SHIFT)
    }

    #[inline]
    pub const fn score(self) -> Score {
        (self.0 >> SCORE_SHIFT) as Score
    }

    /// Raw slot content: the 1-based move index, or 0 when unset.
    #[inline]
    pub fn slot(self, slot: u8) -> u8 {
        debug_assert!(slot < MAX_HORIZON);
        ((self.0 >> (u32::from(slot) * SLOT_BITS)) & SLOT_MASK) as u8
    }

    /// Returns a copy with `slot` overwritten by `value`.
    #[inline]
    pub fn with_slot(self, slot: u8, value: u8) -> Register {
        debug_assert!(slot < MAX_HORIZON);
        let shift = u32::from(slot) * SLOT_BITS;
        Register((self.0 & !(SLOT_MASK << shift)) | (u64::from(value) << shift))
    }

    /// Records the 0-based `index` of the chosen move in `slot`.
    ///
    /// Returns `None` when the index cannot be stored (255 or more).
    #[inline]
    pub fn with_move_index(self, slot: u8, index: usize) -> Option<Register> {
        let value = u8::try_from(index + 1).ok()?;
        Some(self.with_slot(slot, value))
    }

    /// Decodes `slot` back to a 0-based move index. Unset slots decode to 0.
    #[inline]
    pub fn move_index(self, slot: u8) -> usize {
        usize::from(self.slot(slot).saturating_sub(1))
    }

    /// Same score with every slot cleared; what a child is allowed to see.
    #[inline]
    pub const fn score_only(self) -> Register {
        Register(self.0 & !PATH_MASK)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<u8> = (0..MAX_HORIZON).rev().map(|s| self.slot(s)).collect();
        f.debug_struct("Register")
            .field("score", &format_args!("{:#06x}", self.score()))
            .field("slots", &slots)
            .finish()
    }
}

/// Number of plies searched per decision, checked against the slot count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Horizon(u8);

impl Horizon {
    pub fn new(plies: u8) -> Result<Horizon, ConfigError> {
        if (1..=MAX_HORIZON).contains(&plies) {
            Ok(Horizon(plies))
        } else {
            Err(ConfigError::HorizonOutOfRange { requested: plies })
        }
    }

    #[inline]
    pub const fn plies(self) -> u8 {
        self.0
    }

    /// Slot written by the node at `ply` (0 = root).
    #[inline]
    pub fn slot_for_ply(self, ply: u8) -> u8 {
        debug_assert!(ply < self.0);
        self.0 - 1 - ply
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon(DEFAULT_HORIZON)
    }
}

impl TryFrom<u8> for Horizon {
    type Error = ConfigError;

    fn try_from(plies: u8) -> Result<Self, Self::Error> {
        Horizon::new(plies)
    }
}

/// Which bound a node tightens. The root always maximizes for the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stance {
    Maximizing,
    Minimizing,
}

impl Stance {
    #[inline]
    pub const fn flip(self) -> Stance {
        match self {
            Stance::Maximizing => Stance::Minimizing,
            Stance::Minimizing => Stance::Maximizing,
        }
    }
}

/// Result of searching one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The node produced a register: its best line, or the bound it was
    /// handed back without a path when no move beat that bound.
    Scored(Register),
    /// The node was cut off and the parent skips it.
    Pruned,
}

impl Outcome {
    pub fn register(self) -> Option<Register> {
        match self {
            Outcome::Scored(reg) => Some(reg),
            Outcome::Pruned => None,
        }
    }
}
