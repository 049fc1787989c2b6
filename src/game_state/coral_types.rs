//! Core value types shared by every subsystem.
//!
//! Colors, animal kinds, squares and the five-field move descriptor. Piece
//! color is stored separately from kind for cache-friendly bitboard layouts.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::game_state::game_state::GameState;

/// Board square index (`0..=63`, `a1 == 0`, `h8 == 63`).
pub type Square = u8;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank a crab of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    #[inline]
    pub const fn snapshot_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

pub const ALL_COLORS: [Color; 2] = [Color::White, Color::Black];

/// The six animal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Crab,
    Octopus,
    Pufferfish,
    Turtle,
    Dolphin,
    Whale,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Crab => 0,
            PieceKind::Octopus => 1,
            PieceKind::Pufferfish => 2,
            PieceKind::Turtle => 3,
            PieceKind::Dolphin => 4,
            PieceKind::Whale => 5,
        }
    }

    /// Gatherers are the only pieces allowed to place or remove coral.
    #[inline]
    pub const fn is_gatherer(self) -> bool {
        matches!(self, PieceKind::Crab | PieceKind::Octopus)
    }

    /// Sliders are blocked by coral and cannot enter coral squares.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(
            self,
            PieceKind::Pufferfish | PieceKind::Turtle | PieceKind::Dolphin
        )
    }

    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Octopus | PieceKind::Pufferfish | PieceKind::Turtle | PieceKind::Dolphin
        )
    }

    /// Lowercase snapshot letter.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Crab => 'c',
            PieceKind::Octopus => 'o',
            PieceKind::Pufferfish => 'p',
            PieceKind::Turtle => 't',
            PieceKind::Dolphin => 'd',
            PieceKind::Whale => 'h',
        }
    }

    #[inline]
    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'c' => Some(PieceKind::Crab),
            'o' => Some(PieceKind::Octopus),
            'p' => Some(PieceKind::Pufferfish),
            't' => Some(PieceKind::Turtle),
            'd' => Some(PieceKind::Dolphin),
            'h' => Some(PieceKind::Whale),
            _ => None,
        }
    }
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Crab,
    PieceKind::Octopus,
    PieceKind::Pufferfish,
    PieceKind::Turtle,
    PieceKind::Dolphin,
    PieceKind::Whale,
];

/// Promotion choices, strongest first so generation order favors them.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Dolphin,
    PieceKind::Turtle,
    PieceKind::Pufferfish,
    PieceKind::Octopus,
];

/// Move descriptor exchanged with callers and stored in the evaluation cache.
///
/// A `Move` carries no legality on its own: the same value may be legal in one
/// state and illegal in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub promotion: Option<PieceKind>,
    #[serde(default)]
    pub coral_placed: Option<Square>,
    #[serde(default)]
    pub coral_removed: Option<Square>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            coral_placed: None,
            coral_removed: None,
        }
    }

    #[inline]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Place coral on the destination square.
    #[inline]
    pub const fn placing_coral(mut self) -> Self {
        self.coral_placed = Some(self.to);
        self
    }

    /// Remove the coral found on the destination square.
    #[inline]
    pub const fn removing_coral(mut self) -> Self {
        self.coral_removed = Some(self.to);
        self
    }

    #[inline]
    pub const fn has_coral_action(&self) -> bool {
        self.coral_placed.is_some() || self.coral_removed.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::utils::move_notation::move_to_notation(self))
    }
}
