//! Core board state representation.
//!
//! `GameState` stores piece bitboards, occupancy caches, coral bitboards and
//! pools, turn/clock fields, the repetition multiset and the move history the
//! board is derived from.

use crate::errors::SnapshotError;
use crate::game_state::coral_rules::{STARTING_CORAL, STARTING_POSITION_SNAPSHOT};
use crate::game_state::coral_types::*;
use crate::game_state::move_history::MoveHistory;
use crate::utils::snapshot_generator::generate_snapshot;
use crate::utils::snapshot_parser::parse_snapshot;

/// Full game snapshot. Mutated only through the move engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // --- Bitboard representation ---
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    // --- Coral ---
    // [color] -> squares holding that color's markers.
    pub coral: [u64; 2],
    pub coral_remaining: [u8; 2],

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub resigned: Option<Color>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Hashing ---
    pub zobrist_key: u64,

    // --- Repetition support ---
    pub ply: u16,
    pub repetition_history: Vec<u64>,

    // --- Source of truth for undo ---
    pub history: MoveHistory,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            coral: [0; 2],
            coral_remaining: [STARTING_CORAL; 2],

            side_to_move: Color::White,
            resigned: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,

            ply: 0,
            repetition_history: Vec::new(),
            history: MoveHistory::default(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_snapshot(STARTING_POSITION_SNAPSHOT).expect("starting snapshot should always parse")
    }

    #[inline]
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SnapshotError> {
        parse_snapshot(snapshot)
    }

    #[inline]
    pub fn to_snapshot(&self) -> String {
        generate_snapshot(self)
    }

    pub fn piece_on(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in ALL_COLORS {
            for kind in ALL_PIECE_KINDS {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some((color, kind));
                }
            }
        }
        None
    }

    #[inline]
    pub fn coral_on(&self, square: Square) -> Option<Color> {
        let mask = 1u64 << square;
        ALL_COLORS
            .into_iter()
            .find(|color| self.coral[color.index()] & mask != 0)
    }

    #[inline]
    pub fn coral_occupancy(&self) -> u64 {
        self.coral[0] | self.coral[1]
    }

    #[inline]
    pub fn coral_count(&self, color: Color) -> u32 {
        self.coral[color.index()].count_ones()
    }

    #[inline]
    pub fn whale_square(&self, color: Color) -> Option<Square> {
        let whales = self.pieces[color.index()][PieceKind::Whale.index()];
        if whales == 0 {
            None
        } else {
            Some(whales.trailing_zeros() as Square)
        }
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces[color.index()][kind.index()].count_ones()
    }

    /// True when board, side to move and coral state match, ignoring counters
    /// and history.
    pub fn same_position(&self, other: &GameState) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.coral == other.coral
            && self.coral_remaining == other.coral_remaining
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in ALL_COLORS {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[0] | self.occupancy_by_color[1];
    }
}
