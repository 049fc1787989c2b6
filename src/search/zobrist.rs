//! Zobrist hashing for position identity, repetition tracking and the
//! persisted evaluation cache.
//!
//! Keys come from a fixed splitmix64 seed so a hash written to disk by one
//! process means the same position to the next.

use std::sync::OnceLock;

use crate::game_state::coral_rules::STARTING_CORAL;
use crate::game_state::{coral_types::*, game_state::GameState};

const CORAL_POOL_SIZES: usize = STARTING_CORAL as usize + 1;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    coral_square: [[u64; 64]; 2],
    coral_remaining: [[u64; CORAL_POOL_SIZES]; 2],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for sq in piece {
                *sq = next_random_u64(&mut seed);
            }
        }
    }

    let side_to_move = next_random_u64(&mut seed);

    let mut coral_square = [[0u64; 64]; 2];
    for color in &mut coral_square {
        for sq in color {
            *sq = next_random_u64(&mut seed);
        }
    }

    let mut coral_remaining = [[0u64; CORAL_POOL_SIZES]; 2];
    for color in &mut coral_remaining {
        for count in color {
            *count = next_random_u64(&mut seed);
        }
    }

    ZobristTables {
        piece_square,
        side_to_move,
        coral_square,
        coral_remaining,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
pub fn piece_square_key(color: Color, piece: PieceKind, square: Square) -> u64 {
    tables().piece_square[color.index()][piece.index()][square as usize]
}

#[inline]
pub fn coral_square_key(color: Color, square: Square) -> u64 {
    tables().coral_square[color.index()][square as usize]
}

/// Key for a coral pool size. Counts above the starting pool share the top key.
#[inline]
pub fn coral_remaining_key(color: Color, remaining: u8) -> u64 {
    let idx = (remaining as usize).min(CORAL_POOL_SIZES - 1);
    tables().coral_remaining[color.index()][idx]
}

/// Side-to-move toggle key (xor in when black is to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Full position key: pieces, side to move, coral squares and coral pools.
/// Counters, history and resignation do not contribute.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for color in ALL_COLORS {
        for piece in ALL_PIECE_KINDS {
            let mut bb = game_state.pieces[color.index()][piece.index()];
            while bb != 0 {
                let sq = bb.trailing_zeros() as Square;
                key ^= piece_square_key(color, piece, sq);
                bb &= bb - 1;
            }
        }

        let mut coral = game_state.coral[color.index()];
        while coral != 0 {
            let sq = coral.trailing_zeros() as Square;
            key ^= coral_square_key(color, sq);
            coral &= coral - 1;
        }

        key ^= coral_remaining_key(color, game_state.coral_remaining[color.index()]);
    }

    if game_state.side_to_move == Color::Black {
        key ^= side_to_move_key();
    }

    key
}

/// Canonical position hash used as the evaluation cache key.
#[inline]
pub fn position_hash(game_state: &GameState) -> u64 {
    compute_zobrist_key(game_state)
}
