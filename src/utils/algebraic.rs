//! Square and bitboard conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! square/bitboard representations used by snapshots and move notation.

use crate::game_state::coral_types::Square;

/// Convert algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    let file_index = file - b'a';
    let rank_index = rank - b'1';
    Ok(rank_index * 8 + file_index)
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> Result<String, String> {
    if square > 63 {
        return Err(format!("Square index out of bounds: {square}"));
    }

    let file = square % 8;
    let rank = square / 8;
    let file_char = char::from(b'a' + file);
    let rank_char = char::from(b'1' + rank);

    Ok(format!("{file_char}{rank_char}"))
}

/// Name of an in-range square, for messages and snapshot output.
#[inline]
pub fn square_name(square: Square) -> String {
    square_to_algebraic(square).unwrap_or_else(|_| format!("#{square}"))
}

/// Squares of a bitboard in ascending order.
pub fn bitboard_squares(bitboard: u64) -> impl Iterator<Item = Square> {
    let mut bb = bitboard;
    std::iter::from_fn(move || {
        if bb == 0 {
            return None;
        }
        let sq = bb.trailing_zeros() as Square;
        bb &= bb - 1;
        Some(sq)
    })
}
