//! Crab step and capture tables.
//!
//! Crabs step one square forward or sideways onto empty squares and capture
//! one square diagonally forward.

use crate::game_state::coral_types::Color;

pub const WHITE_CRAB_ATTACKS: [u64; 64] = generate_crab_attacks(1);
pub const BLACK_CRAB_ATTACKS: [u64; 64] = generate_crab_attacks(-1);
pub const WHITE_CRAB_STEPS: [u64; 64] = generate_crab_steps(1);
pub const BLACK_CRAB_STEPS: [u64; 64] = generate_crab_steps(-1);

#[inline]
pub const fn crab_attacks(color: Color, square: u8) -> u64 {
    match color {
        Color::White => WHITE_CRAB_ATTACKS[square as usize],
        Color::Black => BLACK_CRAB_ATTACKS[square as usize],
    }
}

/// Non-capturing step targets, before occupancy is taken into account.
#[inline]
pub const fn crab_steps(color: Color, square: u8) -> u64 {
    match color {
        Color::White => WHITE_CRAB_STEPS[square as usize],
        Color::Black => BLACK_CRAB_STEPS[square as usize],
    }
}

const fn generate_crab_attacks(forward: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        table[sq] = set_if_valid(file - 1, rank + forward) | set_if_valid(file + 1, rank + forward);
        sq += 1;
    }

    table
}

const fn generate_crab_steps(forward: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        table[sq] = set_if_valid(file, rank + forward)
            | set_if_valid(file - 1, rank)
            | set_if_valid(file + 1, rank);
        sq += 1;
    }

    table
}

const fn set_if_valid(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }

    let square = (rank as usize) * 8 + (file as usize);
    1u64 << square
}

#[cfg(test)]
mod tests {
    use super::{crab_attacks, crab_steps};
    use crate::game_state::coral_types::Color;

    #[test]
    fn crab_attacks_point_forward_for_each_color() {
        let e4 = 28u8;
        let d5_f5 = (1u64 << 35) | (1u64 << 37);
        let d3_f3 = (1u64 << 19) | (1u64 << 21);
        assert_eq!(crab_attacks(Color::White, e4), d5_f5);
        assert_eq!(crab_attacks(Color::Black, e4), d3_f3);
    }

    #[test]
    fn crab_steps_include_sideways_but_not_backwards() {
        let a2 = 8u8;
        let a3_b2 = (1u64 << 16) | (1u64 << 9);
        assert_eq!(crab_steps(Color::White, a2), a3_b2);
        assert_eq!(crab_steps(Color::Black, a2).count_ones(), 2);
    }
}
