//! Whale step tables.
//!
//! The whale moves and attacks one square in any direction. Coral never
//! blocks it.

pub const WHALE_ATTACKS: [u64; 64] = generate_whale_attacks();

#[inline]
pub const fn whale_attacks(square: u8) -> u64 {
    WHALE_ATTACKS[square as usize]
}

const fn generate_whale_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;

        attacks |= set_if_valid(file - 1, rank - 1);
        attacks |= set_if_valid(file, rank - 1);
        attacks |= set_if_valid(file + 1, rank - 1);
        attacks |= set_if_valid(file - 1, rank);
        attacks |= set_if_valid(file + 1, rank);
        attacks |= set_if_valid(file - 1, rank + 1);
        attacks |= set_if_valid(file, rank + 1);
        attacks |= set_if_valid(file + 1, rank + 1);

        table[sq] = attacks;
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
    use super::{whale_attacks, WHALE_ATTACKS};

    #[test]
    fn whale_attacks_from_a1_has_three_targets() {
        let a1 = 0u8;
        assert_eq!(WHALE_ATTACKS[a1 as usize].count_ones(), 3);
        assert_eq!(whale_attacks(a1).count_ones(), 3);
    }

    #[test]
    fn whale_attacks_from_e4_has_eight_targets() {
        assert_eq!(whale_attacks(28).count_ones(), 8);
    }
}
