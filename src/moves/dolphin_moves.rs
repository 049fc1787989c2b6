use crate::moves::pufferfish_moves::pufferfish_attacks;
use crate::moves::turtle_moves::turtle_attacks;

/// Dolphins slide like a turtle and a pufferfish combined.
#[inline]
pub fn dolphin_attacks(square: u8, occupancy: u64, coral: u64) -> u64 {
    pufferfish_attacks(square, occupancy, coral) | turtle_attacks(square, occupancy, coral)
}
