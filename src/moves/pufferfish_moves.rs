use crate::moves::slider_rays::{slider_targets, DIAGONAL_STEPS};

/// Diagonal slide targets of a pufferfish.
#[inline]
pub fn pufferfish_attacks(square: u8, occupancy: u64, coral: u64) -> u64 {
    slider_targets(square, &DIAGONAL_STEPS, occupancy, coral)
}

#[cfg(test)]
mod tests {
    use super::pufferfish_attacks;

    #[test]
    fn pufferfish_on_empty_board_reaches_thirteen_squares() {
        let d4 = 27u8;
        assert_eq!(pufferfish_attacks(d4, 0, 0).count_ones(), 13);
    }

    #[test]
    fn coral_on_diagonal_shields_the_far_side() {
        let a1 = 0u8;
        let coral_on_c3 = 1u64 << 18;
        let attacks = pufferfish_attacks(a1, 0, coral_on_c3);
        assert_eq!(attacks, 1u64 << 9);
    }
}
