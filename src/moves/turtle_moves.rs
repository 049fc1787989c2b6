use crate::moves::slider_rays::{slider_targets, ORTHOGONAL_STEPS};

/// Orthogonal slide targets of a turtle.
#[inline]
pub fn turtle_attacks(square: u8, occupancy: u64, coral: u64) -> u64 {
    slider_targets(square, &ORTHOGONAL_STEPS, occupancy, coral)
}
