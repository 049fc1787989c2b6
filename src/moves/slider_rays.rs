//! Ray tracing shared by the sliding animals.
//!
//! Pieces and coral both stop a ray. A piece square stays in the result (it
//! can be captured); a coral square does not, since sliders never enter coral.

pub const ORTHOGONAL_STEPS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL_STEPS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub fn slider_targets(square: u8, steps: &[(i32, i32)], occupancy: u64, coral: u64) -> u64 {
    let blockers = occupancy | coral;
    let mut attacks = 0u64;
    for &(file_step, rank_step) in steps {
        attacks |= trace_ray(i32::from(square), file_step, rank_step, blockers);
    }
    attacks & !coral
}

fn trace_ray(square: i32, file_step: i32, rank_step: i32, blockers: u64) -> u64 {
    let mut file = (square % 8) + file_step;
    let mut rank = (square / 8) + rank_step;
    let mut attacks = 0u64;

    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let target = (rank * 8 + file) as usize;
        let bit = 1u64 << target;
        attacks |= bit;

        if (blockers & bit) != 0 {
            break;
        }

        file += file_step;
        rank += rank_step;
    }

    attacks
}
