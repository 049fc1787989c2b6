//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::coral_rules::CORAL_VICTORY_THRESHOLD;
use crate::game_state::{coral_types::*, game_state::GameState};
use crate::moves::dolphin_moves::dolphin_attacks;
use crate::moves::pufferfish_moves::pufferfish_attacks;
use crate::moves::turtle_moves::turtle_attacks;

pub const MATE_SCORE: i32 = 30000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Crab => 100,
            PieceKind::Octopus => 320,
            PieceKind::Pufferfish => 330,
            PieceKind::Turtle => 500,
            PieceKind::Dolphin => 900,
            PieceKind::Whale => 0,
        }
    }

    #[inline]
    fn material_balance_white_minus_black(game_state: &GameState) -> i32 {
        let mut score = 0i32;

        for piece in ALL_PIECE_KINDS {
            let value = Self::piece_value(piece);
            let white_count = game_state.count(Color::White, piece) as i32;
            let black_count = game_state.count(Color::Black, piece) as i32;
            score += (white_count - black_count) * value;
        }

        score
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        from_side_to_move(game_state, Self::material_balance_white_minus_black(game_state))
    }
}

/// Material plus coral race, crab advancement and slider freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoralScorer;

impl CoralScorer {
    const CORAL_WEIGHT: i32 = 18;
    const CORAL_RACE_BONUS: [i32; 4] = [0, 60, 140, 260];
    const CRAB_ADVANCE_WEIGHT: i32 = 6;
    const MOBILITY_WEIGHT: i32 = 2;

    fn coral_term(game_state: &GameState) -> i32 {
        let mut score = 0i32;
        for color in ALL_COLORS {
            let sign = color_sign(color);
            let on_board = game_state.coral_count(color);
            score += sign * on_board as i32 * Self::CORAL_WEIGHT;

            // Last few markers before the threshold are worth more.
            let missing = CORAL_VICTORY_THRESHOLD.saturating_sub(on_board) as usize;
            if (1..Self::CORAL_RACE_BONUS.len()).contains(&missing) {
                score += sign * Self::CORAL_RACE_BONUS[Self::CORAL_RACE_BONUS.len() - missing];
            }
        }
        score
    }

    fn crab_advance_term(game_state: &GameState) -> i32 {
        let mut score = 0i32;
        for color in ALL_COLORS {
            let mut crabs = game_state.pieces[color.index()][PieceKind::Crab.index()];
            while crabs != 0 {
                let sq = crabs.trailing_zeros() as u8;
                let rank = i32::from(sq / 8);
                let advance = match color {
                    Color::White => rank - 1,
                    Color::Black => 6 - rank,
                };
                score += color_sign(color) * advance * Self::CRAB_ADVANCE_WEIGHT;
                crabs &= crabs - 1;
            }
        }
        score
    }

    fn mobility_term(game_state: &GameState) -> i32 {
        let coral = game_state.coral_occupancy();
        let occ = game_state.occupancy_all;
        let mut score = 0i32;

        for color in ALL_COLORS {
            let own = game_state.occupancy_by_color[color.index()];
            let pieces = &game_state.pieces[color.index()];
            let mut mobility = 0i32;

            for (kind, attacks) in [
                (PieceKind::Pufferfish, pufferfish_attacks as fn(Square, u64, u64) -> u64),
                (PieceKind::Turtle, turtle_attacks),
                (PieceKind::Dolphin, dolphin_attacks),
            ] {
                let mut bb = pieces[kind.index()];
                while bb != 0 {
                    let sq = bb.trailing_zeros() as Square;
                    mobility += (attacks(sq, occ, coral) & !own).count_ones() as i32;
                    bb &= bb - 1;
                }
            }

            score += color_sign(color) * mobility * Self::MOBILITY_WEIGHT;
        }

        score
    }
}

impl BoardScorer for CoralScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let white_minus_black = MaterialScorer::material_balance_white_minus_black(game_state)
            + Self::coral_term(game_state)
            + Self::crab_advance_term(game_state)
            + Self::mobility_term(game_state);
        from_side_to_move(game_state, white_minus_black)
    }
}

#[inline]
fn color_sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

#[inline]
fn from_side_to_move(game_state: &GameState, white_minus_black: i32) -> i32 {
    match game_state.side_to_move {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, CoralScorer, MaterialScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(MaterialScorer.score(&game), 0);
        assert_eq!(CoralScorer.score(&game), 0);
    }

    #[test]
    fn material_is_reported_for_side_to_move() {
        let white = GameState::from_snapshot("4h3/8/8/8/8/8/8/3DH3 w 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        let black = GameState::from_snapshot("4h3/8/8/8/8/8/8/3DH3 b 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        assert_eq!(MaterialScorer.score(&white), 900);
        assert_eq!(MaterialScorer.score(&black), -900);
    }

    #[test]
    fn coral_near_the_threshold_is_rewarded() {
        let near = GameState::from_snapshot(
            "4h3/8/8/8/8/8/8/4H3 w 0 1 a3,b3,c3,d3,e3,f3,g3,h3,a4,b4,c4 - 6/17 e1,e8 -",
        )
        .expect("snapshot should parse");
        let far = GameState::from_snapshot("4h3/8/8/8/8/8/8/4H3 w 0 1 a3,b3 - 15/17 e1,e8 -")
            .expect("snapshot should parse");

        let gap = CoralScorer.score(&near) - CoralScorer.score(&far);
        assert!(gap > 9 * 18, "race bonus missing: gap {gap}");
    }
}
