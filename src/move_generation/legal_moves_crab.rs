use crate::game_state::{coral_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_gatherer_variants;
use crate::moves::crab_moves::{crab_attacks, crab_steps};

pub fn generate_crab_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let promotion_rank = side.promotion_rank();

    let mut crabs = game_state.pieces[side.index()][PieceKind::Crab.index()];
    while crabs != 0 {
        let from = crabs.trailing_zeros() as Square;
        let mut targets = (crab_steps(side, from) & empty) | (crab_attacks(side, from) & enemy_occ);

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            let base = Move::new(from, to);
            if to / 8 == promotion_rank {
                for promo in PROMOTION_KINDS {
                    push_gatherer_variants(game_state, base.with_promotion(promo), out);
                }
            } else {
                push_gatherer_variants(game_state, base, out);
            }
            targets &= targets - 1;
        }

        crabs &= crabs - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::generate_crab_moves;
    use crate::game_state::coral_types::{Move, PieceKind};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_crabs_step_forward_with_optional_coral() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        generate_crab_moves(&game, &mut out);
        assert_eq!(out.len(), 16);
        assert!(out.contains(&Move::new(12, 20)));
        assert!(out.contains(&Move::new(12, 20).placing_coral()));
    }

    #[test]
    fn crab_on_seventh_rank_only_offers_promotions() {
        let game = GameState::from_snapshot("4h3/C7/8/8/8/8/8/4H3 w 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        let mut out = Vec::new();
        generate_crab_moves(&game, &mut out);

        let forward: Vec<_> = out.iter().filter(|mv| mv.to == 56).collect();
        assert_eq!(forward.len(), 8);
        assert!(forward.iter().all(|mv| mv.promotion.is_some()));
        assert!(out.contains(&Move::new(48, 56).with_promotion(PieceKind::Dolphin)));
        // Sideways step to b7 stays on the seventh rank.
        assert!(out.contains(&Move::new(48, 49)));
    }
}
