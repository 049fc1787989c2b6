use crate::game_state::{coral_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_gatherer_variants;
use crate::moves::octopus_moves::octopus_attacks;

pub fn generate_octopus_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut octopuses = game_state.pieces[side.index()][PieceKind::Octopus.index()];
    while octopuses != 0 {
        let from = octopuses.trailing_zeros() as Square;
        let mut targets = octopus_attacks(from) & !own_occ;

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            push_gatherer_variants(game_state, Move::new(from, to), out);
            targets &= targets - 1;
        }

        octopuses &= octopuses - 1;
    }
}
