use crate::game_state::{coral_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_plain_targets;
use crate::moves::whale_moves::whale_attacks;

pub fn generate_whale_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut whales = game_state.pieces[side.index()][PieceKind::Whale.index()];
    while whales != 0 {
        let from = whales.trailing_zeros() as Square;
        push_plain_targets(from, whale_attacks(from) & !own_occ, out);
        whales &= whales - 1;
    }
}
