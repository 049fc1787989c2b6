//! Pufferfish, turtle and dolphin generation. Sliders never touch coral, so
//! their moves are plain `from -> to` pairs.

use crate::game_state::{coral_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_plain_targets;
use crate::moves::dolphin_moves::dolphin_attacks;
use crate::moves::pufferfish_moves::pufferfish_attacks;
use crate::moves::turtle_moves::turtle_attacks;

pub fn generate_pufferfish_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_slider_moves(game_state, PieceKind::Pufferfish, pufferfish_attacks, out);
}

pub fn generate_turtle_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_slider_moves(game_state, PieceKind::Turtle, turtle_attacks, out);
}

pub fn generate_dolphin_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_slider_moves(game_state, PieceKind::Dolphin, dolphin_attacks, out);
}

fn generate_slider_moves(
    game_state: &GameState,
    kind: PieceKind,
    attacks: fn(Square, u64, u64) -> u64,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let coral = game_state.coral_occupancy();

    let mut sliders = game_state.pieces[side.index()][kind.index()];
    while sliders != 0 {
        let from = sliders.trailing_zeros() as Square;
        let targets = attacks(from, game_state.occupancy_all, coral) & !own_occ;
        push_plain_targets(from, targets, out);
        sliders &= sliders - 1;
    }
}
