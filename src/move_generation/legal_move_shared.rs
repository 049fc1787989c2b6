//! Helpers shared by the per-animal generators.

use crate::game_state::{coral_types::*, game_state::GameState};

#[inline]
pub fn piece_on_square_for_color(
    game_state: &GameState,
    color: Color,
    square: Square,
) -> Option<PieceKind> {
    let mask = 1u64 << square;
    ALL_PIECE_KINDS
        .into_iter()
        .find(|piece| game_state.pieces[color.index()][piece.index()] & mask != 0)
}

#[inline]
pub fn enemy_piece_on(game_state: &GameState, square: Square) -> Option<PieceKind> {
    piece_on_square_for_color(game_state, game_state.side_to_move.opposite(), square)
}

/// Push every non-capture/capture target in `targets` as a plain move.
pub fn push_plain_targets(from: Square, mut targets: u64, out: &mut Vec<Move>) {
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        out.push(Move::new(from, to));
        targets &= targets - 1;
    }
}

/// Push a gatherer move plus its coral variants.
///
/// Entering a coral square may remove the marker. A quiet move onto a bare
/// square may place one when the mover still has coral in hand.
pub fn push_gatherer_variants(game_state: &GameState, base: Move, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let to_mask = 1u64 << base.to;
    let is_capture = game_state.occupancy_by_color[side.opposite().index()] & to_mask != 0;

    out.push(base);
    if game_state.coral_occupancy() & to_mask != 0 {
        out.push(base.removing_coral());
    } else if !is_capture && game_state.coral_remaining[side.index()] > 0 {
        out.push(base.placing_coral());
    }
}
