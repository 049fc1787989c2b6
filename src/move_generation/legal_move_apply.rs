//! Raw move application.
//!
//! `apply_move` performs a move without checking legality; callers pass moves
//! produced by the generator or validated by the move engine.

use crate::game_state::{coral_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{enemy_piece_on, piece_on_square_for_color};
use crate::search::zobrist::compute_zobrist_key;

pub fn apply_move(game_state: &GameState, mv: Move) -> Result<GameState, String> {
    let from_mask = 1u64 << mv.from;
    let to_mask = 1u64 << mv.to;

    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();

    let moved_piece = piece_on_square_for_color(game_state, moving_color, mv.from)
        .ok_or_else(|| format!("no {moving_color} piece on from-square {}", mv.from))?;
    let captured_piece = enemy_piece_on(game_state, mv.to);

    let mut next = game_state.clone();

    next.pieces[moving_color.index()][moved_piece.index()] &= !from_mask;

    if let Some(captured) = captured_piece {
        next.pieces[enemy_color.index()][captured.index()] &= !to_mask;
    }

    let landing_piece = mv.promotion.unwrap_or(moved_piece);
    next.pieces[moving_color.index()][landing_piece.index()] |= to_mask;

    if let Some(square) = mv.coral_removed {
        let owner = game_state
            .coral_on(square)
            .ok_or_else(|| format!("no coral to remove on square {square}"))?;
        next.coral[owner.index()] &= !(1u64 << square);
        next.coral_remaining[owner.index()] = next.coral_remaining[owner.index()].saturating_add(1);
    }

    if let Some(square) = mv.coral_placed {
        if next.coral_remaining[moving_color.index()] == 0 {
            return Err(format!("{moving_color} has no coral left to place"));
        }
        if next.coral_on(square).is_some() {
            return Err(format!("square {square} already holds coral"));
        }
        next.coral[moving_color.index()] |= 1u64 << square;
        next.coral_remaining[moving_color.index()] -= 1;
    }

    if moved_piece == PieceKind::Crab || captured_piece.is_some() || mv.has_coral_action() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.ply = next.ply.saturating_add(1);

    next.recalc_occupancy();
    next.zobrist_key = compute_zobrist_key(&next);
    next.repetition_history.push(next.zobrist_key);
    next.history.push(mv);

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::apply_move;
    use crate::game_state::coral_types::{Color, Move, PieceKind};
    use crate::game_state::game_state::GameState;
    use crate::search::zobrist::compute_zobrist_key;

    #[test]
    fn coral_placement_moves_marker_from_pool_to_board() {
        let game = GameState::new_game();
        let next = apply_move(&game, Move::new(12, 20).placing_coral()).expect("move should apply");

        assert_eq!(next.coral_on(20), Some(Color::White));
        assert_eq!(next.coral_remaining, [16, 17]);
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(next.halfmove_clock, 0);
        assert_eq!(next.history.len(), 1);
        assert_eq!(next.repetition_history.len(), 2);
        assert_eq!(next.zobrist_key, compute_zobrist_key(&next));
    }

    #[test]
    fn removing_coral_returns_it_to_its_owner() {
        let game = GameState::from_snapshot("4h3/8/8/8/8/8/8/1O2H3 w 3 10 - c3 17/16 e1,e8 -")
            .expect("snapshot should parse");
        let next = apply_move(&game, Move::new(1, 18).removing_coral()).expect("move should apply");

        assert_eq!(next.coral_on(18), None);
        assert_eq!(next.coral_remaining, [17, 17]);
        assert_eq!(next.halfmove_clock, 0);
        assert_eq!(next.piece_on(18), Some((Color::White, PieceKind::Octopus)));
    }

    #[test]
    fn quiet_whale_move_advances_counters() {
        let game = GameState::from_snapshot("4h3/8/8/8/8/8/8/4H3 b 7 12 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        let next = apply_move(&game, Move::new(60, 59)).expect("move should apply");
        assert_eq!(next.halfmove_clock, 8);
        assert_eq!(next.fullmove_number, 13);
    }

    #[test]
    fn placing_without_coral_in_hand_is_rejected() {
        let mut game = GameState::new_game();
        game.coral_remaining = [0, 17];
        assert!(apply_move(&game, Move::new(12, 20).placing_coral()).is_err());
    }
}
