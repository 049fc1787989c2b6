//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves per animal, applies each candidate and drops
//! the ones that leave the mover's whale attacked.

use crate::game_state::{coral_types::Move, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_whale_in_check;
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::move_generation::legal_moves_crab::generate_crab_moves;
use crate::move_generation::legal_moves_octopus::generate_octopus_moves;
use crate::move_generation::legal_moves_sliders::{
    generate_dolphin_moves, generate_pufferfish_moves, generate_turtle_moves,
};
use crate::move_generation::legal_moves_whale::generate_whale_moves;
use crate::move_generation::move_generator::{
    GeneratedMove, MoveGenResult, MoveGenerationError, MoveGenerator,
};

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        if game_state.resigned.is_some() {
            return Ok(Vec::new());
        }

        let mut pseudo = Vec::<Move>::with_capacity(96);
        generate_pseudo_legal_moves(game_state, &mut pseudo);

        let mover = game_state.side_to_move;
        let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());
        for mv in pseudo {
            let next = apply_move(game_state, mv).map_err(|x| {
                MoveGenerationError::InvalidState(format!("apply_move failed: {x}"))
            })?;

            if is_whale_in_check(&next, mover) {
                continue;
            }

            let gives_check = is_whale_in_check(&next, next.side_to_move);
            legal.push(GeneratedMove {
                mv,
                game_after_move: next,
                captured: enemy_piece_on(game_state, mv.to),
                gives_check,
            });
        }

        Ok(legal)
    }
}

pub fn generate_pseudo_legal_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_crab_moves(game_state, out);
    generate_octopus_moves(game_state, out);
    generate_pufferfish_moves(game_state, out);
    generate_turtle_moves(game_state, out);
    generate_dolphin_moves(game_state, out);
    generate_whale_moves(game_state, out);
}
