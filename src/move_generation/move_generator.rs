use thiserror::Error;

use crate::game_state::coral_types::{Move, PieceKind};
use crate::game_state::game_state::GameState;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    #[error("move generation is not implemented")]
    NotImplemented,

    #[error("invalid game state: {0}")]
    InvalidState(String),
}

/// A legal move together with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub game_after_move: GameState,
    pub captured: Option<PieceKind>,
    pub gives_check: bool,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>>;
}

pub struct NullMoveGenerator;

impl MoveGenerator for NullMoveGenerator {
    fn generate_legal_moves(&self, _game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        Err(MoveGenerationError::NotImplemented)
    }
}
