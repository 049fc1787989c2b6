//! Engine abstraction layer used by the core facade and the binaries.
//!
//! Defines common input parameters and output payloads so engines can be
//! swapped behind a single trait interface.

use serde::Serialize;

use crate::engines::engine_config::EngineConfigError;
use crate::errors::SearchError;
use crate::game_state::coral_types::Move;
use crate::game_state::game_state::GameState;
use crate::search::difficulty::Difficulty;
use crate::search::iterative_deepening::SearchProgress;

/// Per-move overrides. Unset fields fall back to the engine configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub difficulty: Option<Difficulty>,
    pub last_move_hint: Option<Move>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth_reached: u8,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, _name: &str, _value: &str) -> Result<(), EngineConfigError> {
        Ok(())
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        progress: Option<&mut dyn FnMut(&SearchProgress)>,
    ) -> Result<EngineOutput, SearchError>;
}
