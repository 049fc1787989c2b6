//! Head-to-head engine harness for local testing and cache warming.
//!
//! Runs two `Engine` implementations against each other from the starting
//! position, optionally after a seeded random opening prefix, and reports
//! how the game ended.

use std::time::Instant;

use rand::prelude::IndexedRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::engines::engine_trait::{Engine, GoParams};
use crate::errors::{MoveError, SearchError};
use crate::game_state::coral_types::{Color, Move};
use crate::game_state::game_state::GameState;
use crate::game_state::terminal_state::{classify, TerminalState};
use crate::move_generation::move_engine::{apply, legal_moves};
use crate::move_generation::move_generator::MoveGenerationError;
use crate::utils::move_notation::move_to_notation;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Generation(#[from] MoveGenerationError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("engine {engine} played an illegal move: {source}")]
    IllegalEngineMove {
        engine: String,
        #[source]
        source: MoveError,
    },

    #[error("opening move failed: {0}")]
    Opening(#[from] MoveError),
}

#[derive(Debug, Clone, Copy)]
pub struct SelfPlayConfig {
    pub max_plies: u16,
    pub opening_min_plies: u8,
    pub opening_max_plies: u8,
    pub go_params: GoParams,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            max_plies: 300,
            opening_min_plies: 0,
            opening_max_plies: 4,
            go_params: GoParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelfPlayResult {
    /// `InProgress` when the ply limit stopped the game.
    pub terminal: TerminalState,
    pub final_snapshot: String,
    pub opening_moves: Vec<String>,
    pub played_moves: Vec<String>,
    pub white_move_count: u32,
    pub black_move_count: u32,
    pub white_total_time_ms: u64,
    pub black_total_time_ms: u64,
}

impl SelfPlayResult {
    pub fn report(&self) -> String {
        let ending = match self.terminal {
            TerminalState::InProgress => "ply limit".to_owned(),
            TerminalState::Over {
                reason,
                winner: Some(winner),
                ..
            } => format!("{winner} wins by {reason}"),
            TerminalState::Over { reason, .. } => format!("draw by {reason}"),
        };
        format!(
            "result={} plies={} white_moves={} black_moves={} white_ms={} black_ms={}",
            ending,
            self.opening_moves.len() + self.played_moves.len(),
            self.white_move_count,
            self.black_move_count,
            self.white_total_time_ms,
            self.black_total_time_ms
        )
    }
}

/// Play one seeded game. `white` moves first.
pub fn play_self_play_game(
    white: &mut dyn Engine,
    black: &mut dyn Engine,
    seed: u64,
    config: SelfPlayConfig,
) -> Result<SelfPlayResult, HarnessError> {
    white.new_game();
    black.new_game();

    let (mut state, opening_moves) = apply_seeded_random_opening(
        &GameState::new_game(),
        seed,
        config.opening_min_plies,
        config.opening_max_plies,
    )?;

    let mut result = SelfPlayResult {
        terminal: TerminalState::InProgress,
        final_snapshot: String::new(),
        opening_moves,
        played_moves: Vec::new(),
        white_move_count: 0,
        black_move_count: 0,
        white_total_time_ms: 0,
        black_total_time_ms: 0,
    };
    let mut last_move = state.history.last().copied();

    for _ in 0..config.max_plies {
        let terminal = classify(&state)?;
        if terminal.is_over() {
            result.terminal = terminal;
            break;
        }

        let mover = state.side_to_move;
        let engine: &mut dyn Engine = match mover {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };
        let params = GoParams {
            last_move_hint: last_move,
            ..config.go_params
        };

        let started = Instant::now();
        let out = engine.choose_move(&state, &params, None)?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match mover {
            Color::White => {
                result.white_move_count += 1;
                result.white_total_time_ms = result.white_total_time_ms.saturating_add(elapsed_ms);
            }
            Color::Black => {
                result.black_move_count += 1;
                result.black_total_time_ms = result.black_total_time_ms.saturating_add(elapsed_ms);
            }
        }

        let Some(chosen) = out.best_move else {
            result.terminal = classify(&state)?;
            break;
        };
        let (next, record) = apply(&state, &chosen).map_err(|source| {
            HarnessError::IllegalEngineMove {
                engine: engine.name().to_owned(),
                source,
            }
        })?;
        log::debug!("{mover}: {} ({})", record.notation, out.score);
        result.played_moves.push(record.notation);
        last_move = Some(chosen);
        state = next;
    }

    if !result.terminal.is_over() {
        result.terminal = classify(&state)?;
    }
    result.final_snapshot = state.to_snapshot();
    Ok(result)
}

fn apply_seeded_random_opening(
    start: &GameState,
    seed: u64,
    min_plies: u8,
    max_plies: u8,
) -> Result<(GameState, Vec<String>), HarnessError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let plies = if max_plies > min_plies {
        rng.random_range(min_plies..=max_plies)
    } else {
        min_plies
    };

    let mut state = start.clone();
    let mut moves = Vec::with_capacity(plies as usize);
    for _ in 0..plies {
        let legal: Vec<Move> = legal_moves(&state, None)?;
        let Some(mv) = legal.choose(&mut rng) else {
            break;
        };
        let (next, record) = apply(&state, mv)?;
        moves.push(record.notation);
        state = next;
    }
    Ok((state, moves))
}
