//! Snapshot-level facade over the move engine, terminal detector and search.
//!
//! `CoralCore` is built once with its engine injected and answers the three
//! requests the game server makes: validate and apply a move, classify a
//! position, and produce a computer move. Every method takes and returns
//! snapshot strings so callers never hold engine internals.

use serde::Serialize;

use crate::engines::engine_trait::{Engine, GoParams};
use crate::errors::{CoreError, IllegalMoveError};
use crate::game_state::coral_types::{Color, Move};
use crate::game_state::game_state::GameState;
use crate::game_state::terminal_state::{classify, TerminalState};
use crate::move_generation::move_engine::{self, MoveRecord};
use crate::search::difficulty::Difficulty;
use crate::utils::move_notation::{move_to_notation, notation_to_move};

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMove {
    pub snapshot: String,
    pub record: MoveRecord,
    pub terminal: TerminalState,
}

/// Move chosen by the engine, already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputerMove {
    pub mv: Move,
    pub notation: String,
    pub score: i32,
    pub depth_reached: u8,
    pub applied: AppliedMove,
}

pub struct CoralCore<E: Engine> {
    engine: E,
}

impl<E: Engine> CoralCore<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Legal moves in notation, optionally only those leaving `from`.
    pub fn legal_moves(&self, snapshot: &str, from: Option<&str>) -> Result<Vec<String>, CoreError> {
        let state = GameState::from_snapshot(snapshot)?;
        let from = from
            .map(crate::utils::algebraic::algebraic_to_square)
            .transpose()
            .map_err(CoreError::InvalidNotation)?;
        let moves = move_engine::legal_moves(&state, from)?;
        Ok(moves.iter().map(move_to_notation).collect())
    }

    /// Validate `mv` against the snapshot and apply it.
    pub fn validate_and_apply(&self, snapshot: &str, mv: &Move) -> Result<AppliedMove, CoreError> {
        let state = GameState::from_snapshot(snapshot)?;
        apply_to_state(&state, mv)
    }

    /// Same as `validate_and_apply` for a move given in notation.
    pub fn apply_notation(&self, snapshot: &str, notation: &str) -> Result<AppliedMove, CoreError> {
        let mv = notation_to_move(notation).map_err(CoreError::InvalidNotation)?;
        self.validate_and_apply(snapshot, &mv)
    }

    pub fn terminal_state(&self, snapshot: &str) -> Result<TerminalState, CoreError> {
        let state = GameState::from_snapshot(snapshot)?;
        Ok(classify(&state)?)
    }

    /// Record a resignation by `color` and return the new snapshot.
    pub fn resign(&self, snapshot: &str, color: Color) -> Result<String, CoreError> {
        let state = GameState::from_snapshot(snapshot)?;
        Ok(move_engine::resign(&state, color)?.to_snapshot())
    }

    /// Let the engine pick and apply a move for the side to move.
    pub fn computer_move(
        &mut self,
        snapshot: &str,
        difficulty: Difficulty,
        last_move_hint: Option<Move>,
    ) -> Result<ComputerMove, CoreError> {
        let state = GameState::from_snapshot(snapshot)?;
        if let TerminalState::Over { reason, .. } = classify(&state)? {
            return Err(IllegalMoveError::GameOver { reason }.into());
        }

        let params = GoParams {
            difficulty: Some(difficulty),
            last_move_hint,
            ..GoParams::default()
        };
        let output = self.engine.choose_move(&state, &params, None)?;
        let Some(mv) = output.best_move else {
            return Err(CoreError::Generation(
                crate::move_generation::move_generator::MoveGenerationError::InvalidState(
                    "engine returned no move for a position in progress".to_owned(),
                ),
            ));
        };
        for line in &output.info_lines {
            log::debug!("{line}");
        }

        let applied = apply_to_state(&state, &mv)?;
        Ok(ComputerMove {
            mv,
            notation: move_to_notation(&mv),
            score: output.score,
            depth_reached: output.depth_reached,
            applied,
        })
    }
}

fn apply_to_state(state: &GameState, mv: &Move) -> Result<AppliedMove, CoreError> {
    let (next, record) = move_engine::apply(state, mv)?;
    let terminal = classify(&next)?;
    Ok(AppliedMove {
        snapshot: next.to_snapshot(),
        record,
        terminal,
    })
}

#[cfg(test)]
mod tests {
    use super::CoralCore;
    use crate::engines::engine_config::EngineConfig;
    use crate::engines::engine_iterative::IterativeEngine;
    use crate::errors::{CoreError, IllegalMoveError};
    use crate::game_state::coral_rules::STARTING_POSITION_SNAPSHOT;
    use crate::game_state::coral_types::Color;
    use crate::game_state::terminal_state::{TerminalReason, TerminalState};
    use crate::search::difficulty::Difficulty;

    fn core() -> CoralCore<IterativeEngine> {
        CoralCore::new(IterativeEngine::new(EngineConfig {
            max_depth: Some(1),
            seed: Some(11),
            ..EngineConfig::default()
        }))
    }

    #[test]
    fn apply_notation_returns_next_snapshot() {
        let applied = core()
            .apply_notation(STARTING_POSITION_SNAPSHOT, "e2e3+c")
            .expect("move should apply");
        assert_eq!(
            applied.snapshot,
            format!(
                "topdhpot/cccccccc/8/8/8/4C3/CCCC1CCC/TOPDHPOT b 0 1 e3 - 16/17 e1,e8 - | {STARTING_POSITION_SNAPSHOT} | e2e3+c"
            )
        );
        assert_eq!(applied.record.notation, "e2e3+c");
        assert_eq!(applied.terminal, TerminalState::InProgress);
    }

    #[test]
    fn rejected_requests_are_client_errors() {
        let core = core();
        let illegal = core
            .apply_notation(STARTING_POSITION_SNAPSHOT, "e2e5")
            .expect_err("crabs step one square");
        assert!(illegal.is_client_error());

        let bad_snapshot = core
            .terminal_state("not a snapshot")
            .expect_err("garbage snapshot");
        assert!(matches!(bad_snapshot, CoreError::Snapshot(_)));
        assert!(bad_snapshot.is_client_error());

        let bad_notation = core
            .apply_notation(STARTING_POSITION_SNAPSHOT, "zz")
            .expect_err("garbage notation");
        assert!(matches!(bad_notation, CoreError::InvalidNotation(_)));
    }

    #[test]
    fn computer_move_is_applied_to_the_snapshot() {
        let mut core = core();
        let reply = core
            .computer_move(STARTING_POSITION_SNAPSHOT, Difficulty::Hard, None)
            .expect("engine should move");
        assert!(core
            .legal_moves(STARTING_POSITION_SNAPSHOT, None)
            .expect("moves")
            .contains(&reply.notation));
        assert!(reply.applied.snapshot.contains(" b 0 1 ") || reply.applied.snapshot.contains(" b 1 1 "));
    }

    #[test]
    fn resigned_game_refuses_computer_move() {
        let mut core = core();
        let resigned = core
            .resign(STARTING_POSITION_SNAPSHOT, Color::White)
            .expect("resign");
        assert_eq!(
            core.terminal_state(&resigned).expect("classify").reason(),
            Some(TerminalReason::Resignation)
        );
        let err = core
            .computer_move(&resigned, Difficulty::Easy, None)
            .expect_err("game is over");
        assert!(matches!(
            err,
            CoreError::Illegal(IllegalMoveError::GameOver {
                reason: TerminalReason::Resignation
            })
        ));
    }

    #[test]
    fn legal_moves_can_be_filtered_by_square() {
        let moves = core()
            .legal_moves(STARTING_POSITION_SNAPSHOT, Some("b1"))
            .expect("moves");
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|m| m.starts_with("b1")));
    }

    #[test]
    fn threefold_repetition_is_reported_across_snapshots() {
        let core = core();
        let mut snapshot = "4h2t/8/8/8/8/8/8/T3H3 w 0 1 - - 17/17 e1,e8 -".to_owned();
        let shuffle = ["a1a2", "h8h7", "a2a1", "h7h8"];

        for (ply, notation) in shuffle.iter().chain(shuffle.iter()).enumerate() {
            assert_eq!(
                core.terminal_state(&snapshot).expect("classify"),
                TerminalState::InProgress,
                "game ended early at ply {ply}"
            );
            snapshot = core.apply_notation(&snapshot, notation).expect("legal shuffle").snapshot;
        }

        let terminal = core.terminal_state(&snapshot).expect("classify");
        assert_eq!(terminal.reason(), Some(TerminalReason::ThreefoldRepetition));
        assert_eq!(terminal.winner(), None);

        let err = core.apply_notation(&snapshot, "a1a2").expect_err("game is drawn");
        assert!(matches!(
            err,
            CoreError::Illegal(IllegalMoveError::GameOver {
                reason: TerminalReason::ThreefoldRepetition
            })
        ));
    }
}
