//! Terminal-state detection.
//!
//! Status is derived from the state on demand and never stored. When several
//! conditions hold at once the first in this order wins: checkmate, coral
//! victory, resignation, stalemate, threefold repetition, insufficient
//! material, reversible-move limit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::coral_rules::{
    CORAL_VICTORY_THRESHOLD, REPETITION_LIMIT, REVERSIBLE_MOVE_LIMIT,
};
use crate::game_state::coral_types::{Color, PieceKind, ALL_COLORS};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_whale_in_check;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    Checkmate,
    CoralVictory,
    Resignation,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    ReversibleMoveLimit,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminalReason::Checkmate => "checkmate",
            TerminalReason::CoralVictory => "coral victory",
            TerminalReason::Resignation => "resignation",
            TerminalReason::Stalemate => "stalemate",
            TerminalReason::ThreefoldRepetition => "threefold repetition",
            TerminalReason::InsufficientMaterial => "insufficient material",
            TerminalReason::ReversibleMoveLimit => "reversible-move limit",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Decisive,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    InProgress,
    Over {
        outcome: Outcome,
        reason: TerminalReason,
        winner: Option<Color>,
    },
}

impl TerminalState {
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, TerminalState::Over { .. })
    }

    #[inline]
    pub fn reason(&self) -> Option<TerminalReason> {
        match self {
            TerminalState::InProgress => None,
            TerminalState::Over { reason, .. } => Some(*reason),
        }
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match self {
            TerminalState::InProgress => None,
            TerminalState::Over { winner, .. } => *winner,
        }
    }

    fn decisive(reason: TerminalReason, winner: Color) -> Self {
        TerminalState::Over {
            outcome: Outcome::Decisive,
            reason,
            winner: Some(winner),
        }
    }

    fn draw(reason: TerminalReason) -> Self {
        TerminalState::Over {
            outcome: Outcome::Draw,
            reason,
            winner: None,
        }
    }
}

/// Classify `game_state`, generating its legal moves to tell mate and
/// stalemate apart.
pub fn classify(game_state: &GameState) -> MoveGenResult<TerminalState> {
    let legal_move_count = if game_state.resigned.is_some() {
        // The generator yields nothing for resigned games; count the board's
        // moves so checkmate still outranks resignation.
        let mut probe = game_state.clone();
        probe.resigned = None;
        LegalMoveGenerator.generate_legal_moves(&probe)?.len()
    } else {
        LegalMoveGenerator.generate_legal_moves(game_state)?.len()
    };
    Ok(classify_with_legal_move_count(game_state, legal_move_count))
}

/// Classify with a legal-move count the caller already has (for example the
/// search, which generates moves anyway). The count ignores resignation.
pub fn classify_with_legal_move_count(
    game_state: &GameState,
    legal_move_count: usize,
) -> TerminalState {
    let to_move = game_state.side_to_move;
    let in_check = is_whale_in_check(game_state, to_move);

    if legal_move_count == 0 && in_check {
        return TerminalState::decisive(TerminalReason::Checkmate, to_move.opposite());
    }

    if let Some(winner) = coral_victor(game_state) {
        return TerminalState::decisive(TerminalReason::CoralVictory, winner);
    }

    if let Some(loser) = game_state.resigned {
        return TerminalState::decisive(TerminalReason::Resignation, loser.opposite());
    }

    if legal_move_count == 0 {
        return TerminalState::draw(TerminalReason::Stalemate);
    }

    if is_repetition_draw(game_state) {
        return TerminalState::draw(TerminalReason::ThreefoldRepetition);
    }

    if is_insufficient_material(game_state) {
        return TerminalState::draw(TerminalReason::InsufficientMaterial);
    }

    if game_state.halfmove_clock >= REVERSIBLE_MOVE_LIMIT {
        return TerminalState::draw(TerminalReason::ReversibleMoveLimit);
    }

    TerminalState::InProgress
}

/// Color holding enough coral to win. The side that just moved is checked
/// first, since only its move could have completed the threshold.
pub fn coral_victor(game_state: &GameState) -> Option<Color> {
    let just_moved = game_state.side_to_move.opposite();
    [just_moved, just_moved.opposite()]
        .into_iter()
        .find(|&color| game_state.coral_count(color) >= CORAL_VICTORY_THRESHOLD)
}

pub fn is_repetition_draw(game_state: &GameState) -> bool {
    let key = game_state.zobrist_key;
    game_state
        .repetition_history
        .iter()
        .filter(|&&seen| seen == key)
        .count()
        >= REPETITION_LIMIT
}

pub fn is_insufficient_material(game_state: &GameState) -> bool {
    ALL_COLORS.into_iter().all(|color| {
        game_state.count(color, PieceKind::Crab) == 0
            && game_state.count(color, PieceKind::Octopus) == 0
            && game_state.count(color, PieceKind::Turtle) == 0
            && game_state.count(color, PieceKind::Dolphin) == 0
            && game_state.count(color, PieceKind::Pufferfish) <= 1
    })
}

#[cfg(test)]
mod tests {
    use super::{classify, is_repetition_draw, Outcome, TerminalReason, TerminalState};
    use crate::game_state::coral_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::utils::move_notation::notation_to_move;

    fn state(snapshot: &str) -> GameState {
        GameState::from_snapshot(snapshot).expect("snapshot should parse")
    }

    #[test]
    fn start_position_is_in_progress() {
        let status = classify(&GameState::new_game()).expect("classify should run");
        assert_eq!(status, TerminalState::InProgress);
    }

    #[test]
    fn cornered_whale_is_checkmated() {
        let game = state("8/8/8/8/8/2h5/1d6/H7 w 0 1 - - 17/17 a1,c3 -");
        let status = classify(&game).expect("classify should run");
        assert_eq!(
            status,
            TerminalState::Over {
                outcome: Outcome::Decisive,
                reason: TerminalReason::Checkmate,
                winner: Some(Color::Black),
            }
        );
    }

    #[test]
    fn whale_without_moves_and_not_in_check_is_stalemate() {
        let game = state("7h/8/8/8/8/8/2d5/H7 w 0 1 - - 17/17 a1,h8 -");
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::Stalemate));
        assert_eq!(status.winner(), None);
    }

    #[test]
    fn lone_whales_are_insufficient_material() {
        let game = state("4h3/8/8/8/8/8/8/4H3 w 0 1 - - 17/17 e1,e8 -");
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::InsufficientMaterial));
    }

    #[test]
    fn twelve_coral_markers_win() {
        let game = state(
            "4h3/8/8/8/8/8/CCCCCCCC/1T2H3 b 0 30 a3,b3,c3,d3,e3,f3,g3,h3,a4,b4,c4,d4 - 5/17 e1,e8 -",
        );
        let status = classify(&game).expect("classify should run");
        assert_eq!(
            status,
            TerminalState::Over {
                outcome: Outcome::Decisive,
                reason: TerminalReason::CoralVictory,
                winner: Some(Color::White),
            }
        );
    }

    #[test]
    fn resignation_ends_the_game_for_the_other_side() {
        let mut game = GameState::new_game();
        game.resigned = Some(Color::White);
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::Resignation));
        assert_eq!(status.winner(), Some(Color::Black));
    }

    #[test]
    fn hundred_reversible_plies_draw() {
        let game = state("4h3/2c5/8/8/8/8/2C5/4H3 w 100 60 - - 17/17 e1,e8 -");
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::ReversibleMoveLimit));
    }

    #[test]
    fn checkmate_outranks_coral_victory() {
        let game = state(
            "8/8/8/8/3cccc1/2h5/1d6/H7 w 0 40 - a3,b3,c3,d3,e3,f3,g3,h3,a4,b4,c4,h4 17/5 a1,c3 -",
        );
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::Checkmate));
    }

    #[test]
    fn third_occurrence_of_a_position_draws() {
        let mut game = state("4h2t/8/8/8/8/8/8/T3H3 w 0 1 - - 17/17 e1,e8 -");
        let shuffle = ["a1a2", "h8h7", "a2a1", "h7h8"];

        for notation in shuffle.iter().chain(shuffle.iter()) {
            assert!(!is_repetition_draw(&game));
            assert_eq!(classify(&game).expect("classify should run"), TerminalState::InProgress);
            let mv = notation_to_move(notation).expect("notation");
            game = apply_move(&game, mv).expect("shuffle move should apply");
        }

        assert!(is_repetition_draw(&game));
        assert_eq!(
            classify(&game).expect("classify should run"),
            TerminalState::Over {
                outcome: Outcome::Draw,
                reason: TerminalReason::ThreefoldRepetition,
                winner: None,
            }
        );
    }

    #[test]
    fn coral_victory_outranks_resignation() {
        let game = state(
            "4h3/8/8/8/8/8/CCCCCCCC/1T2H3 b 0 30 a3,b3,c3,d3,e3,f3,g3,h3,a4,b4,c4,d4 - 5/17 e1,e8 w",
        );
        assert_eq!(game.resigned, Some(Color::White));
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::CoralVictory));
        assert_eq!(status.winner(), Some(Color::White));
    }

    #[test]
    fn coral_victory_outranks_stalemate() {
        let game = state(
            "7h/8/8/8/8/8/2d5/H7 w 0 1 - a5,b5,c5,d5,e5,f5,g5,h5,a6,b6,c6,d6 17/5 a1,h8 -",
        );
        assert!(LegalMoveGenerator
            .generate_legal_moves(&game)
            .expect("generation should run")
            .is_empty());
        let status = classify(&game).expect("classify should run");
        assert_eq!(status.reason(), Some(TerminalReason::CoralVictory));
        assert_eq!(status.winner(), Some(Color::Black));
    }
}
