//! Validated move application and history-replay undo.
//!
//! This is the entry point for untrusted moves. `apply` checks a move against
//! the generated legal set before anything changes, and classifies the reason
//! when it refuses. `undo` rebuilds the state by replaying the history from
//! its root snapshot.

use serde::Serialize;

use crate::errors::{HistoryError, IllegalMoveError, MoveError};
use crate::game_state::coral_types::{Color, Move, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::game_state::terminal_state::{classify, TerminalState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};
use crate::utils::algebraic::square_name;
use crate::utils::move_notation::move_to_notation;

/// What an applied move did, for callers that notify players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub mover: Color,
    pub moved: PieceKind,
    pub captured: Option<PieceKind>,
    pub coral_placed: Option<Square>,
    pub coral_removed: Option<Square>,
    pub notation: String,
}

/// Legal moves for the side to move, optionally only those leaving `from`.
pub fn legal_moves(game_state: &GameState, from: Option<Square>) -> MoveGenResult<Vec<Move>> {
    let generated = LegalMoveGenerator.generate_legal_moves(game_state)?;
    Ok(generated
        .into_iter()
        .map(|g| g.mv)
        .filter(|mv| from.map_or(true, |sq| mv.from == sq))
        .collect())
}

/// Apply `mv` if it is legal in `game_state`. The input state is never
/// modified; on error nothing has been applied.
pub fn apply(game_state: &GameState, mv: &Move) -> Result<(GameState, MoveRecord), MoveError> {
    if let TerminalState::Over { reason, .. } = classify(game_state)? {
        return Err(IllegalMoveError::GameOver { reason }.into());
    }

    let generated = LegalMoveGenerator.generate_legal_moves(game_state)?;
    let Some(found) = generated.into_iter().find(|g| g.mv == *mv) else {
        return Err(diagnose_illegal_move(game_state, mv).into());
    };

    let mover = game_state.side_to_move;
    let moved = game_state
        .piece_on(mv.from)
        .map(|(_, kind)| kind)
        .ok_or_else(|| IllegalMoveError::NoPieceOnSquare {
            square: square_name(mv.from),
        })?;

    let record = MoveRecord {
        mv: *mv,
        mover,
        moved,
        captured: found.captured,
        coral_placed: mv.coral_placed,
        coral_removed: mv.coral_removed,
        notation: move_to_notation(mv),
    };

    Ok((found.game_after_move, record))
}

/// Record a resignation by `color`. Refused once the game is over.
pub fn resign(game_state: &GameState, color: Color) -> Result<GameState, MoveError> {
    if let TerminalState::Over { reason, .. } = classify(game_state)? {
        return Err(IllegalMoveError::GameOver { reason }.into());
    }
    let mut next = game_state.clone();
    next.resigned = Some(color);
    Ok(next)
}

/// Undo the last ply. Returns the restored state and the move taken back.
pub fn undo(game_state: &GameState) -> Result<(GameState, Move), HistoryError> {
    let last = *game_state.history.last().ok_or(HistoryError::EmptyHistory)?;
    let restored = undo_plies(game_state, 1)?;
    Ok((restored, last))
}

/// Undo `plies` plies at once. Fails without touching anything when the
/// history is shorter than requested.
pub fn undo_plies(game_state: &GameState, plies: usize) -> Result<GameState, HistoryError> {
    let available = game_state.history.len();
    if available == 0 && plies > 0 {
        return Err(HistoryError::EmptyHistory);
    }
    if plies > available {
        return Err(HistoryError::NotEnoughHistory {
            requested: plies,
            available,
        });
    }

    let kept = game_state.history.truncated(plies);
    let mut replayed = GameState::from_snapshot(kept.root_snapshot())
        .map_err(|e| HistoryError::ReplayFailed(format!("root snapshot: {e}")))?;
    for mv in kept.moves() {
        replayed = apply_move(&replayed, *mv)
            .map_err(|e| HistoryError::ReplayFailed(format!("{}: {e}", move_to_notation(mv))))?;
    }
    replayed.resigned = game_state.resigned;

    Ok(replayed)
}

/// Effective number of plies to undo when an undo request is approved after
/// more moves were played. `move_index_*` are history lengths at request and
/// approval time.
#[inline]
pub fn reconcile_undo_plies(
    requested: usize,
    move_index_at_request: usize,
    move_index_at_approval: usize,
) -> usize {
    requested + move_index_at_approval.saturating_sub(move_index_at_request)
}

fn diagnose_illegal_move(game_state: &GameState, mv: &Move) -> IllegalMoveError {
    let side = game_state.side_to_move;
    let Some((owner, kind)) = game_state.piece_on(mv.from) else {
        return IllegalMoveError::NoPieceOnSquare {
            square: square_name(mv.from),
        };
    };
    if owner != side {
        return IllegalMoveError::NotSideToMove {
            square: square_name(mv.from),
            owner,
            to_move: side,
        };
    }

    if mv.has_coral_action() && !kind.is_gatherer() {
        return IllegalMoveError::CoralActionNotAllowed { kind };
    }
    let placed_elsewhere = mv.coral_placed.is_some_and(|sq| sq != mv.to);
    let removed_elsewhere = mv.coral_removed.is_some_and(|sq| sq != mv.to);
    if placed_elsewhere
        || removed_elsewhere
        || (mv.coral_placed.is_some() && mv.coral_removed.is_some())
    {
        return IllegalMoveError::CoralSquareMismatch;
    }

    let reaches_far_rank = mv.to / 8 == side.promotion_rank();
    match mv.promotion {
        None if kind == PieceKind::Crab && reaches_far_rank => {
            return IllegalMoveError::PromotionRequired {
                square: square_name(mv.to),
            };
        }
        Some(promo)
            if kind != PieceKind::Crab || !reaches_far_rank || !promo.is_promotion_choice() =>
        {
            return IllegalMoveError::InvalidPromotion { kind: promo };
        }
        _ => {}
    }

    let to_mask = 1u64 << mv.to;
    if mv.coral_placed.is_some() {
        if game_state.coral_remaining[side.index()] == 0 {
            return IllegalMoveError::CoralExhausted { color: side };
        }
        let occupied_by_enemy = game_state.occupancy_by_color[side.opposite().index()] & to_mask != 0;
        if game_state.coral_on(mv.to).is_some() || occupied_by_enemy {
            return IllegalMoveError::CoralPlacementBlocked {
                square: square_name(mv.to),
            };
        }
    }
    if mv.coral_removed.is_some() && game_state.coral_on(mv.to).is_none() {
        return IllegalMoveError::NoCoralToRemove {
            square: square_name(mv.to),
        };
    }

    IllegalMoveError::NotLegal {
        notation: move_to_notation(mv),
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, legal_moves, reconcile_undo_plies, resign, undo, undo_plies};
    use crate::errors::{HistoryError, IllegalMoveError, MoveError};
    use crate::game_state::coral_types::{Color, Move, PieceKind};
    use crate::game_state::game_state::GameState;
    use crate::game_state::terminal_state::TerminalReason;

    fn illegal(game: &GameState, mv: Move) -> IllegalMoveError {
        match apply(game, &mv) {
            Err(MoveError::Illegal(e)) => e,
            other => panic!("expected illegal move error, got {other:?}"),
        }
    }

    #[test]
    fn legal_moves_can_be_filtered_by_square() {
        let game = GameState::new_game();
        let from_b1 = legal_moves(&game, Some(1)).expect("generation should succeed");
        assert_eq!(from_b1.len(), 4);
        assert!(from_b1.iter().all(|mv| mv.from == 1));
        assert_eq!(legal_moves(&game, None).expect("generation").len(), 24);
    }

    #[test]
    fn apply_records_coral_placement() {
        let game = GameState::new_game();
        let mv = Move::new(1, 18).placing_coral();
        let (next, record) = apply(&game, &mv).expect("move should apply");

        assert_eq!(record.moved, PieceKind::Octopus);
        assert_eq!(record.mover, Color::White);
        assert_eq!(record.captured, None);
        assert_eq!(record.coral_placed, Some(18));
        assert_eq!(record.notation, "b1c3+c");
        assert_eq!(next.coral_remaining, [16, 17]);
        // Input state is untouched.
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn apply_then_undo_restores_state() {
        let game = GameState::new_game();
        let (after_one, _) = apply(&game, &Move::new(12, 20).placing_coral()).expect("apply");
        let (after_two, _) = apply(&after_one, &Move::new(57, 42)).expect("apply");

        let (undone, taken_back) = undo(&after_two).expect("undo");
        assert_eq!(taken_back, Move::new(57, 42));
        assert_eq!(undone, after_one);

        let (root, _) = undo(&undone).expect("undo");
        assert_eq!(root, game);
    }

    #[test]
    fn undo_on_empty_history_fails() {
        let game = GameState::new_game();
        assert_eq!(undo(&game).expect_err("should fail"), HistoryError::EmptyHistory);
    }

    #[test]
    fn undo_plies_refuses_more_than_history() {
        let game = GameState::new_game();
        let (after_one, _) = apply(&game, &Move::new(12, 20)).expect("apply");
        assert_eq!(
            undo_plies(&after_one, 2).expect_err("should fail"),
            HistoryError::NotEnoughHistory {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(undo_plies(&after_one, 1).expect("undo"), game);
    }

    #[test]
    fn undo_reconciliation_adds_plies_played_while_waiting() {
        assert_eq!(reconcile_undo_plies(1, 10, 10), 1);
        assert_eq!(reconcile_undo_plies(1, 10, 11), 2);
        assert_eq!(reconcile_undo_plies(2, 10, 9), 2);
    }

    #[test]
    fn illegal_moves_are_classified() {
        let game = GameState::new_game();

        assert!(matches!(
            illegal(&game, Move::new(20, 28)),
            IllegalMoveError::NoPieceOnSquare { .. }
        ));
        assert!(matches!(
            illegal(&game, Move::new(52, 44)),
            IllegalMoveError::NotSideToMove { owner: Color::Black, .. }
        ));
        assert_eq!(
            illegal(&game, Move::new(3, 20).placing_coral()),
            IllegalMoveError::CoralActionNotAllowed {
                kind: PieceKind::Dolphin
            }
        );
        let mut wrong_square = Move::new(12, 20);
        wrong_square.coral_placed = Some(21);
        assert_eq!(illegal(&game, wrong_square), IllegalMoveError::CoralSquareMismatch);
        assert_eq!(
            illegal(&game, Move::new(12, 20).removing_coral()),
            IllegalMoveError::NoCoralToRemove {
                square: "e3".to_owned()
            }
        );
        assert!(matches!(
            illegal(&game, Move::new(12, 28)),
            IllegalMoveError::NotLegal { .. }
        ));
    }

    #[test]
    fn promotion_must_be_named() {
        let game = GameState::from_snapshot("4h3/C7/8/8/8/8/8/4H3 w 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        assert_eq!(
            illegal(&game, Move::new(48, 56)),
            IllegalMoveError::PromotionRequired {
                square: "a8".to_owned()
            }
        );
        assert_eq!(
            illegal(&game, Move::new(48, 56).with_promotion(PieceKind::Whale)),
            IllegalMoveError::InvalidPromotion {
                kind: PieceKind::Whale
            }
        );
        let (next, _) = apply(&game, &Move::new(48, 56).with_promotion(PieceKind::Octopus))
            .expect("promotion should apply");
        assert_eq!(next.piece_on(56), Some((Color::White, PieceKind::Octopus)));
    }

    #[test]
    fn capture_cannot_place_coral() {
        let game = GameState::from_snapshot("4h3/8/8/8/8/3c4/4C3/4H3 w 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        assert_eq!(
            illegal(&game, Move::new(12, 19).placing_coral()),
            IllegalMoveError::CoralPlacementBlocked {
                square: "d3".to_owned()
            }
        );
        let (next, record) = apply(&game, &Move::new(12, 19)).expect("capture should apply");
        assert_eq!(record.captured, Some(PieceKind::Crab));
        assert_eq!(next.count(Color::Black, PieceKind::Crab), 0);
    }

    #[test]
    fn finished_game_refuses_moves() {
        let game = GameState::from_snapshot("8/8/8/8/8/2h5/1d6/H7 w 0 1 - - 17/17 a1,c3 -")
            .expect("snapshot should parse");
        assert_eq!(
            illegal(&game, Move::new(0, 1)),
            IllegalMoveError::GameOver {
                reason: TerminalReason::Checkmate
            }
        );

        let resigned = resign(&GameState::new_game(), Color::White).expect("resign");
        assert_eq!(
            illegal(&resigned, Move::new(12, 20)),
            IllegalMoveError::GameOver {
                reason: TerminalReason::Resignation
            }
        );
    }
}
