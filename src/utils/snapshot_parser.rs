//! Snapshot-to-GameState parser.
//!
//! Builds a fully populated state from the nine-field snapshot string and
//! rejects anything that breaks the board invariants. An optional history
//! section is replayed from its root, move by move, and must arrive at the
//! stated position.

use crate::errors::SnapshotError;
use crate::game_state::coral_rules::STARTING_CORAL;
use crate::game_state::move_history::MoveHistory;
use crate::game_state::{coral_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_whale_in_check;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::algebraic::{algebraic_to_square, square_name};
use crate::utils::move_notation::notation_to_move;
use crate::utils::snapshot_generator::{generate_position_snapshot, HISTORY_SEPARATOR};

pub const SNAPSHOT_FIELD_COUNT: usize = 9;

const CRAB_FORBIDDEN_RANKS: u64 = 0xFF00_0000_0000_00FF;

pub fn parse_snapshot(snapshot: &str) -> Result<GameState, SnapshotError> {
    let mut sections = snapshot.split(HISTORY_SEPARATOR);
    let position = parse_position(sections.next().unwrap_or_default())?;

    match (sections.next(), sections.next(), sections.next()) {
        (None, _, _) => Ok(position),
        (Some(root), Some(moves), None) => replay_history(&position, root, moves),
        _ => Err(SnapshotError::InvalidHistory(
            "expected a root position and a move list".to_owned(),
        )),
    }
}

fn parse_position(snapshot: &str) -> Result<GameState, SnapshotError> {
    let parts: Vec<&str> = snapshot.split_whitespace().collect();
    if parts.len() != SNAPSHOT_FIELD_COUNT {
        return Err(SnapshotError::FieldCount {
            expected: SNAPSHOT_FIELD_COUNT,
            found: parts.len(),
        });
    }

    let mut game_state = GameState::new_empty();

    parse_board(parts[0], &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(parts[1])?;
    game_state.halfmove_clock = parse_counter("reversible-move counter", parts[2])?;
    game_state.fullmove_number = parse_counter("full-move counter", parts[3])?;
    if game_state.fullmove_number == 0 {
        return Err(SnapshotError::InvalidCounter {
            field: "full-move counter",
            value: parts[3].to_owned(),
        });
    }
    game_state.coral[Color::White.index()] = parse_square_list("white coral", parts[4])?;
    game_state.coral[Color::Black.index()] = parse_square_list("black coral", parts[5])?;
    game_state.coral_remaining = parse_coral_remaining(parts[6])?;
    let whale_field = parse_whale_squares(parts[7])?;
    game_state.resigned = parse_resignation(parts[8])?;

    game_state.recalc_occupancy();
    validate(&game_state, whale_field, parts[7])?;

    game_state.zobrist_key = compute_zobrist_key(&game_state);
    game_state.repetition_history = vec![game_state.zobrist_key];
    game_state.history = MoveHistory::from_root(generate_position_snapshot(&game_state));

    Ok(game_state)
}

fn replay_history(position: &GameState, root: &str, moves: &str) -> Result<GameState, SnapshotError> {
    let mut replayed = parse_position(root)
        .map_err(|e| SnapshotError::InvalidHistory(format!("root position: {e}")))?;

    let moves = moves.trim();
    if moves != "-" {
        for notation in moves.split(',') {
            let mv = notation_to_move(notation).map_err(SnapshotError::InvalidHistory)?;
            let generated = LegalMoveGenerator
                .generate_legal_moves(&replayed)
                .map_err(|e| SnapshotError::InvalidHistory(e.to_string()))?;
            let found = generated.into_iter().find(|g| g.mv == mv).ok_or_else(|| {
                SnapshotError::InvalidHistory(format!(
                    "{} is not legal at ply {}",
                    notation.trim(),
                    replayed.ply
                ))
            })?;
            replayed = found.game_after_move;
        }
    }

    replayed.resigned = position.resigned;
    let reached = generate_position_snapshot(&replayed);
    if reached != generate_position_snapshot(position) {
        return Err(SnapshotError::HistoryMismatch { replayed: reached });
    }

    Ok(replayed)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), SnapshotError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(SnapshotError::InvalidBoard(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    for (snapshot_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7usize.saturating_sub(snapshot_rank_idx);
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                let step = empty_count as usize;
                if !(1..=8).contains(&step) {
                    return Err(SnapshotError::InvalidBoard(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += step;
                continue;
            }

            let (color, piece) = piece_from_snapshot_char(ch).ok_or(SnapshotError::InvalidPiece(ch))?;

            if file >= 8 {
                return Err(SnapshotError::InvalidBoard(format!(
                    "rank {} has too many files",
                    board_rank + 1
                )));
            }

            let sq = board_rank * 8 + file;
            game_state.pieces[color.index()][piece.index()] |= 1u64 << sq;
            file += 1;
        }

        if file != 8 {
            return Err(SnapshotError::InvalidBoard(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, SnapshotError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(SnapshotError::InvalidSide(side_part.to_owned())),
    }
}

fn parse_counter(field: &'static str, value: &str) -> Result<u16, SnapshotError> {
    value.parse::<u16>().map_err(|_| SnapshotError::InvalidCounter {
        field,
        value: value.to_owned(),
    })
}

fn parse_square_list(field: &'static str, value: &str) -> Result<u64, SnapshotError> {
    if value == "-" {
        return Ok(0);
    }

    let mut bitboard = 0u64;
    for name in value.split(',') {
        let square = algebraic_to_square(name)
            .map_err(|reason| SnapshotError::InvalidSquare { field, reason })?;
        let bit = 1u64 << square;
        if bitboard & bit != 0 {
            return Err(SnapshotError::InvalidSquare {
                field,
                reason: format!("{name} listed twice"),
            });
        }
        bitboard |= bit;
    }
    Ok(bitboard)
}

fn parse_coral_remaining(value: &str) -> Result<[u8; 2], SnapshotError> {
    let invalid = || SnapshotError::InvalidCounter {
        field: "coral remaining",
        value: value.to_owned(),
    };
    let (white, black) = value.split_once('/').ok_or_else(invalid)?;
    let white = white.parse::<u8>().map_err(|_| invalid())?;
    let black = black.parse::<u8>().map_err(|_| invalid())?;
    Ok([white, black])
}

fn parse_whale_squares(value: &str) -> Result<[Square; 2], SnapshotError> {
    let (white, black) = value
        .split_once(',')
        .ok_or_else(|| SnapshotError::WhaleSquareMismatch(value.to_owned()))?;
    let parse = |name: &str| {
        algebraic_to_square(name).map_err(|reason| SnapshotError::InvalidSquare {
            field: "whale squares",
            reason,
        })
    };
    Ok([parse(white)?, parse(black)?])
}

fn parse_resignation(value: &str) -> Result<Option<Color>, SnapshotError> {
    match value {
        "-" => Ok(None),
        "w" => Ok(Some(Color::White)),
        "b" => Ok(Some(Color::Black)),
        _ => Err(SnapshotError::InvalidResignation(value.to_owned())),
    }
}

fn validate(
    game_state: &GameState,
    whale_field: [Square; 2],
    whale_field_text: &str,
) -> Result<(), SnapshotError> {
    let overlap = game_state.coral[0] & game_state.coral[1];
    if overlap != 0 {
        return Err(SnapshotError::DuplicateCoral(square_name(
            overlap.trailing_zeros() as Square,
        )));
    }

    for color in ALL_COLORS {
        let on_board = game_state.coral_count(color);
        let remaining = u32::from(game_state.coral_remaining[color.index()]);
        if on_board + remaining != u32::from(STARTING_CORAL) {
            return Err(SnapshotError::CoralAccounting {
                color,
                on_board,
                remaining,
                expected: u32::from(STARTING_CORAL),
            });
        }
    }

    for color in ALL_COLORS {
        let found = game_state.count(color, PieceKind::Whale);
        if found != 1 {
            return Err(SnapshotError::WhaleCount { color, found });
        }
        if game_state.whale_square(color) != Some(whale_field[color.index()]) {
            return Err(SnapshotError::WhaleSquareMismatch(whale_field_text.to_owned()));
        }
    }

    let crabs = game_state.pieces[0][PieceKind::Crab.index()]
        | game_state.pieces[1][PieceKind::Crab.index()];
    let stranded = crabs & CRAB_FORBIDDEN_RANKS;
    if stranded != 0 {
        return Err(SnapshotError::CrabOnBackRank(square_name(
            stranded.trailing_zeros() as Square,
        )));
    }

    let waiting = game_state.side_to_move.opposite();
    if is_whale_in_check(game_state, waiting) {
        return Err(SnapshotError::OpponentInCheck(waiting));
    }

    Ok(())
}

fn piece_from_snapshot_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|piece| (color, piece))
}
