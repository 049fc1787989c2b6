//! GameState-to-snapshot encoder.
//!
//! The first nine fields describe the position. When the state carries
//! history, ` | <root position> | <moves>` follows so the decoder can replay
//! it and rebuild the repetition list.

use crate::game_state::{coral_types::*, game_state::GameState};
use crate::utils::algebraic::{bitboard_squares, square_name};
use crate::utils::move_notation::move_to_notation;

pub const HISTORY_SEPARATOR: char = '|';

pub fn generate_snapshot(game_state: &GameState) -> String {
    let position = generate_position_snapshot(game_state);
    let history = &game_state.history;
    let root = history.root_snapshot();
    if root.is_empty() || (history.is_empty() && root == position) {
        return position;
    }

    let moves = if history.is_empty() {
        "-".to_owned()
    } else {
        history
            .moves()
            .iter()
            .map(move_to_notation)
            .collect::<Vec<_>>()
            .join(",")
    };
    format!("{position} {HISTORY_SEPARATOR} {root} {HISTORY_SEPARATOR} {moves}")
}

/// The nine position fields only.
pub fn generate_position_snapshot(game_state: &GameState) -> String {
    let board = generate_board_field(game_state);
    let whales = match (
        game_state.whale_square(Color::White),
        game_state.whale_square(Color::Black),
    ) {
        (Some(white), Some(black)) => format!("{},{}", square_name(white), square_name(black)),
        _ => "-".to_owned(),
    };
    let resigned = game_state
        .resigned
        .map_or('-', |color| color.snapshot_char());

    format!(
        "{} {} {} {} {} {} {}/{} {} {}",
        board,
        game_state.side_to_move.snapshot_char(),
        game_state.halfmove_clock,
        game_state.fullmove_number,
        generate_square_list(game_state.coral[Color::White.index()]),
        generate_square_list(game_state.coral[Color::Black.index()]),
        game_state.coral_remaining[Color::White.index()],
        game_state.coral_remaining[Color::Black.index()],
        whales,
        resigned,
    )
}

fn generate_board_field(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let sq = rank * 8 + file;
            if let Some((color, piece)) = game_state.piece_on(sq) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece_to_snapshot_char(color, piece));
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_square_list(bitboard: u64) -> String {
    if bitboard == 0 {
        return "-".to_owned();
    }
    bitboard_squares(bitboard)
        .map(square_name)
        .collect::<Vec<_>>()
        .join(",")
}

fn piece_to_snapshot_char(color: Color, piece: PieceKind) -> char {
    match color {
        Color::White => piece.letter().to_ascii_uppercase(),
        Color::Black => piece.letter(),
    }
}
