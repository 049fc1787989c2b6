//! Terminal-oriented board renderer.
//!
//! Creates a human-readable board view from internal bitboards for debugging,
//! tests, and diagnostics. Pieces use their snapshot letters; an empty square
//! holding coral shows `*` (white coral) or `~` (black coral).

use crate::game_state::{coral_types::*, game_state::GameState};

/// Render the board to a string for terminal output.
///
/// Assumes square indexing where `0 == a1`, `7 == h1`, and `63 == h8`.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let sq = rank * 8 + file;
            out.push(square_char(game_state, sq));

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h\n");
    out.push_str(&format!(
        "coral in hand: white {} black {}",
        game_state.coral_remaining[Color::White.index()],
        game_state.coral_remaining[Color::Black.index()]
    ));

    out
}

fn square_char(game_state: &GameState, square: Square) -> char {
    if let Some((color, piece)) = game_state.piece_on(square) {
        return match color {
            Color::White => piece.letter().to_ascii_uppercase(),
            Color::Black => piece.letter(),
        };
    }

    match game_state.coral_on(square) {
        Some(Color::White) => '*',
        Some(Color::Black) => '~',
        None => '·',
    }
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::game_state::GameState;

    #[test]
    fn renders_pieces_and_coral() {
        let game = GameState::from_snapshot("4h3/8/8/8/3C4/8/8/4H3 w 0 1 d5 a1 16/16 e1,e8 -")
            .expect("snapshot should parse");
        let board = render_game_state(&game);

        assert!(board.contains("8 · · · · h · · · 8"));
        assert!(board.contains("5 · · · * · · · · 5"));
        assert!(board.contains("4 · · · C · · · · 4"));
        assert!(board.contains("1 ~ · · · H · · · 1"));
        assert!(board.ends_with("coral in hand: white 16 black 16"));
    }
}
