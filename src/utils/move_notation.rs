//! Coordinate notation for moves.
//!
//! `e2e3` for a plain move, a lowercase promotion letter after the squares
//! (`a7a8d`), then `+c` when coral is placed on the destination or `-c` when
//! it is removed (`b1c3+c`). Notation is state-free; legality is checked by
//! the move engine.

use crate::game_state::coral_types::{Move, PieceKind};
use crate::utils::algebraic::{algebraic_to_square, square_name};

const PLACED_SUFFIX: &str = "+c";
const REMOVED_SUFFIX: &str = "-c";

pub fn move_to_notation(mv: &Move) -> String {
    let mut out = String::with_capacity(7);
    out.push_str(&square_name(mv.from));
    out.push_str(&square_name(mv.to));

    if let Some(promotion) = mv.promotion {
        out.push(promotion.letter());
    }
    if mv.coral_placed.is_some() {
        out.push_str(PLACED_SUFFIX);
    } else if mv.coral_removed.is_some() {
        out.push_str(REMOVED_SUFFIX);
    }

    out
}

pub fn notation_to_move(notation: &str) -> Result<Move, String> {
    let text = notation.trim();
    if !text.is_ascii() || text.len() < 4 {
        return Err(format!("Invalid move notation: {notation}"));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let mut mv = Move::new(from, to);

    let mut rest = &text[4..];
    if let Some(stripped) = rest.strip_suffix(PLACED_SUFFIX) {
        mv = mv.placing_coral();
        rest = stripped;
    } else if let Some(stripped) = rest.strip_suffix(REMOVED_SUFFIX) {
        mv = mv.removing_coral();
        rest = stripped;
    }

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (None, _) => {}
        (Some(letter), None) if letter.is_ascii_lowercase() => {
            let kind = PieceKind::from_letter(letter)
                .filter(|kind| kind.is_promotion_choice())
                .ok_or_else(|| format!("Invalid promotion piece '{letter}' in {notation}"))?;
            mv = mv.with_promotion(kind);
        }
        _ => return Err(format!("Invalid move notation: {notation}")),
    }

    Ok(mv)
}
