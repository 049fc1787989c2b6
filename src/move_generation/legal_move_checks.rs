use crate::game_state::{coral_types::*, game_state::GameState};
use crate::moves::crab_moves::crab_attacks;
use crate::moves::octopus_moves::octopus_attacks;
use crate::moves::pufferfish_moves::pufferfish_attacks;
use crate::moves::turtle_moves::turtle_attacks;
use crate::moves::whale_moves::whale_attacks;

#[inline]
pub fn is_whale_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(whale_sq) = game_state.whale_square(color) else {
        return false;
    };
    is_square_attacked(game_state, whale_sq, color.opposite())
}

/// True when any piece of `attacker_color` attacks `square`.
///
/// Steppers and leapers reach coral squares; sliders neither cross nor land
/// on coral.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let attackers = &game_state.pieces[attacker_color.index()];

    // A crab of one color attacks `square` exactly when a crab of the other
    // color standing on `square` would attack the crab.
    if crab_attacks(attacker_color.opposite(), square) & attackers[PieceKind::Crab.index()] != 0 {
        return true;
    }

    if octopus_attacks(square) & attackers[PieceKind::Octopus.index()] != 0 {
        return true;
    }

    if whale_attacks(square) & attackers[PieceKind::Whale.index()] != 0 {
        return true;
    }

    let coral = game_state.coral_occupancy();
    if coral & (1u64 << square) != 0 {
        return false;
    }

    let diagonal = attackers[PieceKind::Pufferfish.index()] | attackers[PieceKind::Dolphin.index()];
    if pufferfish_attacks(square, game_state.occupancy_all, coral) & diagonal != 0 {
        return true;
    }

    let orthogonal = attackers[PieceKind::Turtle.index()] | attackers[PieceKind::Dolphin.index()];
    if turtle_attacks(square, game_state.occupancy_all, coral) & orthogonal != 0 {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::{is_square_attacked, is_whale_in_check};
    use crate::game_state::coral_types::Color;
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_has_no_check() {
        let game = GameState::new_game();
        assert!(!is_whale_in_check(&game, Color::White));
        assert!(!is_whale_in_check(&game, Color::Black));
    }

    #[test]
    fn crab_attacks_diagonally_forward_only() {
        let game = GameState::from_snapshot("4h3/8/8/8/3C4/8/8/4H3 w 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        // White crab on d4 hits c5 and e5.
        assert!(is_square_attacked(&game, 34, Color::White));
        assert!(is_square_attacked(&game, 36, Color::White));
        assert!(!is_square_attacked(&game, 35, Color::White));
        assert!(!is_square_attacked(&game, 20, Color::White));
    }

    #[test]
    fn coral_shields_against_sliders_but_not_octopuses() {
        // Black turtle a1 looks at e1 through c1 coral.
        let game = GameState::from_snapshot("4h3/8/8/8/8/8/8/t3H3 w 0 1 - c1 17/16 e1,e8 -")
            .expect("snapshot should parse");
        assert!(!is_whale_in_check(&game, Color::White));

        let exposed = GameState::from_snapshot("4h3/8/8/8/8/8/8/t3H3 w 0 1 - - 17/17 e1,e8 -")
            .expect("snapshot should parse");
        assert!(is_whale_in_check(&exposed, Color::White));

        let leaper = GameState::from_snapshot("4h3/8/8/8/8/5o2/8/4H3 w 0 1 e1 - 16/17 e1,e8 -")
            .expect("snapshot should parse");
        assert!(is_whale_in_check(&leaper, Color::White));
    }
}
