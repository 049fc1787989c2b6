use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub coral_placements: usize,
    pub coral_removals: usize,
    pub promotions: usize,
    pub checks: usize,
}

pub fn perft<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(game_state)?;
    let mut total = PerftCounts::default();

    for mv in root_moves {
        perft_recurse(generator, &mv, depth, 1, &mut total)?;
    }

    Ok(total)
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    if current_depth == search_depth {
        counts.nodes += 1;

        if mv.captured.is_some() {
            counts.captures += 1;
        }
        if mv.mv.coral_placed.is_some() {
            counts.coral_placements += 1;
        }
        if mv.mv.coral_removed.is_some() {
            counts.coral_removals += 1;
        }
        if mv.mv.promotion.is_some() {
            counts.promotions += 1;
        }
        if mv.gives_check {
            counts.checks += 1;
        }

        return Ok(());
    }

    let moves = generator.generate_legal_moves(&mv.game_after_move)?;
    for child in moves {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }

    Ok(())
}
