//! Iterative deepening search with negamax alpha-beta pruning and the
//! persistent evaluation cache.
//!
//! Depths run 1..=max_depth. The time budget is only checked between
//! completed depths, so depth 1 always finishes and an interrupted search
//! returns the last completed depth's result. Every node with remaining depth
//! first asks the cache; nodes with two or more plies left and the root are
//! written back.

use std::cmp::Reverse;
use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use crate::errors::SearchError;
use crate::game_state::coral_types::{Color, Move};
use crate::game_state::game_state::GameState;
use crate::game_state::terminal_state::{classify_with_legal_move_count, TerminalState};
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::search::board_scoring::{BoardScorer, MaterialScorer, MATE_SCORE};
use crate::search::difficulty::{select_candidate, Difficulty};
use crate::search::evaluation_cache::{Bound, CacheLookup, EvaluationTable, MoveData, ScoredMove};

/// Scores beyond this are mate scores and carry a ply distance.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;
const INFINITY: i32 = MATE_SCORE + 1;
/// Interior nodes with at least this many plies left are cached.
const CACHE_WRITE_MIN_DEPTH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub max_depth: u8,
    pub side_to_move: Color,
    pub max_time_ms: Option<u64>,
    pub difficulty: Difficulty,
    /// Opponent's last move, used to try recaptures first.
    pub last_move_hint: Option<Move>,
}

impl SearchRequest {
    pub fn for_state(game_state: &GameState, difficulty: Difficulty) -> Self {
        Self {
            max_depth: difficulty.default_depth(),
            side_to_move: game_state.side_to_move,
            max_time_ms: Some(difficulty.default_move_time_ms()),
            difficulty,
            last_move_hint: game_state.history.last().copied(),
        }
    }
}

/// Reported after each completed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchProgress {
    pub depth: u8,
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_writes: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    /// Score of the top-ranked move for the side to move, even when the
    /// difficulty picked a different one.
    pub score: i32,
    pub depth_reached: u8,
    pub stats: SearchStats,
    /// Ranked root moves of the last completed depth, best first.
    pub candidates: Vec<ScoredMove>,
    pub from_cache: bool,
}

struct SearchContext<'a, G: MoveGenerator, S: BoardScorer> {
    generator: &'a G,
    scorer: &'a S,
    cache: Option<&'a mut EvaluationTable>,
    difficulty: Difficulty,
    last_move_hint: Option<Move>,
    stats: SearchStats,
}

/// Search `game_state` and pick a move for `request.difficulty`.
///
/// The state is only read. `cache` is consulted and updated when given;
/// `progress` is called after every completed depth.
pub fn find_best_move<G, S, R>(
    game_state: &GameState,
    generator: &G,
    scorer: &S,
    request: &SearchRequest,
    cache: Option<&mut EvaluationTable>,
    mut progress: Option<&mut dyn FnMut(&SearchProgress)>,
    rng: &mut R,
) -> Result<SearchOutcome, SearchError>
where
    G: MoveGenerator,
    S: BoardScorer,
    R: Rng + ?Sized,
{
    if request.max_depth == 0 {
        return Err(SearchError::InvalidDepth);
    }
    if request.side_to_move != game_state.side_to_move {
        return Err(SearchError::SideToMoveMismatch {
            requested: request.side_to_move,
            actual: game_state.side_to_move,
        });
    }

    let started = Instant::now();
    let mut ctx = SearchContext {
        generator,
        scorer,
        cache,
        difficulty: request.difficulty,
        last_move_hint: request.last_move_hint,
        stats: SearchStats::default(),
    };

    let mut root_moves = generator.generate_legal_moves(game_state)?;
    if let TerminalState::Over { .. } = classify_with_legal_move_count(game_state, root_moves.len())
    {
        ctx.stats.nodes = 1;
        ctx.stats.elapsed_ms = elapsed_ms(started);
        return Ok(SearchOutcome {
            best_move: None,
            score: terminal_score(game_state, root_moves.len(), 0).unwrap_or(0),
            depth_reached: 0,
            stats: ctx.stats,
            candidates: Vec::new(),
            from_cache: false,
        });
    }

    let root_hash = game_state.zobrist_key;
    let mut seed_move = None;
    if let Some(cache) = ctx.cache.as_deref_mut() {
        match cache.get_moves(root_hash, request.difficulty) {
            CacheLookup::Hit(data) => {
                ctx.stats.cache_hits += 1;
                let usable = data.bound == Bound::Exact
                    && data.depth >= request.max_depth
                    && !data.candidates.is_empty()
                    && data
                        .candidates
                        .iter()
                        .all(|c| root_moves.iter().any(|g| g.mv == c.mv));
                if usable {
                    let candidates = data.candidates.clone();
                    let depth = data.depth;
                    let chosen = select_candidate(&candidates, request.difficulty, rng);
                    ctx.stats.nodes = 1;
                    ctx.stats.elapsed_ms = elapsed_ms(started);
                    log::debug!(
                        "root cache hit at depth {depth}: {}",
                        chosen.map_or_else(|| "-".to_owned(), |c| c.mv.to_string())
                    );
                    return Ok(SearchOutcome {
                        best_move: chosen.map(|c| c.mv),
                        score: candidates[0].score,
                        depth_reached: depth,
                        stats: ctx.stats,
                        candidates,
                        from_cache: true,
                    });
                }
                seed_move = data.best_move;
            }
            CacheLookup::Outdated(data) => {
                ctx.stats.cache_misses += 1;
                seed_move = data.best_move;
            }
            CacheLookup::Miss => ctx.stats.cache_misses += 1,
        }
    }

    order_moves(game_state, &mut root_moves, seed_move, ctx.last_move_hint);

    let mut ranked: Vec<ScoredMove> = Vec::new();
    let mut depth_reached = 0u8;

    for depth in 1..=request.max_depth {
        if depth > 1 {
            if let Some(budget) = request.max_time_ms {
                if elapsed_ms(started) >= budget {
                    log::debug!("time budget of {budget} ms spent before depth {depth}");
                    break;
                }
            }
        }

        let iteration = search_root(&mut ctx, &root_moves, depth)?;

        // Next iteration tries this iteration's ranking first.
        let order: Vec<Move> = iteration.iter().map(|c| c.mv).collect();
        root_moves.sort_by_key(|g| order.iter().position(|mv| *mv == g.mv).unwrap_or(usize::MAX));

        ranked = iteration;
        depth_reached = depth;

        let report = SearchProgress {
            depth,
            best_move: ranked.first().map(|c| c.mv),
            score: ranked.first().map_or(0, |c| c.score),
            nodes: ctx.stats.nodes,
            elapsed_ms: elapsed_ms(started),
        };
        log::debug!(
            "depth {} score {} nodes {} best {}",
            report.depth,
            report.score,
            report.nodes,
            report.best_move.map_or_else(|| "-".to_owned(), |mv| mv.to_string())
        );
        if let Some(callback) = progress.as_deref_mut() {
            callback(&report);
        }
    }

    let top = ranked.first().copied();
    let stored_candidates = if request.difficulty == Difficulty::Hard {
        ranked.iter().take(1).copied().collect()
    } else {
        ranked
            .iter()
            .take(request.difficulty.candidate_count())
            .copied()
            .collect()
    };

    if let (Some(top), Some(cache)) = (top, ctx.cache.as_deref_mut()) {
        let data = MoveData {
            best_move: Some(top.mv),
            score: top.score,
            depth: depth_reached,
            bound: Bound::Exact,
            candidates: stored_candidates,
            outdated: false,
        };
        if store_if_deeper(cache, root_hash, request.difficulty, data) {
            ctx.stats.cache_writes += 1;
        }
    }

    let chosen = select_candidate(&ranked, request.difficulty, rng);
    ctx.stats.elapsed_ms = elapsed_ms(started);

    Ok(SearchOutcome {
        best_move: chosen.map(|c| c.mv),
        score: top.map_or(0, |c| c.score),
        depth_reached,
        stats: ctx.stats,
        candidates: ranked,
        from_cache: false,
    })
}

/// Depth-limited search without cache, difficulty or time budget. Returns the
/// best move and its score.
pub fn search_fixed_depth<G: MoveGenerator>(
    game_state: &GameState,
    generator: &G,
    depth: u8,
) -> Result<(Option<Move>, i32), SearchError> {
    let request = SearchRequest {
        max_depth: depth,
        side_to_move: game_state.side_to_move,
        max_time_ms: None,
        difficulty: Difficulty::Hard,
        last_move_hint: None,
    };
    let mut rng = rand::rng();
    let outcome = find_best_move(game_state, generator, &MaterialScorer, &request, None, None, &mut rng)?;
    Ok((outcome.best_move, outcome.score))
}

fn search_root<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    root_moves: &[GeneratedMove],
    depth: u8,
) -> Result<Vec<ScoredMove>, SearchError> {
    ctx.stats.nodes += 1;

    // Hard only needs the best move, so the window narrows as it improves.
    // Easier tiers need exact scores for the runners-up and keep it open.
    let narrow = ctx.difficulty == Difficulty::Hard;
    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut scored = Vec::with_capacity(root_moves.len());

    for generated in root_moves {
        let window_alpha = if narrow { alpha } else { -INFINITY };
        let score = -negamax(
            ctx,
            &generated.game_after_move,
            depth - 1,
            -beta,
            -window_alpha,
            1,
        )?;
        scored.push(ScoredMove {
            mv: generated.mv,
            score,
        });
        if score > alpha {
            alpha = score;
        }
    }

    scored.sort_by_key(|c| Reverse(c.score));
    Ok(scored)
}

fn negamax<G: MoveGenerator, S: BoardScorer>(
    ctx: &mut SearchContext<'_, G, S>,
    game_state: &GameState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: u8,
) -> Result<i32, SearchError> {
    ctx.stats.nodes += 1;

    let mut moves = ctx.generator.generate_legal_moves(game_state)?;
    if let Some(score) = terminal_score(game_state, moves.len(), ply) {
        return Ok(score);
    }

    if depth == 0 {
        return Ok(ctx.scorer.score(game_state));
    }

    let hash = game_state.zobrist_key;
    let mut hash_move = None;
    if let Some(cache) = ctx.cache.as_deref_mut() {
        match cache.get_moves(hash, ctx.difficulty) {
            CacheLookup::Hit(data) => {
                ctx.stats.cache_hits += 1;
                hash_move = data.best_move;
                if data.depth >= depth {
                    let score = score_from_cache(data.score, ply);
                    let cutoff = match data.bound {
                        Bound::Exact => true,
                        Bound::Lower => score >= beta,
                        Bound::Upper => score <= alpha,
                    };
                    if cutoff {
                        return Ok(score);
                    }
                }
            }
            CacheLookup::Outdated(data) => {
                ctx.stats.cache_misses += 1;
                hash_move = data.best_move;
            }
            CacheLookup::Miss => ctx.stats.cache_misses += 1,
        }
    }

    order_moves(game_state, &mut moves, hash_move, ctx.last_move_hint);

    let alpha_original = alpha;
    let mut best = -INFINITY;
    let mut best_move = None;

    for generated in &moves {
        let score = -negamax(
            ctx,
            &generated.game_after_move,
            depth - 1,
            -beta,
            -alpha,
            ply.saturating_add(1),
        )?;

        if score > best {
            best = score;
            best_move = Some(generated.mv);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    if depth >= CACHE_WRITE_MIN_DEPTH {
        if let Some(cache) = ctx.cache.as_deref_mut() {
            let bound = if best <= alpha_original {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            let data = MoveData {
                best_move,
                score: score_to_cache(best, ply),
                depth,
                bound,
                candidates: Vec::new(),
                outdated: false,
            };
            if store_if_deeper(cache, hash, ctx.difficulty, data) {
                ctx.stats.cache_writes += 1;
            }
        }
    }

    Ok(best)
}

/// Store unless a fresh entry searched deeper is already present.
fn store_if_deeper(
    cache: &mut EvaluationTable,
    hash: u64,
    difficulty: Difficulty,
    data: MoveData,
) -> bool {
    let keep_existing = cache
        .peek_seed(hash, difficulty)
        .is_some_and(|existing| !existing.outdated && existing.depth > data.depth);
    if keep_existing {
        return false;
    }
    cache.set_moves(hash, difficulty, data);
    true
}

/// Score of a finished game from the side to move's view, or `None` while
/// play continues.
fn terminal_score(game_state: &GameState, legal_move_count: usize, ply: u8) -> Option<i32> {
    match classify_with_legal_move_count(game_state, legal_move_count) {
        TerminalState::InProgress => None,
        TerminalState::Over { winner: None, .. } => Some(0),
        TerminalState::Over {
            winner: Some(winner),
            ..
        } => {
            let mate = MATE_SCORE - i32::from(ply);
            Some(if winner == game_state.side_to_move { mate } else { -mate })
        }
    }
}

// Cached mate scores are stored relative to the node, not the root.
#[inline]
fn score_to_cache(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score + i32::from(ply)
    } else if score < -MATE_THRESHOLD {
        score - i32::from(ply)
    } else {
        score
    }
}

#[inline]
fn score_from_cache(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score - i32::from(ply)
    } else if score < -MATE_THRESHOLD {
        score + i32::from(ply)
    } else {
        score
    }
}

fn order_moves(
    game_state: &GameState,
    moves: &mut [GeneratedMove],
    hash_move: Option<Move>,
    last_move_hint: Option<Move>,
) {
    moves.sort_by_cached_key(|g| Reverse(move_order_score(game_state, g, hash_move, last_move_hint)));
}

fn move_order_score(
    game_state: &GameState,
    generated: &GeneratedMove,
    hash_move: Option<Move>,
    last_move_hint: Option<Move>,
) -> i32 {
    let mv = generated.mv;
    if Some(mv) == hash_move {
        return 1_000_000;
    }

    let mut score = 0i32;
    if let Some(victim) = generated.captured {
        let aggressor = game_state
            .piece_on(mv.from)
            .map_or(100, |(_, kind)| MaterialScorer::piece_value(kind));
        score += 100_000 + MaterialScorer::piece_value(victim) * 16 - aggressor;
        if last_move_hint.is_some_and(|hint| hint.to == mv.to) {
            score += 50_000;
        }
    }
    if let Some(promotion) = mv.promotion {
        score += 90_000 + MaterialScorer::piece_value(promotion);
    }
    if generated.gives_check {
        score += 20_000;
    }
    if mv.has_coral_action() {
        score += 10_000;
    }
    score
}

#[inline]
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
