//! Iterative deepening engine backed by the evaluation cache.
//!
//! The engine owns its table, loads it from the configured cache directory
//! on request and saves it when the caller checkpoints. Searching never
//! touches the disk.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_config::{EngineConfig, EngineConfigError};
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::errors::{CacheError, SearchError};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::search::board_scoring::CoralScorer;
use crate::search::cache_migration::CacheStore;
use crate::search::evaluation_cache::EvaluationTable;
use crate::search::iterative_deepening::{find_best_move, SearchProgress, SearchRequest};

pub struct IterativeEngine {
    config: EngineConfig,
    table: EvaluationTable,
    move_generator: LegalMoveGenerator,
    scorer: CoralScorer,
    rng: StdRng,
}

impl IterativeEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_table(config, EvaluationTable::new())
    }

    /// Engine using an already loaded table.
    pub fn with_table(config: EngineConfig, table: EvaluationTable) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            config,
            table,
            move_generator: LegalMoveGenerator,
            scorer: CoralScorer,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &EvaluationTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut EvaluationTable {
        &mut self.table
    }

    /// Replace the table with the one stored in the cache directory, seeding
    /// it from an older version when present. Returns the number of entries
    /// loaded, or `None` when no cache directory is configured.
    pub fn open_cache(&mut self) -> Option<usize> {
        let dir = self.config.cache_dir.as_ref()?;
        let store = CacheStore::new(dir);
        self.table = store.open_current(self.config.tolerate_version_mismatch, true);
        Some(self.table.len())
    }

    /// Write the table to the cache directory. `Ok(None)` when no directory
    /// is configured.
    pub fn save_cache(&self) -> Result<Option<PathBuf>, CacheError> {
        let Some(dir) = self.config.cache_dir.as_ref() else {
            return Ok(None);
        };
        CacheStore::new(dir).save(&self.table).map(Some)
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        "Coral Clash Iterative"
    }

    fn new_game(&mut self) {
        self.table.reset_stats();
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineConfigError> {
        self.config.set_option(name, value)?;
        if name.trim().eq_ignore_ascii_case("seed") {
            self.rng = seeded_rng(self.config.seed);
        }
        Ok(())
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        params: &GoParams,
        progress: Option<&mut dyn FnMut(&SearchProgress)>,
    ) -> Result<EngineOutput, SearchError> {
        let difficulty = self.config.effective_difficulty(params);
        let request = SearchRequest {
            max_depth: self.config.effective_depth(params),
            side_to_move: game_state.side_to_move,
            max_time_ms: Some(self.config.effective_move_time_ms(params)),
            difficulty,
            last_move_hint: params
                .last_move_hint
                .or_else(|| game_state.history.last().copied()),
        };

        let outcome = find_best_move(
            game_state,
            &self.move_generator,
            &self.scorer,
            &request,
            Some(&mut self.table),
            progress,
            &mut self.rng,
        )?;

        let mut out = EngineOutput {
            best_move: outcome.best_move,
            score: outcome.score,
            depth_reached: outcome.depth_reached,
            info_lines: Vec::new(),
        };
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {} time {}",
            outcome.depth_reached, outcome.score, outcome.stats.nodes, outcome.stats.elapsed_ms
        ));
        out.info_lines.push(format!(
            "info string cache hits {} misses {} writes {} entries {}{}",
            outcome.stats.cache_hits,
            outcome.stats.cache_misses,
            outcome.stats.cache_writes,
            self.table.len(),
            if outcome.from_cache { " root_hit" } else { "" }
        ));
        out.info_lines
            .push(format!("info string difficulty {difficulty}"));
        if let Some(best) = out.best_move {
            log::debug!("{} chose {best} at depth {}", self.name(), out.depth_reached);
        }

        Ok(out)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

#[cfg(test)]
mod tests {
    use super::IterativeEngine;
    use crate::engines::engine_config::EngineConfig;
    use crate::engines::engine_trait::{Engine, GoParams};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_engine::legal_moves;
    use crate::search::difficulty::Difficulty;
    use crate::search::iterative_deepening::SearchProgress;

    fn quick_config(difficulty: Difficulty) -> EngineConfig {
        EngineConfig {
            max_depth: Some(2),
            seed: Some(7),
            ..EngineConfig::for_difficulty(difficulty)
        }
    }

    #[test]
    fn engine_returns_legal_move_and_info_lines() {
        let game = GameState::new_game();
        let mut engine = IterativeEngine::new(quick_config(Difficulty::Easy));
        let mut depths = Vec::new();
        let mut record = |p: &SearchProgress| depths.push(p.depth);

        let out = engine
            .choose_move(&game, &GoParams::default(), Some(&mut record))
            .expect("engine should choose a move");

        let best = out.best_move.expect("move");
        assert!(legal_moves(&game, None).expect("moves").contains(&best));
        assert!(out.info_lines.iter().any(|l| l.starts_with("info depth 2")));
        assert_eq!(depths, vec![1, 2]);
        assert!(!engine.table().is_empty());
    }

    #[test]
    fn go_depth_overrides_configured_depth() {
        let game = GameState::new_game();
        let mut engine = IterativeEngine::new(quick_config(Difficulty::Hard));
        let out = engine
            .choose_move(
                &game,
                &GoParams {
                    depth: Some(1),
                    ..GoParams::default()
                },
                None,
            )
            .expect("engine should choose a move");
        assert_eq!(out.depth_reached, 1);
    }

    #[test]
    fn same_seed_gives_same_easy_choice() {
        let game = GameState::new_game();
        let mut a = IterativeEngine::new(quick_config(Difficulty::Easy));
        let mut b = IterativeEngine::new(quick_config(Difficulty::Easy));
        let params = GoParams::default();
        let first = a.choose_move(&game, &params, None).expect("a");
        let second = b.choose_move(&game, &params, None).expect("b");
        assert_eq!(first.best_move, second.best_move);
    }

    #[test]
    fn cache_round_trips_through_the_configured_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EngineConfig {
            cache_dir: Some(dir.path().to_path_buf()),
            ..quick_config(Difficulty::Medium)
        };

        let mut engine = IterativeEngine::new(config.clone());
        assert_eq!(engine.open_cache(), Some(0));
        engine
            .choose_move(&GameState::new_game(), &GoParams::default(), None)
            .expect("search");
        let saved = engine.save_cache().expect("save").expect("path");
        assert!(saved.exists());

        let mut reloaded = IterativeEngine::new(config);
        assert_eq!(reloaded.open_cache(), Some(engine.table().len()));
    }

    #[test]
    fn no_cache_dir_means_no_persistence() {
        let mut engine = IterativeEngine::default();
        assert_eq!(engine.open_cache(), None);
        assert!(matches!(engine.save_cache(), Ok(None)));
        assert!(engine.set_option("Seed", "3").is_ok());
        assert_eq!(engine.config().seed, Some(3));
    }
}
