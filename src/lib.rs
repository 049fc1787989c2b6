//! Crate root module declarations for the Coral Clash core.
//!
//! Exposes the board model, move engine, terminal detector, position hasher,
//! evaluation cache, search and engine facade so binaries, tests and the
//! game server can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod coral_rules;
    pub mod coral_types;
    pub mod game_state;
    pub mod move_history;
    pub mod terminal_state;
}

pub mod moves {
    pub mod crab_moves;
    pub mod dolphin_moves;
    pub mod octopus_moves;
    pub mod pufferfish_moves;
    pub mod slider_rays;
    pub mod turtle_moves;
    pub mod whale_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_crab;
    pub mod legal_moves_octopus;
    pub mod legal_moves_sliders;
    pub mod legal_moves_whale;
    pub mod move_engine;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod cache_migration;
    pub mod cache_persistence;
    pub mod difficulty;
    pub mod evaluation_cache;
    pub mod iterative_deepening;
    pub mod zobrist;
}

pub mod engines {
    pub mod coral_core;
    pub mod engine_config;
    pub mod engine_iterative;
    pub mod engine_trait;
}

pub mod utils {
    pub mod algebraic;
    pub mod move_notation;
    pub mod render_game_state;
    pub mod self_play_harness;
    pub mod snapshot_generator;
    pub mod snapshot_parser;
}
