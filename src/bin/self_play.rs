//! Engine-vs-engine self-play with a persisted evaluation cache.
//!
//! Run with:
//! `cargo run --release --bin self_play -- --games 4 --white hard --black easy --cache-dir ./cache`
//! Set `RUST_LOG=debug` to see per-depth search progress.

use std::path::PathBuf;

use coral_clash::engines::engine_config::EngineConfig;
use coral_clash::engines::engine_iterative::IterativeEngine;
use coral_clash::search::difficulty::Difficulty;
use coral_clash::utils::self_play_harness::{play_self_play_game, SelfPlayConfig};

struct Args {
    games: u32,
    seed: u64,
    max_plies: u16,
    white: Difficulty,
    black: Difficulty,
    cache_dir: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        games: 2,
        seed: 1234,
        max_plies: 160,
        white: Difficulty::Medium,
        black: Difficulty::Medium,
        cache_dir: None,
    };

    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--games" => args.games = value()?.parse().map_err(|e| format!("--games: {e}"))?,
            "--seed" => args.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
            "--max-plies" => {
                args.max_plies = value()?.parse().map_err(|e| format!("--max-plies: {e}"))?
            }
            "--white" => args.white = value()?.parse()?,
            "--black" => args.black = value()?.parse()?,
            "--cache-dir" => args.cache_dir = Some(PathBuf::from(value()?)),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = parse_args()?;

    let config_for = |difficulty, seed| EngineConfig {
        cache_dir: args.cache_dir.clone(),
        seed: Some(seed),
        ..EngineConfig::for_difficulty(difficulty)
    };
    let mut white = IterativeEngine::new(config_for(args.white, args.seed));
    let mut black = IterativeEngine::new(config_for(args.black, args.seed.wrapping_add(1)));

    if let Some(entries) = white.open_cache() {
        log::info!("white engine loaded {entries} cached positions");
    }
    if let Some(entries) = black.open_cache() {
        log::info!("black engine loaded {entries} cached positions");
    }

    for game in 0..args.games {
        let result = play_self_play_game(
            &mut white,
            &mut black,
            args.seed.wrapping_add(u64::from(game)),
            SelfPlayConfig {
                max_plies: args.max_plies,
                ..SelfPlayConfig::default()
            },
        )
        .map_err(|e| e.to_string())?;
        println!("game {}: {}", game + 1, result.report());
        println!("  final: {}", result.final_snapshot);
    }

    // Both engines share the directory; the one with more positions wins.
    let keeper = if white.table().len() >= black.table().len() {
        &white
    } else {
        &black
    };
    let stats = keeper.table().stats();
    println!(
        "cache entries={} hits={} misses={} hit_rate={:.3}",
        keeper.table().len(),
        stats.hits,
        stats.misses,
        stats.hit_rate
    );
    match keeper.save_cache() {
        Ok(Some(path)) => println!("saved cache to {}", path.display()),
        Ok(None) => {}
        Err(e) => log::warn!("could not save evaluation cache: {e}"),
    }
    Ok(())
}
