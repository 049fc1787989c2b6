//! Inspect and migrate evaluation table files.
//!
//! Usage:
//! `cache_tool stats <file> [--tolerate]`
//! `cache_tool migrate <cache-dir>`

use std::path::Path;

use coral_clash::search::cache_migration::CacheStore;
use coral_clash::search::difficulty::ALL_DIFFICULTIES;
use coral_clash::search::evaluation_cache::{EvaluationTable, CURRENT_TABLE_VERSION};

fn usage() -> String {
    "usage: cache_tool stats <file> [--tolerate] | cache_tool migrate <cache-dir>".to_owned()
}

fn stats(path: &Path, tolerate: bool) -> Result<(), String> {
    let table = EvaluationTable::load(path, tolerate).map_err(|e| e.to_string())?;
    let outdated = table.entries().filter(|e| e.is_outdated()).count();
    println!("file: {}", path.display());
    println!("version: {} (engine {})", table.version(), CURRENT_TABLE_VERSION);
    println!("entries: {} ({} outdated)", table.len(), outdated);
    for difficulty in ALL_DIFFICULTIES {
        let tiers = table
            .entries()
            .filter(|e| e.moves.contains_key(&difficulty))
            .count();
        println!("  {difficulty}: {tiers}");
    }
    Ok(())
}

fn migrate(dir: &Path) -> Result<(), String> {
    let store = CacheStore::new(dir);
    let mut table = store.open_current(false, false);
    match store.migrate_from_previous(&mut table) {
        Some(report) => {
            println!(
                "migrated {} entries from version {} ({} skipped)",
                report.migrated, report.source_version, report.skipped
            );
            let path = store.save(&table).map_err(|e| e.to_string())?;
            println!("saved {}", path.display());
        }
        None => println!("no older table found in {}", dir.display()),
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("stats") => {
            let file = args.get(1).ok_or_else(usage)?;
            let tolerate = args.iter().any(|a| a == "--tolerate");
            stats(Path::new(file), tolerate)
        }
        Some("migrate") => {
            let dir = args.get(1).ok_or_else(usage)?;
            migrate(Path::new(dir))
        }
        _ => Err(usage()),
    }
}
