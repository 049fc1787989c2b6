//! Cross-version migration of evaluation tables and the on-disk store that
//! keeps one table file per version.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::CacheError;
use crate::search::evaluation_cache::{EvaluationTable, CURRENT_TABLE_VERSION};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub source_version: u32,
    pub migrated: usize,
    pub skipped: usize,
}

/// Copy entries of `source` that `target` lacks, flagged outdated. Entries
/// already in `target` are never overwritten.
pub fn migrate(source: &EvaluationTable, target: &mut EvaluationTable) -> MigrationReport {
    let mut report = MigrationReport {
        source_version: source.version(),
        ..MigrationReport::default()
    };

    for entry in source.entries() {
        if target.has(entry.hash) {
            report.skipped += 1;
            continue;
        }

        let mut copy = entry.clone();
        for data in copy.moves.values_mut() {
            data.outdated = true;
        }
        target.insert_entry(copy);
        report.migrated += 1;
    }

    log::info!(
        "Migrated evaluation table v{} -> v{}: {} copied, {} skipped",
        source.version(),
        target.version(),
        report.migrated,
        report.skipped
    );

    report
}

/// Directory holding `evaluation_table_v{N}.bin` files.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_filename(version: u32) -> String {
        format!("evaluation_table_v{version}.bin")
    }

    pub fn table_path(&self, version: u32) -> PathBuf {
        self.dir.join(Self::table_filename(version))
    }

    /// Load the current-version table. A missing file gives an empty table;
    /// an unreadable one is logged and replaced by an empty table. When
    /// `seed_from_previous` is set, entries of the newest older table are
    /// migrated in.
    pub fn open_current(&self, tolerate_version_mismatch: bool, seed_from_previous: bool) -> EvaluationTable {
        let path = self.table_path(CURRENT_TABLE_VERSION);
        let mut table = match EvaluationTable::load(&path, tolerate_version_mismatch) {
            Ok(table) => table,
            Err(CacheError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No evaluation table at {}, starting empty", path.display());
                EvaluationTable::new()
            }
            Err(e) => {
                log::warn!(
                    "Evaluation table {} unusable ({e}), starting empty",
                    path.display()
                );
                EvaluationTable::new()
            }
        };

        if seed_from_previous {
            self.migrate_from_previous(&mut table);
        }

        table
    }

    /// Newest loadable table older than `target_version`, walking backwards.
    pub fn find_migration_source(&self, target_version: u32) -> Option<EvaluationTable> {
        for version in (1..target_version).rev() {
            let path = self.table_path(version);
            if !path.exists() {
                continue;
            }
            match EvaluationTable::load(&path, true) {
                Ok(table) => return Some(table),
                Err(e) => log::warn!("Skipping migration source {}: {e}", path.display()),
            }
        }

        log::info!(
            "No older evaluation table found below v{target_version} in {}",
            self.dir.display()
        );
        None
    }

    pub fn migrate_from_previous(&self, target: &mut EvaluationTable) -> Option<MigrationReport> {
        let source = self.find_migration_source(target.version())?;
        Some(migrate(&source, target))
    }

    /// Save `table` under its own version's file name.
    pub fn save(&self, table: &EvaluationTable) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.table_path(table.version());
        table.save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{migrate, CacheStore};
    use crate::game_state::coral_types::Move;
    use crate::search::difficulty::Difficulty;
    use crate::search::evaluation_cache::{
        Bound, CacheLookup, EvaluationTable, MoveData, CURRENT_TABLE_VERSION,
    };

    fn data(score: i32) -> MoveData {
        MoveData {
            best_move: Some(Move::new(12, 20)),
            score,
            depth: 3,
            bound: Bound::Exact,
            candidates: Vec::new(),
            outdated: false,
        }
    }

    #[test]
    fn migration_never_overwrites_target_entries() {
        let mut source = EvaluationTable::with_version(2);
        source.set_moves(1, Difficulty::Hard, data(200));
        source.set_moves(2, Difficulty::Hard, data(300));

        let mut target = EvaluationTable::new();
        target.set_moves(1, Difficulty::Hard, data(100));

        let report = migrate(&source, &mut target);
        assert_eq!(report.migrated, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.source_version, 2);

        assert_eq!(target.get_moves(1, Difficulty::Hard).fresh().map(|d| d.score), Some(100));
        assert!(matches!(target.get_moves(2, Difficulty::Hard), CacheLookup::Outdated(d) if d.score == 300));
    }

    #[test]
    fn store_finds_newest_older_table() {
        let dir = TempDir::new().expect("temp dir");
        let store = CacheStore::new(dir.path());

        let mut v1 = EvaluationTable::with_version(1);
        v1.set_moves(10, Difficulty::Easy, data(1));
        store.save(&v1).expect("save v1");

        let mut v2 = EvaluationTable::with_version(2);
        v2.set_moves(20, Difficulty::Easy, data(2));
        store.save(&v2).expect("save v2");

        let source = store
            .find_migration_source(CURRENT_TABLE_VERSION)
            .expect("source should exist");
        assert_eq!(source.version(), 2);
        assert!(source.has(20));
    }

    #[test]
    fn corrupt_older_table_is_skipped() {
        let dir = TempDir::new().expect("temp dir");
        let store = CacheStore::new(dir.path());

        let mut v1 = EvaluationTable::with_version(1);
        v1.set_moves(10, Difficulty::Easy, data(1));
        store.save(&v1).expect("save v1");
        fs::write(store.table_path(2), b"CRLC garbage").expect("write junk");

        let source = store.find_migration_source(3).expect("v1 should be used");
        assert_eq!(source.version(), 1);
    }

    #[test]
    fn missing_source_is_not_fatal() {
        let dir = TempDir::new().expect("temp dir");
        let store = CacheStore::new(dir.path());
        assert!(store.find_migration_source(CURRENT_TABLE_VERSION).is_none());

        let table = store.open_current(false, true);
        assert!(table.is_empty());
        assert_eq!(table.version(), CURRENT_TABLE_VERSION);
    }

    #[test]
    fn open_current_seeds_and_falls_back() {
        let dir = TempDir::new().expect("temp dir");
        let store = CacheStore::new(dir.path());

        let mut v2 = EvaluationTable::with_version(2);
        v2.set_moves(20, Difficulty::Hard, data(2));
        store.save(&v2).expect("save v2");
        fs::write(store.table_path(CURRENT_TABLE_VERSION), b"not a table").expect("write junk");

        let mut table = store.open_current(false, true);
        assert_eq!(table.len(), 1);
        assert!(matches!(table.get_moves(20, Difficulty::Hard), CacheLookup::Outdated(_)));

        let path = store.save(&table).expect("save current");
        assert_eq!(path, store.table_path(CURRENT_TABLE_VERSION));
        let reloaded = store.open_current(false, false);
        assert!(reloaded.has(20));
    }
}
