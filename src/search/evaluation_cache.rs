//! Persistent evaluation cache keyed by position hash.
//!
//! Each entry holds per-difficulty best-move data. Entries copied from an
//! older table version are flagged outdated: they stay readable as seeds but
//! never count as hits. Hit/miss counters live with the table and are not
//! persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game_state::coral_types::Move;
use crate::search::difficulty::Difficulty;

/// Format version written with every table.
pub const CURRENT_TABLE_VERSION: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Search result stored for one difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
    /// Ranked root candidates, best first. Empty for interior nodes.
    #[serde(default)]
    pub candidates: Vec<ScoredMove>,
    #[serde(default)]
    pub outdated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationEntry {
    pub hash: u64,
    pub moves: BTreeMap<Difficulty, MoveData>,
}

impl EvaluationEntry {
    pub fn is_outdated(&self) -> bool {
        self.moves.values().any(|data| data.outdated)
    }
}

/// Result of `get_moves`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<'a> {
    Hit(&'a MoveData),
    Outdated(&'a MoveData),
    Miss,
}

impl<'a> CacheLookup<'a> {
    pub fn fresh(&self) -> Option<&'a MoveData> {
        match self {
            CacheLookup::Hit(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_lookups: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CacheCounters {
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTable {
    version: u32,
    entries: BTreeMap<u64, EvaluationEntry>,
    counters: CacheCounters,
}

impl Default for EvaluationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationTable {
    pub fn new() -> Self {
        Self::with_version(CURRENT_TABLE_VERSION)
    }

    pub fn with_version(version: u32) -> Self {
        Self {
            version,
            entries: BTreeMap::new(),
            counters: CacheCounters::default(),
        }
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn has(&self, hash: u64) -> bool {
        self.entries.contains_key(&hash)
    }

    pub fn entry(&self, hash: u64) -> Option<&EvaluationEntry> {
        self.entries.get(&hash)
    }

    pub fn entries(&self) -> impl Iterator<Item = &EvaluationEntry> {
        self.entries.values()
    }

    /// Look up one tier and count the lookup. Only a present, fresh tier is a
    /// hit.
    pub fn get_moves(&mut self, hash: u64, difficulty: Difficulty) -> CacheLookup<'_> {
        let data = self
            .entries
            .get(&hash)
            .and_then(|entry| entry.moves.get(&difficulty));

        match data {
            Some(data) if !data.outdated => {
                self.counters.hits += 1;
                CacheLookup::Hit(data)
            }
            Some(data) => {
                self.counters.misses += 1;
                CacheLookup::Outdated(data)
            }
            None => {
                self.counters.misses += 1;
                CacheLookup::Miss
            }
        }
    }

    /// Read a tier without touching the counters, fresh or outdated. Used for
    /// move-ordering seeds.
    pub fn peek_seed(&self, hash: u64, difficulty: Difficulty) -> Option<&MoveData> {
        self.entries
            .get(&hash)
            .and_then(|entry| entry.moves.get(&difficulty))
    }

    /// Store data for one tier, leaving the other tiers of the entry alone.
    pub fn set_moves(&mut self, hash: u64, difficulty: Difficulty, data: MoveData) {
        self.entries
            .entry(hash)
            .or_insert_with(|| EvaluationEntry {
                hash,
                moves: BTreeMap::new(),
            })
            .moves
            .insert(difficulty, data);
    }

    /// Flag every tier of `hash` as outdated. Returns false for unknown hashes.
    pub fn mark_outdated(&mut self, hash: u64) -> bool {
        match self.entries.get_mut(&hash) {
            Some(entry) => {
                for data in entry.moves.values_mut() {
                    data.outdated = true;
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn insert_entry(&mut self, entry: EvaluationEntry) {
        self.entries.insert(entry.hash, entry);
    }

    pub fn stats(&self) -> CacheStats {
        let total_lookups = self.counters.hits + self.counters.misses;
        let hit_rate = if total_lookups == 0 {
            0.0
        } else {
            self.counters.hits as f64 / total_lookups as f64
        };
        CacheStats {
            hits: self.counters.hits,
            misses: self.counters.misses,
            total_lookups,
            hit_rate,
        }
    }

    pub fn reset_stats(&mut self) {
        self.counters = CacheCounters::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, CacheLookup, EvaluationTable, MoveData, CURRENT_TABLE_VERSION};
    use crate::game_state::coral_types::Move;
    use crate::search::difficulty::Difficulty;

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
    fn empty_table_has_zero_hit_rate() {
        let table = EvaluationTable::new();
        let stats = table.stats();
        assert_eq!(stats.total_lookups, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(table.version(), CURRENT_TABLE_VERSION);
    }

    #[test]
    fn one_miss_then_one_hit_is_half() {
        let mut table = EvaluationTable::new();
        assert_eq!(table.get_moves(42, Difficulty::Hard), CacheLookup::Miss);
        table.set_moves(42, Difficulty::Hard, data(10));
        assert!(table.get_moves(42, Difficulty::Hard).fresh().is_some());

        let stats = table.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.5);

        table.reset_stats();
        assert_eq!(table.stats().total_lookups, 0);
        assert!(table.has(42));
    }

    #[test]
    fn set_moves_replaces_only_its_tier() {
        let mut table = EvaluationTable::new();
        table.set_moves(7, Difficulty::Easy, data(1));
        table.set_moves(7, Difficulty::Hard, data(2));
        table.set_moves(7, Difficulty::Hard, data(3));

        assert_eq!(table.peek_seed(7, Difficulty::Easy).map(|d| d.score), Some(1));
        assert_eq!(table.peek_seed(7, Difficulty::Hard).map(|d| d.score), Some(3));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn other_tier_is_a_miss() {
        let mut table = EvaluationTable::new();
        table.set_moves(7, Difficulty::Easy, data(1));
        assert_eq!(table.get_moves(7, Difficulty::Medium), CacheLookup::Miss);
        assert_eq!(table.stats().misses, 1);
    }

    #[test]
    fn outdated_entries_are_readable_but_miss() {
        let mut table = EvaluationTable::new();
        table.set_moves(9, Difficulty::Medium, data(5));
        assert!(table.mark_outdated(9));
        assert!(!table.mark_outdated(10));

        match table.get_moves(9, Difficulty::Medium) {
            CacheLookup::Outdated(seed) => assert_eq!(seed.score, 5),
            other => panic!("expected outdated lookup, got {other:?}"),
        }
        assert_eq!(table.stats().hits, 0);
        assert_eq!(table.stats().misses, 1);
        assert!(table.entry(9).expect("entry").is_outdated());
    }
}
