//! On-disk format of the evaluation table.
//!
//! A 32-byte little-endian header followed by a JSON body:
//!
//! | bytes  | field                          |
//! |--------|--------------------------------|
//! | 0..4   | magic `CRLC`                   |
//! | 4..8   | table version                  |
//! | 8..12  | flags (reserved, zero)         |
//! | 12..16 | CRC32 of the body              |
//! | 16..24 | entry count                    |
//! | 24..32 | saved-at unix timestamp        |
//!
//! Saves go to a temporary sibling first and are renamed into place, so a
//! failed save leaves the previous file untouched.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use chrono::Utc;
use crc32fast::Hasher as Crc32Hasher;
use serde::{Deserialize, Serialize};

use crate::errors::CacheError;
use crate::search::difficulty::Difficulty;
use crate::search::evaluation_cache::{
    EvaluationEntry, EvaluationTable, MoveData, CURRENT_TABLE_VERSION,
};

pub const TABLE_MAGIC: &[u8; 4] = b"CRLC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    pub version: u32,
    pub flags: u32,
    pub checksum: u32,
    pub entry_count: u64,
    pub saved_at: i64,
}

impl TableHeader {
    pub const SIZE: usize = 32;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(TABLE_MAGIC);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.flags.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.entry_count.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.saved_at.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError> {
        if bytes.len() < Self::SIZE {
            return Err(CacheError::Corrupt(format!(
                "header too small: expected {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        if &bytes[0..4] != TABLE_MAGIC {
            return Err(CacheError::Corrupt(format!(
                "invalid magic: expected {:?}, got {:?}",
                TABLE_MAGIC,
                &bytes[0..4]
            )));
        }

        Ok(Self {
            version: u32::from_le_bytes(le_array(&bytes[4..8])),
            flags: u32::from_le_bytes(le_array(&bytes[8..12])),
            checksum: u32::from_le_bytes(le_array(&bytes[12..16])),
            entry_count: u64::from_le_bytes(le_array(&bytes[16..24])),
            saved_at: i64::from_le_bytes(le_array(&bytes[24..32])),
        })
    }
}

fn le_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

// JSON object keys must be strings, so tiers are stored as a list.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTier {
    difficulty: Difficulty,
    data: MoveData,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    hash: u64,
    tiers: Vec<StoredTier>,
}

impl EvaluationTable {
    /// Load a table. A version other than [`CURRENT_TABLE_VERSION`] is an
    /// error unless `tolerate_version_mismatch` is set, in which case the
    /// table keeps the version it was written with.
    pub fn load(path: &Path, tolerate_version_mismatch: bool) -> Result<Self, CacheError> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;

        let header = TableHeader::from_bytes(&bytes)?;
        if header.version != CURRENT_TABLE_VERSION && !tolerate_version_mismatch {
            return Err(CacheError::VersionMismatch {
                found: header.version,
                expected: CURRENT_TABLE_VERSION,
            });
        }

        let body = &bytes[TableHeader::SIZE..];
        let mut hasher = Crc32Hasher::new();
        hasher.update(body);
        let computed = hasher.finalize();
        if computed != header.checksum {
            return Err(CacheError::Corrupt(format!(
                "checksum mismatch: expected {:#010x}, computed {:#010x}",
                header.checksum, computed
            )));
        }

        let stored: Vec<StoredEntry> = serde_json::from_slice(body)?;
        if stored.len() as u64 != header.entry_count {
            return Err(CacheError::Corrupt(format!(
                "entry count mismatch: header says {}, body holds {}",
                header.entry_count,
                stored.len()
            )));
        }

        let mut table = EvaluationTable::with_version(header.version);
        for entry in stored {
            let moves: BTreeMap<Difficulty, MoveData> = entry
                .tiers
                .into_iter()
                .map(|tier| (tier.difficulty, tier.data))
                .collect();
            table.insert_entry(EvaluationEntry {
                hash: entry.hash,
                moves,
            });
        }

        log::info!(
            "Evaluation table loaded: {} (version {}, {} entries)",
            path.display(),
            header.version,
            table.len()
        );

        Ok(table)
    }

    /// Write the table atomically. Hit/miss counters are not persisted.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let stored: Vec<StoredEntry> = self
            .entries()
            .map(|entry| StoredEntry {
                hash: entry.hash,
                tiers: entry
                    .moves
                    .iter()
                    .map(|(difficulty, data)| StoredTier {
                        difficulty: *difficulty,
                        data: data.clone(),
                    })
                    .collect(),
            })
            .collect();
        let body = serde_json::to_vec(&stored)?;

        let mut hasher = Crc32Hasher::new();
        hasher.update(&body);

        let header = TableHeader {
            version: self.version(),
            flags: 0,
            checksum: hasher.finalize(),
            entry_count: stored.len() as u64,
            saved_at: Utc::now().timestamp(),
        };

        let temp_path = path.with_extension("tmp");
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&header.to_bytes())?;
        writer.write_all(&body)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, path)?;

        log::info!(
            "Evaluation table saved: {} (version {}, {} entries, {} bytes)",
            path.display(),
            header.version,
            header.entry_count,
            TableHeader::SIZE + body.len()
        );

        Ok(())
    }
}
