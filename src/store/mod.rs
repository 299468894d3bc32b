//! Inventory record store.
//!
//! Owns the on-disk JSON document holding every inventory record. The whole
//! document is the unit of persistence: callers `load()` the full sequence,
//! mutate it in memory with the pure helpers below, then `save()` it back.
//! Serializing that cycle is the caller's job (the HTTP layer holds the
//! store behind a mutex).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const STORE_FILE: &str = "inventory.json";

/// One inventory entry.
///
/// `photo_path` and `photo_url` are set at creation time, when a photo was
/// uploaded, and never change afterwards; updates touch only `name` and
/// `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_path: Option<PathBuf>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Fields accepted by the update operation. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Handle to the persisted inventory document.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn open(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(STORE_FILE),
        }
    }

    /// Read the full record sequence from disk.
    ///
    /// A missing, unreadable, or malformed document yields an empty sequence.
    /// This is a recovered outcome, logged at warn, never an error.
    pub fn load(&self) -> Vec<Record> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Could not read inventory document {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Malformed inventory document {:?}, starting empty: {}",
                    self.path, e
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted document with the given records,
    /// pretty-printed with 2-space indentation.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        std::fs::write(&self.path, json)?;

        Ok(())
    }
}

/// Next ID to assign: `max(id) + 1`, or 1 for an empty store.
pub fn next_id(records: &[Record]) -> u64 {
    records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
}

pub fn find_by_id(records: &[Record], id: u64) -> Option<&Record> {
    records.iter().find(|r| r.id == id)
}

pub fn insert(records: &mut Vec<Record>, record: Record) {
    records.push(record);
}

/// Apply a patch to the record with the given ID.
///
/// Returns `NotFound` and leaves the sequence untouched when the ID is
/// absent. Photo fields and the ID itself are immutable post-creation.
pub fn update<'a>(records: &'a mut [Record], id: u64, patch: RecordPatch) -> Result<&'a Record> {
    let record = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(Error::NotFound)?;

    if let Some(name) = patch.name {
        record.name = name;
    }
    if let Some(description) = patch.description {
        record.description = Some(description);
    }

    Ok(record)
}

/// Remove the record with the given ID, returning it so the caller can
/// release its photo file.
pub fn remove(records: &mut Vec<Record>, id: u64) -> Result<Record> {
    let index = records
        .iter()
        .position(|r| r.id == id)
        .ok_or(Error::NotFound)?;
    Ok(records.remove(index))
}
