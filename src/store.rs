//! Progress Persistence
//!
//! Found words survive page reloads through a local key-value store,
//! keyed per (seed, size) combination. The store is a collaborator:
//! anything with get/set string semantics works, and failures on either
//! side simply mean progress is not persisted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::puzzle::state::PuzzleState;

/// Minimal local key-value collaborator.
///
/// Implementations swallow their own failures (quota, unavailability):
/// `get` answers `None`, `set` does nothing. No error channel exists on
/// purpose.
pub trait KeyValueStore {
    /// Read a value, `None` when missing or unreadable.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value; best effort.
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and the demo.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Stored payload: the found words plus a write timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Normalized forms found so far.
    pub found: Vec<String>,
    /// UTC milliseconds of the save.
    pub ts: i64,
}

/// Composite key for one (seed, size) puzzle.
pub fn progress_key(seed: &str, size: u32) -> String {
    format!("pupiletras:{seed}:{size}")
}

/// Persist the current found set. Serialization problems are swallowed.
pub fn save_progress(store: &mut dyn KeyValueStore, seed: &str, state: &PuzzleState) {
    let payload = SavedProgress {
        found: state.found().iter().cloned().collect(),
        ts: Utc::now().timestamp_millis(),
    };
    match serde_json::to_string(&payload) {
        Ok(json) => store.set(&progress_key(seed, state.size()), &json),
        Err(err) => debug!(%err, "progress not saved"),
    }
}

/// Load the saved found-word list for a (seed, size) combination.
/// Missing or corrupt entries read as empty.
pub fn load_progress(store: &dyn KeyValueStore, seed: &str, size: u32) -> Vec<String> {
    store
        .get(&progress_key(seed, size))
        .and_then(|json| serde_json::from_str::<SavedProgress>(&json).ok())
        .map(|saved| saved.found)
        .unwrap_or_default()
}

/// Re-apply saved progress to a freshly generated puzzle.
///
/// Only entries naming a word of the current puzzle are applied
/// (`apply_found` enforces that); stale entries from an older word list
/// are skipped. Returns how many words were restored.
pub fn restore_progress(state: &mut PuzzleState, store: &dyn KeyValueStore, seed: &str) -> usize {
    load_progress(store, seed, state.size())
        .iter()
        .filter(|word| state.apply_found(word))
        .count()
}

// =============================================================================
// TESTS
// =============================================================================
