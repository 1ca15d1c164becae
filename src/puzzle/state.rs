//! Puzzle State
//!
//! The authoritative in-memory representation of one puzzle: grid,
//! placed words and the found set. All mutation goes through the defined
//! operations so replication stays a matter of replaying them.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::core::cell::Cell;
use crate::core::rng::SeededRng;
use crate::puzzle::grid::{build_puzzle, Grid, PlacedWord, PuzzleConfig};
use crate::puzzle::selection;
use crate::puzzle::words::PoolWord;

// =============================================================================
// WIRE SNAPSHOT
// =============================================================================

/// Serializable snapshot of a puzzle, exchanged between peers.
///
/// Created wholesale by the authoritative peer, transmitted to joining
/// peers, and incrementally patched via found-word messages afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    /// Grid side length.
    pub size: u32,
    /// Word count the grid was generated with.
    pub word_count: u32,
    /// Grid contents as rows of strings.
    pub grid: Vec<String>,
    /// Placed words with their cell paths.
    pub placed_words: Vec<PlacedWord>,
    /// Normalized forms already found.
    pub found: Vec<String>,
    /// UTC milliseconds when the snapshot was taken.
    pub updated_at: i64,
}

// =============================================================================
// PUZZLE STATE
// =============================================================================

/// Grid, placed words and found set of one puzzle.
#[derive(Clone, Debug)]
pub struct PuzzleState {
    size: u32,
    word_count: u32,
    grid: Grid,
    placed: Vec<PlacedWord>,
    found: BTreeSet<String>,
}

impl PuzzleState {
    /// Generate a fresh puzzle from `config` (clamped) and `pool`.
    pub fn generate(config: &PuzzleConfig, pool: &[PoolWord]) -> Self {
        let config = config.clamped();
        let mut rng = config.rng();
        Self::generate_with(&config, pool, &mut rng)
    }

    /// Generate using an externally owned RNG stream.
    pub fn generate_with(config: &PuzzleConfig, pool: &[PoolWord], rng: &mut SeededRng) -> Self {
        let config = config.clamped();
        let (grid, placed) = build_puzzle(&config, pool, rng);
        Self {
            size: grid.size(),
            word_count: config.word_count,
            grid,
            placed,
            found: BTreeSet::new(),
        }
    }

    /// Grid side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Word count the current puzzle was generated with.
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// The letter grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Placed words in placement order.
    pub fn placed(&self) -> &[PlacedWord] {
        &self.placed
    }

    /// Normalized forms found so far. Grows monotonically between
    /// wholesale replacements.
    pub fn found(&self) -> &BTreeSet<String> {
        &self.found
    }

    /// Number of found words.
    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    /// Whether every placed word has been found.
    pub fn is_complete(&self) -> bool {
        self.found.len() == self.placed.len()
    }

    /// Record `word` as found.
    ///
    /// Idempotent: returns `true` only the first time a word that is
    /// actually placed gets reported; repeats and unknown words are
    /// no-ops.
    pub fn apply_found(&mut self, word: &str) -> bool {
        if !self.placed.iter().any(|w| w.word == word) {
            return false;
        }
        self.found.insert(word.to_string())
    }

    /// Wholesale swap to a new grid and word set; clears the found set.
    pub fn replace(&mut self, grid: Grid, placed: Vec<PlacedWord>) {
        self.size = grid.size();
        self.grid = grid;
        self.placed = placed;
        self.found.clear();
    }

    /// Match a selection path against this puzzle. Pure query.
    pub fn resolve_selection(&self, path: &[Cell]) -> Option<&PlacedWord> {
        selection::resolve(path, &self.grid, &self.placed, &self.found)
    }

    /// Serialize the current puzzle for transmission.
    pub fn snapshot(&self) -> RoomState {
        RoomState {
            size: self.size,
            word_count: self.word_count,
            grid: self.grid.rows(),
            placed_words: self.placed.clone(),
            found: self.found.iter().cloned().collect(),
            updated_at: Utc::now().timestamp_millis(),
        }
    }

    /// Wholesale replace from a received snapshot.
    ///
    /// Returns `false` (leaving the state untouched) when the snapshot
    /// is not internally consistent: ragged grid rows, size mismatch, or
    /// a placed path leaving the grid.
    pub fn restore(&mut self, state: &RoomState) -> bool {
        let grid = match Grid::from_rows(&state.grid) {
            Some(grid) if grid.size() == state.size => grid,
            _ => return false,
        };
        let paths_in_bounds = state
            .placed_words
            .iter()
            .all(|w| w.path.iter().all(|c| c.in_bounds(grid.size())));
        if !paths_in_bounds {
            return false;
        }

        self.size = state.size;
        self.word_count = state.word_count;
        self.grid = grid;
        self.placed = state.placed_words.clone();
        // Only keep found entries that name a placed word
        self.found = state
            .found
            .iter()
            .filter(|word| state.placed_words.iter().any(|w| &w.word == *word))
            .cloned()
            .collect();
        true
    }

    /// Content hash over grid, placed words and found set.
    ///
    /// Timestamps are excluded, so two states with identical contents
    /// hash identically; used to verify determinism and replica sync.
    pub fn state_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"PUPILETRAS_STATE_V1");
        hasher.update(self.size.to_le_bytes());
        for row in self.grid.rows() {
            hasher.update(row.as_bytes());
        }
        for w in &self.placed {
            hasher.update(w.word.as_bytes());
            for cell in &w.path {
                hasher.update(cell.row.to_le_bytes());
                hasher.update(cell.col.to_le_bytes());
            }
        }
        for word in &self.found {
            hasher.update(word.as_bytes());
        }
        hasher.finalize().into()
    }
}

// =============================================================================
// TESTS
// =============================================================================
