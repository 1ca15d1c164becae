//! Grid Generation
//!
//! Places words into an N x N letter grid using 8-directional placement
//! with bounded random retries, then fills the leftover cells with random
//! letters. Given the same RNG stream and inputs the result is identical,
//! which underlies seed-shareable puzzles.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cell::{Cell, Direction, DIRECTIONS};
use crate::core::letters::{is_grid_letter, GRID_ALPHABET};
use crate::core::rng::SeededRng;
use crate::puzzle::words::{pick_words, PoolWord};

/// Smallest accepted grid size.
pub const SIZE_MIN: u32 = 6;
/// Largest accepted grid size.
pub const SIZE_MAX: u32 = 30;
/// Smallest accepted word count.
pub const WORD_COUNT_MIN: u32 = 4;
/// Largest accepted word count.
pub const WORD_COUNT_MAX: u32 = 40;

/// Per-word placement attempts per grid cell (attempt budget is
/// `size * size * PLACEMENT_TRIES_PER_CELL`).
const PLACEMENT_TRIES_PER_CELL: u32 = 6;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Puzzle generation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Grid side length.
    pub size: u32,
    /// Number of words to attempt to place.
    pub word_count: u32,
    /// Seed string for reproducible puzzles; `None` draws from entropy.
    pub seed: Option<String>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        let size = 14;
        Self {
            size,
            word_count: default_word_count(size),
            seed: None,
        }
    }
}

impl PuzzleConfig {
    /// Copy of this config with size and word count forced into bounds.
    ///
    /// Out-of-range values are clamped silently, never rejected.
    pub fn clamped(&self) -> Self {
        Self {
            size: self.size.clamp(SIZE_MIN, SIZE_MAX),
            word_count: self.word_count.clamp(WORD_COUNT_MIN, WORD_COUNT_MAX),
            seed: self.seed.clone(),
        }
    }

    /// The RNG stream this config generates with.
    pub fn rng(&self) -> SeededRng {
        match &self.seed {
            Some(seed) => SeededRng::from_seed(seed),
            None => SeededRng::from_entropy(),
        }
    }
}

/// Word count used when only a size is known: scales with the grid,
/// held between 10 and 16.
pub fn default_word_count(size: u32) -> u32 {
    (size * 9 / 10).clamp(10, 16)
}

// =============================================================================
// GRID
// =============================================================================

/// A fully generated N x N letter grid.
///
/// Every cell holds exactly one alphabet letter; partially filled grids
/// exist only inside the builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<char>,
}

impl Grid {
    /// Grid side length.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Letter at `cell`, or `None` out of bounds.
    pub fn letter(&self, cell: Cell) -> Option<char> {
        if cell.in_bounds(self.size) {
            self.cells.get(self.index(cell)).copied()
        } else {
            None
        }
    }

    /// The grid as rows of strings, the wire representation.
    pub fn rows(&self) -> Vec<String> {
        let n = self.size as usize;
        (0..n)
            .map(|r| self.cells[r * n..(r + 1) * n].iter().collect())
            .collect()
    }

    /// Rebuild a grid from wire rows. Returns `None` unless the rows form
    /// a square of grid letters.
    pub fn from_rows(rows: &[String]) -> Option<Grid> {
        let size = rows.len();
        if size == 0 {
            return None;
        }
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            let letters: Vec<char> = row.chars().collect();
            if letters.len() != size || !letters.iter().all(|&c| is_grid_letter(c)) {
                return None;
            }
            cells.extend(letters);
        }
        Some(Grid {
            size: size as u32,
            cells,
        })
    }

    /// The string spelled by walking `path`, or `None` if any cell is
    /// out of bounds.
    pub fn read_path(&self, path: &[Cell]) -> Option<String> {
        path.iter().map(|&c| self.letter(c)).collect()
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.row as usize * self.size as usize + cell.col as usize
    }
}

/// A word together with the exact cells it occupies.
///
/// Consecutive path cells differ by one constant unit direction, and the
/// final grid agrees with `word` on every cell of `path`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    /// Normalized form as it reads along `path`.
    pub word: String,
    /// Ordered cells, one per letter.
    pub path: Vec<Cell>,
}

// =============================================================================
// BUILDER
// =============================================================================

/// Grid under construction: cells are empty until a word or the random
/// fill claims them.
struct DraftGrid {
    size: u32,
    cells: Vec<Option<char>>,
}

impl DraftGrid {
    fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![None; (size * size) as usize],
        }
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.row as usize * self.size as usize + cell.col as usize
    }

    /// A placement is valid if every cell is in bounds and either empty
    /// or already holding the letter the word needs there.
    fn can_place(&self, word: &[char], start: Cell, dir: Direction) -> bool {
        for (i, &letter) in word.iter().enumerate() {
            let cell = start.step(dir, i as i32);
            if !cell.in_bounds(self.size) {
                return false;
            }
            match self.cells[self.index(cell)] {
                None => {}
                Some(existing) if existing == letter => {}
                Some(_) => return false,
            }
        }
        true
    }

    fn place(&mut self, word: &[char], start: Cell, dir: Direction) -> Vec<Cell> {
        let mut path = Vec::with_capacity(word.len());
        for (i, &letter) in word.iter().enumerate() {
            let cell = start.step(dir, i as i32);
            let idx = self.index(cell);
            self.cells[idx] = Some(letter);
            path.push(cell);
        }
        path
    }

    /// Fill every still-empty cell with a uniform alphabet letter,
    /// yielding the final grid.
    fn fill(self, rng: &mut SeededRng) -> Grid {
        let cells = self
            .cells
            .into_iter()
            .map(|c| match c {
                Some(letter) => letter,
                None => GRID_ALPHABET[rng.next_int(GRID_ALPHABET.len() as u32) as usize],
            })
            .collect();
        Grid {
            size: self.size,
            cells,
        }
    }
}

/// Attempt to place one word, bounded random retries.
fn place_word(draft: &mut DraftGrid, word: &str, rng: &mut SeededRng) -> Option<Vec<Cell>> {
    let letters: Vec<char> = word.chars().collect();
    let attempts = draft.size * draft.size * PLACEMENT_TRIES_PER_CELL;

    for _ in 0..attempts {
        let dir = DIRECTIONS[rng.next_int(DIRECTIONS.len() as u32) as usize];
        let start = Cell::new(
            rng.next_int(draft.size) as i32,
            rng.next_int(draft.size) as i32,
        );
        if draft.can_place(&letters, start, dir) {
            return Some(draft.place(&letters, start, dir));
        }
    }
    None
}

/// Build a puzzle: select words, place them longest-first, fill the rest.
///
/// A word that finds no valid placement within its retry budget is
/// dropped silently; puzzles may legitimately hold fewer words than
/// requested. The returned grid has no empty cells.
pub fn build_puzzle(
    config: &PuzzleConfig,
    pool: &[PoolWord],
    rng: &mut SeededRng,
) -> (Grid, Vec<PlacedWord>) {
    let config = config.clamped();

    let mut selection = pick_words(pool, config.word_count as usize, config.size, rng);
    // Long words are the hardest to fit; placing them first raises the
    // overall success rate. Stable sort keeps the draw order among ties.
    selection.sort_by(|a, b| b.normalized.len().cmp(&a.normalized.len()));

    let mut draft = DraftGrid::new(config.size);
    let mut placed = Vec::new();
    for entry in &selection {
        match place_word(&mut draft, &entry.normalized, rng) {
            Some(path) => placed.push(PlacedWord {
                word: entry.normalized.clone(),
                path,
            }),
            None => debug!(word = %entry.normalized, "no valid placement, dropping word"),
        }
    }

    (draft.fill(rng), placed)
}

// =============================================================================
// TESTS
// =============================================================================
