//! Selection Recognition
//!
//! Turns a stream of visited cells into a candidate word. A gesture
//! tracker accumulates the path between start and end events; resolution
//! checks straight-line continuity, reads the letters and matches them
//! (forward or reversed) against the placed words.
//!
//! Everything here is a pure query over puzzle state; committing a match
//! is the caller's decision.

use std::collections::BTreeSet;

use crate::core::cell::{Cell, Direction};
use crate::puzzle::grid::{Grid, PlacedWord};

// =============================================================================
// GESTURE TRACKER
// =============================================================================

/// Phase of the selection gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// Cells are being accumulated between start and end events.
    Selecting,
}

/// Accumulates the cells visited during one drag gesture.
///
/// Pointer and touch input map onto the same three calls: `begin`,
/// `extend`, `finish` (or `cancel`). The tracker is device-agnostic.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
    phase: GesturePhase,
    path: Vec<Cell>,
}

impl SelectionTracker {
    /// New tracker, idle with an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Cells visited so far, for selection preview.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Start a gesture at `cell`, discarding any previous path.
    pub fn begin(&mut self, cell: Cell) {
        self.phase = GesturePhase::Selecting;
        self.path.clear();
        self.path.push(cell);
    }

    /// Append `cell` to the active path.
    ///
    /// Re-entering the most recent cell is ignored, so jittery input
    /// does not produce consecutive duplicates. Ignored while idle.
    pub fn extend(&mut self, cell: Cell) {
        if self.phase != GesturePhase::Selecting {
            return;
        }
        if self.path.last() == Some(&cell) {
            return;
        }
        self.path.push(cell);
    }

    /// End the gesture and hand back the accumulated path.
    pub fn finish(&mut self) -> Vec<Cell> {
        self.phase = GesturePhase::Idle;
        std::mem::take(&mut self.path)
    }

    /// Abandon the gesture without producing a path.
    pub fn cancel(&mut self) {
        self.phase = GesturePhase::Idle;
        self.path.clear();
    }
}

// =============================================================================
// RECOGNITION
// =============================================================================

/// Whether `path` is a straight line of unit steps.
///
/// True iff the path has at least two cells, the step between the first
/// two is one of the 8 unit directions, and every later pair repeats
/// exactly that step. Bends, gaps and mid-path reversals all fail.
pub fn is_straight_line(path: &[Cell]) -> bool {
    if path.len() < 2 {
        return false;
    }
    let step = match Direction::between(path[0], path[1]) {
        Some(dir) => dir,
        None => return false,
    };
    path.windows(2)
        .all(|pair| Direction::between(pair[0], pair[1]) == Some(step))
}

/// Match a selection path against the placed words.
///
/// Reads the letters along `path` into a string, and returns the first
/// placed word (in placement order) equal to it or to its reverse,
/// unless that word was already found. When two placed words overlap
/// degenerately - one the palindromic reverse of the other - the first
/// in placement order wins; the ambiguity is accepted, not resolved.
pub fn resolve<'a>(
    path: &[Cell],
    grid: &Grid,
    placed: &'a [PlacedWord],
    found: &BTreeSet<String>,
) -> Option<&'a PlacedWord> {
    if !is_straight_line(path) {
        return None;
    }
    let forward = grid.read_path(path)?;
    let backward: String = forward.chars().rev().collect();

    placed
        .iter()
        .find(|w| w.word == forward || w.word == backward)
        .filter(|w| !found.contains(&w.word))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::grid::{build_puzzle, PuzzleConfig};
    use crate::puzzle::words::PoolWord;
    use proptest::prelude::*;

    fn line(start: Cell, d_row: i32, d_col: i32, len: i32) -> Vec<Cell> {
        (0..len)
            .map(|i| Cell::new(start.row + d_row * i, start.col + d_col * i))
            .collect()
    }

    fn fixture() -> (Grid, Vec<PlacedWord>) {
        let config = PuzzleConfig {
            size: 10,
            word_count: 4,
            seed: Some("selection".to_string()),
        };
        let pool = vec![
            PoolWord::new("DAVID"),
            PoolWord::new("PABLO"),
            PoolWord::new("SARA"),
            PoolWord::new("RUT"),
        ];
        let mut rng = config.rng();
        build_puzzle(&config, &pool, &mut rng)
    }

    #[test]
    fn test_tracker_collects_a_path() {
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.phase(), GesturePhase::Idle);

        tracker.begin(Cell::new(0, 0));
        tracker.extend(Cell::new(0, 1));
        tracker.extend(Cell::new(0, 1)); // duplicate re-entry, ignored
        tracker.extend(Cell::new(0, 2));

        assert_eq!(tracker.phase(), GesturePhase::Selecting);
        let path = tracker.finish();
        assert_eq!(path, line(Cell::new(0, 0), 0, 1, 3));
        assert_eq!(tracker.phase(), GesturePhase::Idle);
        assert!(tracker.path().is_empty());
    }

    #[test]
    fn test_tracker_ignores_extend_while_idle() {
        let mut tracker = SelectionTracker::new();
        tracker.extend(Cell::new(3, 3));
        assert!(tracker.path().is_empty());
    }

    #[test]
    fn test_tracker_cancel_discards() {
        let mut tracker = SelectionTracker::new();
        tracker.begin(Cell::new(1, 1));
        tracker.extend(Cell::new(2, 2));
        tracker.cancel();
        assert!(tracker.finish().is_empty());
    }

    #[test]
    fn test_straight_lines() {
        assert!(is_straight_line(&line(Cell::new(0, 0), 0, 1, 4)));
        assert!(is_straight_line(&line(Cell::new(5, 5), -1, -1, 3)));
        assert!(is_straight_line(&line(Cell::new(9, 0), -1, 1, 2)));
    }

    #[test]
    fn test_too_short_is_not_a_line() {
        assert!(!is_straight_line(&[]));
        assert!(!is_straight_line(&[Cell::new(4, 4)]));
    }

    #[test]
    fn test_bent_path_rejected() {
        let mut path = line(Cell::new(0, 0), 0, 1, 3);
        path.push(Cell::new(1, 2)); // bend downward
        assert!(!is_straight_line(&path));
    }

    #[test]
    fn test_gap_rejected() {
        let path = vec![Cell::new(0, 0), Cell::new(0, 2), Cell::new(0, 4)];
        assert!(!is_straight_line(&path));
    }

    #[test]
    fn test_reversal_rejected() {
        let path = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 0)];
        assert!(!is_straight_line(&path));
    }

    #[test]
    fn test_resolve_forward_and_reverse() {
        let (grid, placed) = fixture();
        let found = BTreeSet::new();

        for w in &placed {
            let hit = resolve(&w.path, &grid, &placed, &found).unwrap();
            assert_eq!(hit.word, w.word);

            let reversed: Vec<Cell> = w.path.iter().rev().copied().collect();
            let hit = resolve(&reversed, &grid, &placed, &found).unwrap();
            assert_eq!(hit.word, w.word);
        }
    }

    #[test]
    fn test_resolve_skips_found_words() {
        let (grid, placed) = fixture();
        let target = &placed[0];

        let mut found = BTreeSet::new();
        found.insert(target.word.clone());

        assert!(resolve(&target.path, &grid, &placed, &found).is_none());
    }

    #[test]
    fn test_resolve_rejects_partial_path() {
        let (grid, placed) = fixture();
        let found = BTreeSet::new();
        let target = placed.iter().find(|w| w.path.len() > 3).unwrap();

        let partial = &target.path[..target.path.len() - 1];
        assert!(resolve(partial, &grid, &placed, &found).is_none());
    }

    proptest! {
        #[test]
        fn prop_bent_paths_never_resolve(
            row in 0i32..8,
            col in 0i32..8,
            len in 2i32..4,
        ) {
            let (grid, placed) = fixture();
            let found = BTreeSet::new();

            // Straight run followed by a perpendicular bend
            let mut path = line(Cell::new(row, col), 0, 1, len);
            let last = path[path.len() - 1];
            path.push(Cell::new(last.row + 1, last.col));

            prop_assert!(!is_straight_line(&path));
            prop_assert!(resolve(&path, &grid, &placed, &found).is_none());
        }
    }
}
