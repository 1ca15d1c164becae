//! Puzzle Logic Module
//!
//! Deterministic puzzle generation and local solving.
//!
//! ## Module Structure
//!
//! - `words`: word pool entries, normalization, selection
//! - `grid`: grid type and the word-placement builder
//! - `selection`: drag-gesture tracking and straight-line matching
//! - `state`: the owned puzzle state and its wire snapshot

pub mod grid;
pub mod selection;
pub mod state;
pub mod words;

// Re-export key types
pub use grid::{build_puzzle, Grid, PlacedWord, PuzzleConfig};
pub use selection::{is_straight_line, resolve, GesturePhase, SelectionTracker};
pub use state::{PuzzleState, RoomState};
pub use words::{default_pool, pick_words, PoolWord};
