//! # Pupiletras
//!
//! Collaborative word-search puzzle engine: deterministic grid
//! generation, drag-selection recognition and host-authoritative room
//! synchronization between peers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PUPILETRAS                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - String-seeded Xorshift128+ PRNG           │
//! │  ├── cell.rs     - Grid coordinates, 8 unit directions       │
//! │  └── letters.rs  - Alphabet and word normalization           │
//! │                                                              │
//! │  puzzle/         - Puzzle logic (deterministic)              │
//! │  ├── words.rs    - Word pool, filtering, selection           │
//! │  ├── grid.rs     - Placement builder and final grid          │
//! │  ├── selection.rs- Gesture tracking, straight-line matching  │
//! │  └── state.rs    - Owned puzzle state and wire snapshot      │
//! │                                                              │
//! │  session/        - Room synchronization (event-driven)       │
//! │  ├── protocol.rs - Peer message types                        │
//! │  ├── transport.rs- Message-bus seam                          │
//! │  ├── memory.rs   - In-process bus for tests/demo             │
//! │  ├── authority.rs- Host role: validate and broadcast         │
//! │  └── participant.rs - Guest role: replicate and propose      │
//! │                                                              │
//! │  store.rs        - Per-(seed,size) progress persistence      │
//! │  share.rs        - Seed/size share links                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `puzzle/` modules are **100% deterministic**: no
//! system time in generation, `BTreeMap`/`BTreeSet` instead of hashed
//! collections, all randomness from the seeded Xorshift128+ stream.
//! Given the same seed string and configuration, puzzle generation
//! produces **identical results** on any platform - which is what makes
//! a share link reproduce the same grid for everyone who opens it.
//!
//! The `session/` layer is single-threaded and event-driven: handlers
//! run to completion, sends are fire-and-forget, and cross-peer
//! consistency comes entirely from the host-authoritative broadcast
//! protocol.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod puzzle;
pub mod session;
pub mod share;
pub mod store;

// Re-export commonly used types
pub use crate::core::cell::{Cell, Direction, DIRECTIONS};
pub use crate::core::letters::normalize_word;
pub use crate::core::rng::SeededRng;
pub use puzzle::grid::{Grid, PlacedWord, PuzzleConfig, SIZE_MAX, SIZE_MIN, WORD_COUNT_MAX, WORD_COUNT_MIN};
pub use puzzle::selection::{is_straight_line, resolve, SelectionTracker};
pub use puzzle::state::{PuzzleState, RoomState};
pub use puzzle::words::{default_pool, PoolWord};
pub use session::{
    derive_room_id, join_room, Authority, MemoryHub, Participant, PeerMessage, Role, RoomOptions,
    Session, SessionEvent,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
