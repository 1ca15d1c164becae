//! Session Events
//!
//! User-visible happenings produced by the role handlers, drained by the
//! embedding UI for its activity feed and status line.

use std::fmt;

/// Something the room's activity feed should report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A participant introduced itself.
    PeerJoined {
        /// Name from the hello message.
        name: String,
    },
    /// A word was confirmed found.
    WordFound {
        /// Normalized form of the word.
        word: String,
        /// Who found it.
        by: String,
    },
    /// The puzzle was regenerated and replaced.
    PuzzleReplaced {
        /// Who triggered it.
        by: String,
    },
    /// A full snapshot from the host was applied.
    StateSynced,
    /// A peer's connection closed.
    PeerLeft,
    /// This peer lost its connection to the host.
    Disconnected,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::PeerJoined { name } => write!(f, "{name} joined the room"),
            SessionEvent::WordFound { word, by } => write!(f, "{by} found: {word}"),
            SessionEvent::PuzzleReplaced { by } => write!(f, "{by} generated a new puzzle"),
            SessionEvent::StateSynced => write!(f, "synchronized with host"),
            SessionEvent::PeerLeft => write!(f, "a peer left the room"),
            SessionEvent::Disconnected => write!(f, "disconnected from host"),
        }
    }
}
