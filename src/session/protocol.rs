//! Protocol Messages
//!
//! Wire format for peer-to-peer room communication. Messages travel as
//! JSON text, self-describing and easy to debug. Payloads that fail to
//! decode are dropped silently by the role handlers; the protocol
//! surfaces no decode errors to peers.

use serde::{Deserialize, Serialize};

use crate::puzzle::state::RoomState;

/// Messages exchanged between Authority and Participants.
///
/// Direction conventions:
/// - `Hello`, `RequestNewPuzzle`: Participant to Authority only.
/// - `InitState`, `NewPuzzle`: Authority to Participant only.
/// - `Found`: both ways - a proposal upstream, a confirmation downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerMessage {
    /// Participant introduces itself right after connecting.
    Hello {
        /// Player name shown in the activity feed.
        name: String,
    },

    /// Full state sync for a (late) joiner.
    InitState {
        /// Snapshot of the authoritative puzzle.
        state: RoomState,
    },

    /// A found word. Upstream it is a proposal the Authority validates;
    /// downstream it is a confirmation applied without further checks.
    Found {
        /// Normalized form of the found word.
        word: String,
        /// Who found it.
        by: String,
    },

    /// Participant asks the Authority to regenerate, optionally with a
    /// new size and word count (clamped by the Authority).
    RequestNewPuzzle {
        /// Who asked.
        by: String,
        /// Desired grid size, if the requester wants it changed.
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u32>,
        /// Desired word count, if the requester wants it changed.
        #[serde(skip_serializing_if = "Option::is_none")]
        word_count: Option<u32>,
    },

    /// Authority announces a regenerated puzzle.
    NewPuzzle {
        /// Who triggered the regeneration.
        by: String,
        /// Snapshot of the new puzzle.
        state: RoomState,
    },
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl PeerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> RoomState {
        RoomState {
            size: 2,
            word_count: 4,
            grid: vec!["AB".to_string(), "CD".to_string()],
            placed_words: vec![],
            found: vec![],
            updated_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_json_round_trip() {
        let messages = vec![
            PeerMessage::Hello {
                name: "Ana".to_string(),
            },
            PeerMessage::InitState {
                state: sample_state(),
            },
            PeerMessage::Found {
                word: "DAVID".to_string(),
                by: "Ana".to_string(),
            },
            PeerMessage::RequestNewPuzzle {
                by: "Ana".to_string(),
                size: Some(20),
                word_count: None,
            },
            PeerMessage::NewPuzzle {
                by: "Ana".to_string(),
                state: sample_state(),
            },
        ];

        for msg in messages {
            let json = msg.to_json().unwrap();
            let parsed = PeerMessage::from_json(&json).unwrap();
            assert_eq!(parsed, msg);
        }
    }

    #[test]
    fn test_tagged_encoding() {
        let msg = PeerMessage::Found {
            word: "DAVID".to_string(),
            by: "Ana".to_string(),
        };
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"found\""));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let msg = PeerMessage::RequestNewPuzzle {
            by: "Ana".to_string(),
            size: None,
            word_count: None,
        };
        let json = msg.to_json().unwrap();
        assert!(!json.contains("size"));
        assert!(!json.contains("word_count"));
    }

    #[test]
    fn test_malformed_payloads_fail_to_decode() {
        assert!(PeerMessage::from_json("").is_err());
        assert!(PeerMessage::from_json("not json").is_err());
        assert!(PeerMessage::from_json("{}").is_err());
        assert!(PeerMessage::from_json("{\"type\":\"launch_missiles\"}").is_err());
        // Right type, wrong payload shape
        assert!(PeerMessage::from_json("{\"type\":\"found\",\"word\":7}").is_err());
    }
}
