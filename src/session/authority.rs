//! Authority Role
//!
//! The peer that owns the canonical puzzle state: it generates puzzles,
//! is the sole writer of the found set, validates found-word proposals
//! and broadcasts every accepted mutation to its participants.
//!
//! Handlers are synchronous and return the messages to send; the
//! embedding event loop delivers them fire-and-forget.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::core::cell::Cell;
use crate::puzzle::grid::PuzzleConfig;
use crate::puzzle::state::PuzzleState;
use crate::puzzle::words::PoolWord;
use crate::session::events::SessionEvent;
use crate::session::protocol::PeerMessage;
use crate::session::transport::{ConnectionId, EndpointId};

/// Messages to hand to the transport, already addressed.
pub type Outgoing = Vec<(ConnectionId, PeerMessage)>;

/// What the Authority knows about one connected participant.
#[derive(Debug, Default)]
struct Peer {
    name: Option<String>,
}

/// The authoritative peer of a room.
#[derive(Debug)]
pub struct Authority {
    name: String,
    endpoint: EndpointId,
    config: PuzzleConfig,
    pool: Vec<PoolWord>,
    state: PuzzleState,
    participants: BTreeMap<ConnectionId, Peer>,
    events: Vec<SessionEvent>,
}

impl Authority {
    /// Become the authority: generate the initial puzzle immediately.
    pub fn new(name: String, endpoint: EndpointId, config: PuzzleConfig, pool: Vec<PoolWord>) -> Self {
        let config = config.clamped();
        let state = PuzzleState::generate(&config, &pool);
        info!(
            host = %name,
            size = state.size(),
            words = state.placed().len(),
            "authority ready, puzzle generated"
        );
        Self {
            name,
            endpoint,
            config,
            pool,
            state,
            participants: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// This peer's attachment point on the transport.
    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    /// The canonical puzzle state.
    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Current generation parameters.
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Number of live participant connections.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Take the accumulated user-visible events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// A participant connection opened: track it and sync it.
    pub fn on_open(&mut self, conn: ConnectionId) -> Outgoing {
        self.participants.insert(conn, Peer::default());
        debug!(?conn, "participant connected, sending initial state");
        vec![(
            conn,
            PeerMessage::InitState {
                state: self.state.snapshot(),
            },
        )]
    }

    /// A participant connection closed: drop it from the broadcast list.
    pub fn on_close(&mut self, conn: ConnectionId) {
        if self.participants.remove(&conn).is_some() {
            debug!(?conn, "participant disconnected");
            self.events.push(SessionEvent::PeerLeft);
        }
    }

    /// Handle one incoming payload. Undecodable or out-of-role messages
    /// are dropped silently.
    pub fn on_data(&mut self, conn: ConnectionId, payload: &str) -> Outgoing {
        let msg = match PeerMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(?conn, %err, "ignoring malformed payload");
                return Vec::new();
            }
        };

        match msg {
            PeerMessage::Hello { name } => {
                if let Some(peer) = self.participants.get_mut(&conn) {
                    peer.name = Some(name.clone());
                }
                self.events.push(SessionEvent::PeerJoined { name });
                // Greet with a fresh sync; restore on the other side is
                // idempotent, so a duplicate after on_open is harmless
                vec![(
                    conn,
                    PeerMessage::InitState {
                        state: self.state.snapshot(),
                    },
                )]
            }
            PeerMessage::Found { word, by } => self.accept_found(&word, &by),
            PeerMessage::RequestNewPuzzle {
                by,
                size,
                word_count,
            } => {
                if let Some(size) = size {
                    self.config.size = size;
                }
                if let Some(word_count) = word_count {
                    self.config.word_count = word_count;
                }
                self.config = self.config.clamped();
                self.rebuild(&by)
            }
            PeerMessage::InitState { .. } | PeerMessage::NewPuzzle { .. } => {
                debug!(?conn, "ignoring authority-only message from participant");
                Vec::new()
            }
        }
    }

    /// Commit a local drag selection made by the host player.
    pub fn commit_selection(&mut self, path: &[Cell]) -> Outgoing {
        let word = match self.state.resolve_selection(path) {
            Some(placed) => placed.word.clone(),
            None => return Vec::new(),
        };
        let by = self.name.clone();
        self.accept_found(&word, &by)
    }

    /// Regenerate locally (host pressed "new puzzle").
    pub fn new_puzzle(&mut self) -> Outgoing {
        let by = self.name.clone();
        self.rebuild(&by)
    }

    /// Validate a found-word claim; on first acceptance, apply and
    /// re-broadcast to every participant (originator echo included).
    fn accept_found(&mut self, word: &str, by: &str) -> Outgoing {
        if !self.state.apply_found(word) {
            debug!(word, "rejecting found claim (unknown or already found)");
            return Vec::new();
        }
        self.events.push(SessionEvent::WordFound {
            word: word.to_string(),
            by: by.to_string(),
        });
        self.broadcast(PeerMessage::Found {
            word: word.to_string(),
            by: by.to_string(),
        })
    }

    fn rebuild(&mut self, by: &str) -> Outgoing {
        self.state = PuzzleState::generate(&self.config, &self.pool);
        info!(
            by,
            size = self.state.size(),
            words = self.state.placed().len(),
            "puzzle regenerated"
        );
        self.events.push(SessionEvent::PuzzleReplaced {
            by: by.to_string(),
        });
        self.broadcast(PeerMessage::NewPuzzle {
            by: by.to_string(),
            state: self.state.snapshot(),
        })
    }

    fn broadcast(&self, msg: PeerMessage) -> Outgoing {
        self.participants
            .keys()
            .map(|&conn| (conn, msg.clone()))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
