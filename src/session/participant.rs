//! Participant Role
//!
//! A non-authoritative peer: holds a read-mostly replica of the puzzle,
//! updated only by host messages, and proposes found words upstream for
//! the host to confirm. A participant starts with a locally generated
//! puzzle so there is something to show until the first sync lands.

use tracing::{debug, info};

use crate::core::cell::Cell;
use crate::puzzle::grid::PuzzleConfig;
use crate::puzzle::state::PuzzleState;
use crate::puzzle::words::PoolWord;
use crate::session::authority::Outgoing;
use crate::session::events::SessionEvent;
use crate::session::protocol::PeerMessage;
use crate::session::transport::{ConnectionId, ConnectionStatus, EndpointId};

/// A replica-holding peer connected to a room's authority.
#[derive(Debug)]
pub struct Participant {
    name: String,
    endpoint: EndpointId,
    conn: ConnectionId,
    status: ConnectionStatus,
    state: PuzzleState,
    events: Vec<SessionEvent>,
}

impl Participant {
    /// Join as a participant on an already established connection.
    pub fn new(
        name: String,
        endpoint: EndpointId,
        conn: ConnectionId,
        config: PuzzleConfig,
        pool: Vec<PoolWord>,
    ) -> Self {
        // Local placeholder puzzle until the host's init_state arrives
        let state = PuzzleState::generate(&config, &pool);
        Self {
            name,
            endpoint,
            conn,
            status: ConnectionStatus::Connecting,
            state,
            events: Vec::new(),
        }
    }

    /// This peer's attachment point on the transport.
    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    /// The connection to the authority.
    pub fn conn(&self) -> ConnectionId {
        self.conn
    }

    /// Connection lifecycle state, for the status line.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// The replicated puzzle state.
    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Take the accumulated user-visible events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// The connection to the host opened: introduce ourselves.
    pub fn on_open(&mut self) -> Outgoing {
        self.status = ConnectionStatus::Open;
        info!(name = %self.name, "connected to host");
        vec![(
            self.conn,
            PeerMessage::Hello {
                name: self.name.clone(),
            },
        )]
    }

    /// The connection closed. No auto-reconnect; the user is informed.
    pub fn on_close(&mut self) {
        self.status = ConnectionStatus::Closed;
        info!(name = %self.name, "disconnected from host");
        self.events.push(SessionEvent::Disconnected);
    }

    /// Handle one payload from the host. Undecodable or out-of-role
    /// messages are dropped silently.
    pub fn on_data(&mut self, payload: &str) -> Outgoing {
        let msg = match PeerMessage::from_json(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(%err, "ignoring malformed payload");
                return Vec::new();
            }
        };

        match msg {
            PeerMessage::InitState { state } => {
                if self.state.restore(&state) {
                    self.events.push(SessionEvent::StateSynced);
                } else {
                    debug!("ignoring inconsistent init_state snapshot");
                }
            }
            // Confirmation from the authority: apply without further
            // validation (apply_found still keeps it idempotent)
            PeerMessage::Found { word, by } => {
                if self.state.apply_found(&word) {
                    self.events.push(SessionEvent::WordFound { word, by });
                }
            }
            PeerMessage::NewPuzzle { by, state } => {
                if self.state.restore(&state) {
                    self.events.push(SessionEvent::PuzzleReplaced { by });
                } else {
                    debug!("ignoring inconsistent new_puzzle snapshot");
                }
            }
            PeerMessage::Hello { .. } | PeerMessage::RequestNewPuzzle { .. } => {
                debug!("ignoring participant-only message from host");
            }
        }
        Vec::new()
    }

    /// Commit a local drag selection: resolve against the replica and
    /// propose the match upstream. The replica is not mutated; the find
    /// counts once the host confirms it back.
    pub fn commit_selection(&mut self, path: &[Cell]) -> Outgoing {
        if self.status != ConnectionStatus::Open {
            return Vec::new();
        }
        match self.state.resolve_selection(path) {
            Some(placed) => vec![(
                self.conn,
                PeerMessage::Found {
                    word: placed.word.clone(),
                    by: self.name.clone(),
                },
            )],
            None => Vec::new(),
        }
    }

    /// Ask the authority for a new puzzle, optionally reconfigured.
    pub fn request_new_puzzle(&self, size: Option<u32>, word_count: Option<u32>) -> Outgoing {
        if self.status != ConnectionStatus::Open {
            return Vec::new();
        }
        vec![(
            self.conn,
            PeerMessage::RequestNewPuzzle {
                by: self.name.clone(),
                size,
                word_count,
            },
        )]
    }
}

// =============================================================================
// TESTS
// =============================================================================
