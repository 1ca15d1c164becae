//! Session Layer
//!
//! Peer-to-peer room synchronization with a single authoritative peer.
//! This layer is transport-agnostic: role state machines consume
//! open/data/close events and emit addressed messages, and a small
//! driver wires them to anything implementing [`Transport`].
//!
//! ## Module Structure
//!
//! - `protocol`: wire messages between peers
//! - `transport`: the message-bus seam (register/connect/send/poll)
//! - `memory`: in-process bus for tests and the demo
//! - `authority`: the state-owning host role
//! - `participant`: the replica-holding guest role
//! - `events`: user-visible session events

pub mod authority;
pub mod events;
pub mod memory;
pub mod participant;
pub mod protocol;
pub mod transport;

pub use authority::{Authority, Outgoing};
pub use events::SessionEvent;
pub use memory::MemoryHub;
pub use participant::Participant;
pub use protocol::PeerMessage;
pub use transport::{
    ConnectionId, ConnectionStatus, EndpointId, RegisterOutcome, Transport, TransportError,
    TransportEvent,
};

use tracing::{debug, info, warn};

use crate::core::cell::Cell;
use crate::core::rng::SeededRng;
use crate::puzzle::grid::PuzzleConfig;
use crate::puzzle::state::PuzzleState;
use crate::puzzle::words::PoolWord;

/// Prefix for room ids derived from a shared address.
pub const ROOM_ID_PREFIX: &str = "pupiletras_";

/// Longest room id the derivation produces.
pub const ROOM_ID_MAX_LEN: usize = 48;

/// Which role a peer ended up with after arbitration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Owns the canonical state.
    Authority,
    /// Holds a replica.
    Participant,
}

/// Per-player options for joining a room.
#[derive(Clone, Debug, Default)]
pub struct RoomOptions {
    /// Player name; empty names get a generated fallback.
    pub name: String,
}

impl RoomOptions {
    /// Options with an explicit player name.
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Fill in a `Jugador-NNN` fallback when the name is blank.
    pub fn ensure_name(mut self) -> Self {
        if self.name.trim().is_empty() {
            let n = SeededRng::from_entropy().next_int(1000);
            self.name = format!("Jugador-{n:03}");
        } else {
            self.name = self.name.trim().to_string();
        }
        self
    }
}

/// Derive the room id every visitor of the same shared address lands in.
///
/// Lowercased alphanumerics of the address, prefixed and length-capped;
/// an address with no usable characters maps to a fixed default room.
pub fn derive_room_id(address: &str) -> String {
    let cleaned: String = address
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if cleaned.is_empty() {
        return format!("{ROOM_ID_PREFIX}default");
    }
    let mut id = format!("{ROOM_ID_PREFIX}{cleaned}");
    id.truncate(ROOM_ID_MAX_LEN);
    id
}

/// A peer's session, whichever role arbitration assigned.
#[derive(Debug)]
pub enum Session {
    /// This peer owns the room.
    Authority(Authority),
    /// This peer replicates the room.
    Participant(Participant),
}

impl Session {
    /// The assigned role.
    pub fn role(&self) -> Role {
        match self {
            Session::Authority(_) => Role::Authority,
            Session::Participant(_) => Role::Participant,
        }
    }

    /// This peer's transport attachment point.
    pub fn endpoint(&self) -> EndpointId {
        match self {
            Session::Authority(auth) => auth.endpoint(),
            Session::Participant(part) => part.endpoint(),
        }
    }

    /// The puzzle state this peer sees (canonical or replica).
    pub fn state(&self) -> &PuzzleState {
        match self {
            Session::Authority(auth) => auth.state(),
            Session::Participant(part) => part.state(),
        }
    }

    /// Take the accumulated user-visible events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        match self {
            Session::Authority(auth) => auth.drain_events(),
            Session::Participant(part) => part.drain_events(),
        }
    }

    /// Commit a finished drag selection in whatever way the role allows:
    /// the authority applies and broadcasts, a participant proposes.
    pub fn commit_selection(&mut self, path: &[Cell]) -> Outgoing {
        match self {
            Session::Authority(auth) => auth.commit_selection(path),
            Session::Participant(part) => part.commit_selection(path),
        }
    }

    /// Dispatch one transport event to the role handlers.
    pub fn handle(&mut self, event: TransportEvent) -> Outgoing {
        match self {
            Session::Authority(auth) => match event {
                TransportEvent::Opened(conn) => auth.on_open(conn),
                TransportEvent::Data(conn, payload) => auth.on_data(conn, &payload),
                TransportEvent::Closed(conn) => {
                    auth.on_close(conn);
                    Vec::new()
                }
            },
            Session::Participant(part) => {
                let conn = part.conn();
                match event {
                    TransportEvent::Opened(c) if c == conn => part.on_open(),
                    TransportEvent::Data(c, payload) if c == conn => part.on_data(&payload),
                    TransportEvent::Closed(c) if c == conn => {
                        part.on_close();
                        Vec::new()
                    }
                    other => {
                        debug!(?other, "ignoring event for unknown connection");
                        Vec::new()
                    }
                }
            }
        }
    }
}

/// Join `room_id`: claim the name and become Authority, or - when the
/// name is already held - connect to the holder as Participant.
///
/// This two-phase arbitration needs no election protocol: a race between
/// two peers is settled by whichever registration the transport accepts
/// first, and the loser demotes itself transparently.
pub fn join_room(
    transport: &mut dyn Transport,
    room_id: &str,
    options: RoomOptions,
    config: PuzzleConfig,
    pool: Vec<PoolWord>,
) -> Result<Session, TransportError> {
    let options = options.ensure_name();
    match transport.register(room_id)? {
        RegisterOutcome::Granted { endpoint } => {
            info!(room = room_id, name = %options.name, "registered as authority");
            Ok(Session::Authority(Authority::new(
                options.name,
                endpoint,
                config,
                pool,
            )))
        }
        RegisterOutcome::NameTaken => {
            info!(room = room_id, name = %options.name, "room taken, joining as participant");
            let (endpoint, conn) = transport.connect(room_id)?;
            Ok(Session::Participant(Participant::new(
                options.name,
                endpoint,
                conn,
                config,
                pool,
            )))
        }
    }
}

/// Send a batch of addressed messages, fire-and-forget.
pub fn deliver(transport: &mut dyn Transport, endpoint: EndpointId, outgoing: Outgoing) {
    for (conn, msg) in outgoing {
        match msg.to_json() {
            Ok(text) => transport.send(endpoint, conn, &text),
            Err(err) => warn!(%err, "failed to encode outgoing message"),
        }
    }
}

/// Drain and dispatch one peer's pending transport events.
/// Returns how many events were processed.
pub fn pump(transport: &mut dyn Transport, session: &mut Session) -> usize {
    let events = transport.poll(session.endpoint());
    let count = events.len();
    for event in events {
        let outgoing = session.handle(event);
        deliver(transport, session.endpoint(), outgoing);
    }
    count
}

/// Pump all peers round-robin until no events remain anywhere.
pub fn pump_until_idle(transport: &mut dyn Transport, sessions: &mut [&mut Session]) {
    loop {
        let mut processed = 0;
        for session in sessions.iter_mut() {
            processed += pump(transport, session);
        }
        if processed == 0 {
            break;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_room_id_cleans_the_address() {
        assert_eq!(
            derive_room_id("Example.com/Puzzle?x=1"),
            "pupiletras_examplecompuzzlex1"
        );
        assert_eq!(derive_room_id("---"), "pupiletras_default");
        assert_eq!(derive_room_id(""), "pupiletras_default");
    }

    #[test]
    fn test_derive_room_id_caps_length() {
        let id = derive_room_id(&"a".repeat(200));
        assert_eq!(id.len(), ROOM_ID_MAX_LEN);
        assert!(id.starts_with(ROOM_ID_PREFIX));
    }

    #[test]
    fn test_same_address_same_room() {
        assert_eq!(
            derive_room_id("juegos.example/sopa"),
            derive_room_id("JUEGOS.example/SOPA")
        );
    }

    #[test]
    fn test_ensure_name_fallback() {
        let options = RoomOptions::with_name("  ").ensure_name();
        assert!(options.name.starts_with("Jugador-"));

        let named = RoomOptions::with_name("  Ana ").ensure_name();
        assert_eq!(named.name, "Ana");
    }

    #[test]
    fn test_join_room_race_yields_one_authority() {
        let mut hub = MemoryHub::new();
        let config = PuzzleConfig {
            size: 10,
            word_count: 4,
            seed: Some("race".to_string()),
        };
        let pool = vec![PoolWord::new("DAVID"), PoolWord::new("PABLO")];

        let first = join_room(
            &mut hub,
            "pupiletras_sala",
            RoomOptions::with_name("Ana"),
            config.clone(),
            pool.clone(),
        )
        .unwrap();
        let second = join_room(
            &mut hub,
            "pupiletras_sala",
            RoomOptions::with_name("Beto"),
            config,
            pool,
        )
        .unwrap();

        assert_eq!(first.role(), Role::Authority);
        assert_eq!(second.role(), Role::Participant);
    }
}
