//! Transport Seam
//!
//! The session layer never talks to a concrete network. It sees a
//! reliable, ordered, at-most-once message bus through the `Transport`
//! trait: register a room name, connect to one, send text payloads and
//! poll for open/data/close events.
//!
//! Registration conflicts are a first-class outcome, not an error
//! string: room arbitration branches on `RegisterOutcome`, so any
//! transport implementation must classify "name already claimed"
//! explicitly.

use thiserror::Error;

/// Identifies one peer's attachment point to the bus.
pub type EndpointId = u64;

/// Identifies one connection between two endpoints. Both ends observe
/// the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u64);

/// Lifecycle of a single connection as seen by one peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Connection requested, not yet open.
    #[default]
    Connecting,
    /// Open and usable.
    Open,
    /// Closed by either side.
    Closed,
    /// Failed; no traffic will flow.
    Errored,
}

/// Result of trying to claim a room name.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The name is ours; the returned endpoint accepts connections.
    Granted {
        /// Endpoint listening under the registered name.
        endpoint: EndpointId,
    },
    /// Another peer already holds the name. Not an error: the caller
    /// falls back to connecting as a participant.
    NameTaken,
}

/// Events a transport delivers to an endpoint, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// A connection reached the open state.
    Opened(ConnectionId),
    /// A text payload arrived on a connection.
    Data(ConnectionId, String),
    /// A connection closed (either side, or transport failure).
    Closed(ConnectionId),
}

/// Transport failures that are not name conflicts.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Tried to connect to a room nobody registered.
    #[error("no such room: {0}")]
    RoomNotFound(String),
    /// The endpoint is gone; no further traffic is possible.
    #[error("endpoint closed")]
    EndpointClosed,
}

/// A reliable ordered message bus.
///
/// Sends are fire-and-forget: no acknowledgement is awaited and send
/// failures on closed connections are swallowed, matching the
/// event-driven model where stalls surface only as close events.
pub trait Transport {
    /// Claim `room_id`. Exactly one concurrent claim per name succeeds.
    fn register(&mut self, room_id: &str) -> Result<RegisterOutcome, TransportError>;

    /// Connect to the peer registered under `room_id`. The connection
    /// is reported `Opened` to both ends via `poll`.
    fn connect(&mut self, room_id: &str) -> Result<(EndpointId, ConnectionId), TransportError>;

    /// Queue `payload` from `from` to the other end of `conn`.
    fn send(&mut self, from: EndpointId, conn: ConnectionId, payload: &str);

    /// Drain pending events for `endpoint`, in delivery order.
    fn poll(&mut self, endpoint: EndpointId) -> Vec<TransportEvent>;

    /// Close `conn` from the side of `endpoint`. Both ends observe a
    /// `Closed` event.
    fn close(&mut self, endpoint: EndpointId, conn: ConnectionId);
}
