//! In-Memory Transport
//!
//! A single-process implementation of the transport seam: per-endpoint
//! FIFO event queues and a room registry. Used by the integration tests
//! and the demo binary; delivery order per connection matches the
//! reliability assumptions real transports are expected to provide.

use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

use crate::session::transport::{
    ConnectionId, EndpointId, RegisterOutcome, Transport, TransportError, TransportEvent,
};

#[derive(Debug)]
struct Link {
    a: EndpointId,
    b: EndpointId,
    open: bool,
}

impl Link {
    fn other(&self, endpoint: EndpointId) -> Option<EndpointId> {
        if endpoint == self.a {
            Some(self.b)
        } else if endpoint == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// In-process message bus connecting endpoints within one event loop.
#[derive(Debug, Default)]
pub struct MemoryHub {
    next_endpoint: u64,
    next_conn: u64,
    rooms: BTreeMap<String, EndpointId>,
    queues: BTreeMap<EndpointId, VecDeque<TransportEvent>>,
    links: BTreeMap<ConnectionId, Link>,
}

impl MemoryHub {
    /// Empty hub with no rooms or endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    fn new_endpoint(&mut self) -> EndpointId {
        let id = self.next_endpoint;
        self.next_endpoint += 1;
        self.queues.insert(id, VecDeque::new());
        id
    }

    fn push(&mut self, endpoint: EndpointId, event: TransportEvent) {
        if let Some(queue) = self.queues.get_mut(&endpoint) {
            queue.push_back(event);
        }
    }

    /// Whether any endpoint still has undelivered events.
    pub fn has_pending(&self) -> bool {
        self.queues.values().any(|q| !q.is_empty())
    }
}

impl Transport for MemoryHub {
    fn register(&mut self, room_id: &str) -> Result<RegisterOutcome, TransportError> {
        if self.rooms.contains_key(room_id) {
            debug!(room = room_id, "room name already claimed");
            return Ok(RegisterOutcome::NameTaken);
        }
        let endpoint = self.new_endpoint();
        self.rooms.insert(room_id.to_string(), endpoint);
        Ok(RegisterOutcome::Granted { endpoint })
    }

    fn connect(&mut self, room_id: &str) -> Result<(EndpointId, ConnectionId), TransportError> {
        let host = *self
            .rooms
            .get(room_id)
            .ok_or_else(|| TransportError::RoomNotFound(room_id.to_string()))?;

        let joiner = self.new_endpoint();
        let conn = ConnectionId(self.next_conn);
        self.next_conn += 1;
        self.links.insert(
            conn,
            Link {
                a: host,
                b: joiner,
                open: true,
            },
        );

        // Both ends observe the open
        self.push(host, TransportEvent::Opened(conn));
        self.push(joiner, TransportEvent::Opened(conn));
        Ok((joiner, conn))
    }

    fn send(&mut self, from: EndpointId, conn: ConnectionId, payload: &str) {
        let target = match self.links.get(&conn) {
            Some(link) if link.open => link.other(from),
            _ => None,
        };
        match target {
            // Fire-and-forget: sends on closed or foreign connections
            // vanish, exactly like a late write on a dropped socket
            None => debug!(?conn, "dropping send on closed connection"),
            Some(endpoint) => self.push(endpoint, TransportEvent::Data(conn, payload.to_string())),
        }
    }

    fn poll(&mut self, endpoint: EndpointId) -> Vec<TransportEvent> {
        self.queues
            .get_mut(&endpoint)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default()
    }

    fn close(&mut self, endpoint: EndpointId, conn: ConnectionId) {
        let (a, b) = match self.links.get_mut(&conn) {
            Some(link) if link.open && link.other(endpoint).is_some() => {
                link.open = false;
                (link.a, link.b)
            }
            _ => return,
        };
        self.push(a, TransportEvent::Closed(conn));
        self.push(b, TransportEvent::Closed(conn));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_exclusive() {
        let mut hub = MemoryHub::new();
        assert!(matches!(
            hub.register("sala").unwrap(),
            RegisterOutcome::Granted { .. }
        ));
        assert!(matches!(
            hub.register("sala").unwrap(),
            RegisterOutcome::NameTaken
        ));
        // Other names remain free
        assert!(matches!(
            hub.register("otra").unwrap(),
            RegisterOutcome::Granted { .. }
        ));
    }

    #[test]
    fn test_connect_unknown_room_fails() {
        let mut hub = MemoryHub::new();
        assert!(matches!(
            hub.connect("nadie"),
            Err(TransportError::RoomNotFound(_))
        ));
    }

    #[test]
    fn test_open_data_close_flow() {
        let mut hub = MemoryHub::new();
        let RegisterOutcome::Granted { endpoint: host } = hub.register("sala").unwrap() else {
            panic!("registration failed");
        };
        let (joiner, conn) = hub.connect("sala").unwrap();

        assert_eq!(hub.poll(host), vec![TransportEvent::Opened(conn)]);
        assert_eq!(hub.poll(joiner), vec![TransportEvent::Opened(conn)]);

        hub.send(joiner, conn, "hola");
        assert_eq!(
            hub.poll(host),
            vec![TransportEvent::Data(conn, "hola".to_string())]
        );

        hub.close(joiner, conn);
        assert_eq!(hub.poll(host), vec![TransportEvent::Closed(conn)]);
        assert_eq!(hub.poll(joiner), vec![TransportEvent::Closed(conn)]);

        // Writes after close are swallowed
        hub.send(host, conn, "tarde");
        assert!(hub.poll(joiner).is_empty());
        assert!(!hub.has_pending());
    }

    #[test]
    fn test_per_connection_order_is_preserved() {
        let mut hub = MemoryHub::new();
        let RegisterOutcome::Granted { endpoint: host } = hub.register("sala").unwrap() else {
            panic!("registration failed");
        };
        let (joiner, conn) = hub.connect("sala").unwrap();
        hub.poll(host);
        hub.poll(joiner);

        for i in 0..5 {
            hub.send(host, conn, &format!("m{i}"));
        }
        let events = hub.poll(joiner);
        let payloads: Vec<_> = events
            .iter()
            .map(|e| match e {
                TransportEvent::Data(_, p) => p.as_str(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(payloads, vec!["m0", "m1", "m2", "m3", "m4"]);
    }
}
