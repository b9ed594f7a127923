//! Fan-out of room events to connected sessions.
//!
//! Each connection owns a bounded [`mpsc`] outbox. The socket task
//! drains its receiver; the room pushes into the senders with `try_send`.
//! Pushing never blocks. A closed or full outbox only affects its own
//! connection: the fan-out logs it, drops that sender, and moves on to
//! the next recipient. The socket task then sees its outbox end and runs
//! the normal disconnect path.

use std::collections::{BTreeMap, BTreeSet};

use bingo_types::{ConnectionId, ServerMessage};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Default number of events a connection may have queued before it is
/// considered stalled and evicted.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Sending half of a connection's outbox.
pub type Outbox = mpsc::Sender<ServerMessage>;

/// The set of live connections and their outboxes.
#[derive(Debug)]
pub struct Broadcaster {
    connections: BTreeMap<ConnectionId, Outbox>,
    /// Connections dropped for a full or closed outbox whose disconnect
    /// has not been processed yet.
    evicted: BTreeSet<ConnectionId>,
    capacity: usize,
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster {
    /// Create a broadcaster with no connections and the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_OUTBOX_CAPACITY)
    }

    /// Create a broadcaster whose outboxes hold at most `capacity` events.
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            connections: BTreeMap::new(),
            evicted: BTreeSet::new(),
            capacity: capacity.max(1),
        }
    }

    /// Per-connection outbox capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Register `id` and return the receiving half of its outbox.
    ///
    /// Registering an id twice replaces the old outbox, closing it.
    pub fn register(&mut self, id: ConnectionId) -> mpsc::Receiver<ServerMessage> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.evicted.remove(&id);
        if self.connections.insert(id, tx).is_some() {
            warn!(connection_id = %id, "Connection registered twice, replacing outbox");
        }
        rx
    }

    /// Stop delivering to `id`.
    ///
    /// Returns whether it was registered, counting a connection that was
    /// evicted but not yet disconnected.
    pub fn unregister(&mut self, id: ConnectionId) -> bool {
        let evicted = self.evicted.remove(&id);
        self.connections.remove(&id).is_some() || evicted
    }

    /// Whether `id` currently receives broadcasts.
    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Whether `id` was dropped for a full or closed outbox.
    pub fn is_evicted(&self, id: ConnectionId) -> bool {
        self.evicted.contains(&id)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Deliver `msg` to `id` only. Returns whether it was queued.
    ///
    /// A failed delivery evicts `id`.
    pub fn unicast(&mut self, id: ConnectionId, msg: ServerMessage) -> bool {
        let Some(outbox) = self.connections.get(&id) else {
            debug!(connection_id = %id, event = msg.event_name(), "Unicast to unknown connection");
            return false;
        };
        let delivered = deliver(id, outbox, msg);
        if !delivered {
            self.evict(id);
        }
        delivered
    }

    /// Deliver `msg` to every registered connection.
    ///
    /// Returns the number of connections it was queued for. A failed
    /// delivery is logged, evicts that connection, and does not stop the
    /// fan-out.
    pub fn broadcast(&mut self, msg: &ServerMessage) -> usize {
        let failed: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|(id, outbox)| !deliver(**id, outbox, msg.clone()))
            .map(|(id, _)| *id)
            .collect();
        for id in &failed {
            self.evict(*id);
        }
        self.connections.len()
    }

    /// Drop the sender for `id`, closing its outbox once drained.
    fn evict(&mut self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            self.evicted.insert(id);
        }
    }
}

fn deliver(id: ConnectionId, outbox: &Outbox, msg: ServerMessage) -> bool {
    let event = msg.event_name();
    match outbox.try_send(msg) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(connection_id = %id, event, "Outbox full, evicting stalled connection");
            false
        }
        Err(TrySendError::Closed(_)) => {
            warn!(connection_id = %id, event, "Outbox closed, message dropped");
            false
        }
    }
}
