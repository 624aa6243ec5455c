/**
 * Room Registry
 *
 * This module tracks live socket connections and the conversation rooms
 * they have joined.
 *
 * # Structure
 *
 * - **connections** - connection id → (user id, outbound queue, joined rooms)
 * - **rooms** - conversation id → room, each room behind its own lock
 *
 * Broadcasting into one room only holds that room's lock while events are
 * queued, so traffic in different conversations does not contend. The
 * room index lock is held only to look up, create or drop a room.
 *
 * # Lock Order
 *
 * room index → room → connections. A lock may be taken while holding one
 * to its left, never the other way round. Membership changes (join,
 * close) hold the index lock throughout, so a room and the connections'
 * own room sets cannot disagree. None of these locks is held across an
 * `.await`.
 *
 * # Publish Order
 *
 * Writers that must reach rooms in the order they were persisted hold the
 * async publish gate from before their transaction until their broadcast
 * has been queued (see [`RoomRegistry::publish_gate`]).
 *
 * # Delivery
 *
 * Every connection owns an unbounded queue drained by its writer task.
 * Queuing never blocks; a member whose queue is closed is pruned from the
 * room on the next broadcast.
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use uuid::Uuid;

use crate::shared::event::ServerEvent;

/// Opaque handle of one live connection
pub type ConnectionId = Uuid;

/// Outbound queue of a connection
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Receiving end drained by the connection's writer task
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

type Room = Arc<Mutex<HashMap<ConnectionId, EventSender>>>;

#[derive(Debug)]
struct Connection {
    user_id: i64,
    sender: EventSender,
    rooms: HashSet<i64>,
}

#[derive(Debug, Default)]
struct Inner {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
    rooms: Mutex<HashMap<i64, Room>>,
    publish: AsyncMutex<()>,
}

/// Live connections and conversation rooms
///
/// Created once at startup and shared through `AppState`; clones share the
/// same registry. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an authenticated connection
    ///
    /// Returns the new handle and the receiver its writer task drains.
    pub fn register(&self, user_id: i64) -> (ConnectionId, EventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        lock(&self.inner.connections).insert(
            id,
            Connection {
                user_id,
                sender,
                rooms: HashSet::new(),
            },
        );

        tracing::debug!(connection = %id, user_id, "Connection registered");
        (id, receiver)
    }

    /// Add a connection to a room
    ///
    /// Returns `false` if the connection is not registered. Joining a room
    /// twice is a no-op.
    pub fn join(&self, connection: ConnectionId, room_id: i64) -> bool {
        let mut rooms = lock(&self.inner.rooms);
        let room = Arc::clone(rooms.entry(room_id).or_default());
        let mut members = lock(&room);

        let joined = match lock(&self.inner.connections).get_mut(&connection) {
            Some(conn) => {
                conn.rooms.insert(room_id);
                members.insert(connection, conn.sender.clone());
                true
            }
            None => false,
        };

        if members.is_empty() {
            drop(members);
            rooms.remove(&room_id);
        }
        if joined {
            tracing::debug!(connection = %connection, room_id, "Joined room");
        }
        joined
    }

    /// Remove a connection from a room
    ///
    /// Returns whether it was a member. Empty rooms are dropped.
    pub fn leave(&self, connection: ConnectionId, room_id: i64) -> bool {
        let mut rooms = lock(&self.inner.rooms);
        let (removed, now_empty) = match rooms.get(&room_id) {
            Some(room) => {
                let mut members = lock(room);
                let removed = members.remove(&connection).is_some();
                (removed, members.is_empty())
            }
            None => (false, false),
        };
        if now_empty {
            rooms.remove(&room_id);
        }
        if let Some(conn) = lock(&self.inner.connections).get_mut(&connection) {
            conn.rooms.remove(&room_id);
        }
        drop(rooms);

        if removed {
            tracing::debug!(connection = %connection, room_id, "Left room");
        }
        removed
    }

    /// Whether a connection is currently in a room
    pub fn is_member(&self, connection: ConnectionId, room_id: i64) -> bool {
        lock(&self.inner.connections)
            .get(&connection)
            .is_some_and(|c| c.rooms.contains(&room_id))
    }

    /// Rooms a connection has joined, in ascending order
    pub fn rooms_of(&self, connection: ConnectionId) -> Vec<i64> {
        let mut rooms: Vec<i64> = lock(&self.inner.connections)
            .get(&connection)
            .map(|c| c.rooms.iter().copied().collect())
            .unwrap_or_default();
        rooms.sort_unstable();
        rooms
    }

    /// Queue an event for every member of a room
    ///
    /// Returns the number of members the event was queued for. Members
    /// whose queue has closed are dropped from the room.
    pub fn broadcast(&self, room_id: i64, event: &ServerEvent) -> usize {
        let Some(room) = lock(&self.inner.rooms).get(&room_id).cloned() else {
            tracing::trace!(room_id, "Broadcast to empty room");
            return 0;
        };

        let mut pruned = Vec::new();
        let delivered = {
            let mut members = lock(&room);
            members.retain(|id, sender| match sender.send(event.clone()) {
                Ok(()) => true,
                Err(_) => {
                    pruned.push(*id);
                    false
                }
            });
            members.len()
        };

        if !pruned.is_empty() {
            self.forget_pruned(room_id, &pruned);
        }

        tracing::debug!(room_id, delivered, "Broadcast event");
        delivered
    }

    /// Serialize publishers of one ordered stream
    ///
    /// Held from before the write transaction until the broadcast is
    /// queued, so every room sees events in commit order.
    pub async fn publish_gate(&self) -> AsyncMutexGuard<'_, ()> {
        self.inner.publish.lock().await
    }

    fn forget_pruned(&self, room_id: i64, pruned: &[ConnectionId]) {
        let mut rooms = lock(&self.inner.rooms);
        let live = rooms.get(&room_id).cloned();
        let members = live.as_ref().map(|room| lock(room));

        {
            let mut connections = lock(&self.inner.connections);
            for id in pruned {
                tracing::debug!(connection = %id, room_id, "Pruned closed connection");
                // A member that rejoined meanwhile keeps the room.
                if members.as_ref().is_some_and(|m| m.contains_key(id)) {
                    continue;
                }
                if let Some(conn) = connections.get_mut(id) {
                    conn.rooms.remove(&room_id);
                }
            }
        }

        if members.is_some_and(|m| m.is_empty()) {
            rooms.remove(&room_id);
        }
    }

    /// Queue an event for a single connection
    pub fn send_to(&self, connection: ConnectionId, event: ServerEvent) -> bool {
        lock(&self.inner.connections)
            .get(&connection)
            .is_some_and(|c| c.sender.send(event).is_ok())
    }

    /// Forget a connection and all of its memberships
    pub fn disconnect(&self, connection: ConnectionId) {
        let Some(conn) = lock(&self.inner.connections).remove(&connection) else {
            return;
        };
        for room_id in &conn.rooms {
            self.remove_member(*room_id, connection);
        }
        tracing::debug!(connection = %connection, user_id = conn.user_id, "Connection removed");
    }

    /// Drop a room entirely, e.g. after its conversation was deleted
    ///
    /// Returns how many connections were in it.
    pub fn close_room(&self, room_id: i64) -> usize {
        let mut rooms = lock(&self.inner.rooms);
        let Some(room) = rooms.remove(&room_id) else {
            return 0;
        };
        let members: Vec<ConnectionId> = lock(&room).drain().map(|(id, _)| id).collect();

        let mut connections = lock(&self.inner.connections);
        for id in &members {
            if let Some(conn) = connections.get_mut(id) {
                conn.rooms.remove(&room_id);
            }
        }
        members.len()
    }

    /// Number of connections in a room
    pub fn room_size(&self, room_id: i64) -> usize {
        lock(&self.inner.rooms)
            .get(&room_id)
            .map(|room| lock(room).len())
            .unwrap_or(0)
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        lock(&self.inner.connections).len()
    }

    fn remove_member(&self, room_id: i64, connection: ConnectionId) -> bool {
        let mut rooms = lock(&self.inner.rooms);
        let Some(room) = rooms.get(&room_id) else {
            return false;
        };
        let (removed, now_empty) = {
            let mut members = lock(room);
            let removed = members.remove(&connection).is_some();
            (removed, members.is_empty())
        };
        if now_empty {
            rooms.remove(&room_id);
        }
        removed
    }
}
