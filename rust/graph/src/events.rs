// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room and anchor lifecycle events.
//!
//! A reconciliation pass reports every transition to a single
//! [`SceneListener`], synchronously and in pass order. The
//! [`EventDispatcher`] fans events out to scene-wide listeners and to
//! listeners scoped to one room; [`EventLog`] simply records them.

use std::fmt;

use rustc_hash::FxHashMap;
use scene_lite_core::AnchorData;

use crate::keys::{AnchorKey, RoomKey};

/// One lifecycle transition.
///
/// Room events carry the room identifier as of the transition. Anchor
/// events carry the anchor data: the new data for creations and updates,
/// the last live data for removals.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    RoomCreated {
        room: RoomKey,
        id: String,
    },
    RoomUpdated {
        room: RoomKey,
        id: String,
    },
    /// The key is no longer live when this fires.
    RoomRemoved {
        room: RoomKey,
        id: String,
    },
    AnchorCreated {
        room: RoomKey,
        anchor: AnchorKey,
        data: AnchorData,
    },
    AnchorUpdated {
        room: RoomKey,
        anchor: AnchorKey,
        previous: AnchorData,
        data: AnchorData,
    },
    AnchorRemoved {
        room: RoomKey,
        anchor: AnchorKey,
        data: AnchorData,
    },
}

/// Discriminant for [`SceneEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    RoomCreated,
    RoomUpdated,
    RoomRemoved,
    AnchorCreated,
    AnchorUpdated,
    AnchorRemoved,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RoomCreated => "room-created",
            EventKind::RoomUpdated => "room-updated",
            EventKind::RoomRemoved => "room-removed",
            EventKind::AnchorCreated => "anchor-created",
            EventKind::AnchorUpdated => "anchor-updated",
            EventKind::AnchorRemoved => "anchor-removed",
        }
    }

    pub fn is_anchor_event(&self) -> bool {
        matches!(
            self,
            EventKind::AnchorCreated | EventKind::AnchorUpdated | EventKind::AnchorRemoved
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SceneEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SceneEvent::RoomCreated { .. } => EventKind::RoomCreated,
            SceneEvent::RoomUpdated { .. } => EventKind::RoomUpdated,
            SceneEvent::RoomRemoved { .. } => EventKind::RoomRemoved,
            SceneEvent::AnchorCreated { .. } => EventKind::AnchorCreated,
            SceneEvent::AnchorUpdated { .. } => EventKind::AnchorUpdated,
            SceneEvent::AnchorRemoved { .. } => EventKind::AnchorRemoved,
        }
    }

    /// The room the event belongs to.
    pub fn room(&self) -> RoomKey {
        match self {
            SceneEvent::RoomCreated { room, .. }
            | SceneEvent::RoomUpdated { room, .. }
            | SceneEvent::RoomRemoved { room, .. }
            | SceneEvent::AnchorCreated { room, .. }
            | SceneEvent::AnchorUpdated { room, .. }
            | SceneEvent::AnchorRemoved { room, .. } => *room,
        }
    }

    pub fn anchor(&self) -> Option<AnchorKey> {
        match self {
            SceneEvent::AnchorCreated { anchor, .. }
            | SceneEvent::AnchorUpdated { anchor, .. }
            | SceneEvent::AnchorRemoved { anchor, .. } => Some(*anchor),
            _ => None,
        }
    }

    /// Room identifier for room events, anchor identifier for anchor events.
    pub fn subject_id(&self) -> &str {
        match self {
            SceneEvent::RoomCreated { id, .. }
            | SceneEvent::RoomUpdated { id, .. }
            | SceneEvent::RoomRemoved { id, .. } => id,
            SceneEvent::AnchorCreated { data, .. }
            | SceneEvent::AnchorUpdated { data, .. }
            | SceneEvent::AnchorRemoved { data, .. } => &data.id,
        }
    }
}

impl fmt::Display for SceneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.subject_id())
    }
}

/// Receives lifecycle events.
pub trait SceneListener {
    fn on_event(&mut self, event: &SceneEvent);
}

impl<F> SceneListener for F
where
    F: FnMut(&SceneEvent),
{
    fn on_event(&mut self, event: &SceneEvent) {
        self(event)
    }
}

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type BoxedListener = Box<dyn SceneListener>;

/// Fans events out to registered listeners.
///
/// Scene-wide listeners see every event. Room listeners see only the
/// anchor events of their room and are dropped once that room is removed.
#[derive(Default)]
pub struct EventDispatcher {
    next_id: u64,
    scene: Vec<(ListenerId, BoxedListener)>,
    rooms: FxHashMap<RoomKey, Vec<(ListenerId, BoxedListener)>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn subscribe(&mut self, listener: impl SceneListener + 'static) -> ListenerId {
        let id = self.allocate();
        self.scene.push((id, Box::new(listener)));
        id
    }

    pub fn subscribe_room(
        &mut self,
        room: RoomKey,
        listener: impl SceneListener + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.rooms.entry(room).or_default().push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listener_count();
        self.scene.retain(|(l, _)| *l != id);
        for listeners in self.rooms.values_mut() {
            listeners.retain(|(l, _)| *l != id);
        }
        self.rooms.retain(|_, listeners| !listeners.is_empty());
        self.listener_count() != before
    }

    pub fn listener_count(&self) -> usize {
        self.scene.len() + self.rooms.values().map(Vec::len).sum::<usize>()
    }

    pub fn room_listener_count(&self, room: RoomKey) -> usize {
        self.rooms.get(&room).map_or(0, Vec::len)
    }
}

impl SceneListener for EventDispatcher {
    fn on_event(&mut self, event: &SceneEvent) {
        for (_, listener) in &mut self.scene {
            listener.on_event(event);
        }
        if event.kind().is_anchor_event() {
            if let Some(listeners) = self.rooms.get_mut(&event.room()) {
                for (_, listener) in listeners {
                    listener.on_event(event);
                }
            }
        }
        if let SceneEvent::RoomRemoved { room, .. } = event {
            if let Some(dropped) = self.rooms.remove(room) {
                tracing::debug!(listeners = dropped.len(), "dropped listeners of removed room");
            }
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("scene_listeners", &self.scene.len())
            .field("room_listeners", &self.rooms.len())
            .finish()
    }
}

/// Records every event it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<SceneEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(SceneEvent::kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn take(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SceneListener for EventLog {
    fn on_event(&mut self, event: &SceneEvent) {
        self.events.push(event.clone());
    }
}

/// Per-kind event counts of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub rooms_created: usize,
    pub rooms_updated: usize,
    pub rooms_removed: usize,
    pub rooms_unchanged: usize,
    pub anchors_created: usize,
    pub anchors_updated: usize,
    pub anchors_removed: usize,
    pub anchors_unchanged: usize,
}

impl ReconcileSummary {
    pub fn record(&mut self, event: &SceneEvent) {
        match event.kind() {
            EventKind::RoomCreated => self.rooms_created += 1,
            EventKind::RoomUpdated => self.rooms_updated += 1,
            EventKind::RoomRemoved => self.rooms_removed += 1,
            EventKind::AnchorCreated => self.anchors_created += 1,
            EventKind::AnchorUpdated => self.anchors_updated += 1,
            EventKind::AnchorRemoved => self.anchors_removed += 1,
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::RoomCreated => self.rooms_created,
            EventKind::RoomUpdated => self.rooms_updated,
            EventKind::RoomRemoved => self.rooms_removed,
            EventKind::AnchorCreated => self.anchors_created,
            EventKind::AnchorUpdated => self.anchors_updated,
            EventKind::AnchorRemoved => self.anchors_removed,
        }
    }

    /// Number of events emitted.
    pub fn event_count(&self) -> usize {
        self.rooms_created
            + self.rooms_updated
            + self.rooms_removed
            + self.anchors_created
            + self.anchors_updated
            + self.anchors_removed
    }

    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }
}

impl fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rooms +{} ~{} -{}, anchors +{} ~{} -{}",
            self.rooms_created,
            self.rooms_updated,
            self.rooms_removed,
            self.anchors_created,
            self.anchors_updated,
            self.anchors_removed
        )
    }
}
