// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the live room/anchor graph.
//!
//! The [`SceneGraph`] is the single owner of every live room and anchor.
//! Both live in slot maps with stable, generational keys; identifier
//! indices give O(1) lookup by the opaque snapshot identifiers.
//!
//! Only the reconciliation pass mutates the graph. Consumers read it
//! through the accessors here and the queries in [`crate::query`].

use rustc_hash::FxHashMap;
use scene_lite_core::{AnchorData, Bounds3, RoomLayout, RoomSnapshot, SceneSnapshot};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::query::RoomGeometry;

/// A live anchor. `data` is overwritten in place when a snapshot updates
/// it, so the key stays valid for as long as the anchor exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub room: RoomKey,
    pub data: AnchorData,
}

impl Anchor {
    #[inline]
    pub fn id(&self) -> &str {
        &self.data.id
    }
}

/// A live room.
#[derive(Debug, Clone)]
pub struct Room {
    pub(crate) id: String,
    pub(crate) layout: RoomLayout,
    /// Anchors in insertion order.
    pub(crate) anchors: Vec<AnchorKey>,
    pub(crate) anchor_index: FxHashMap<String, AnchorKey>,
    pub(crate) geometry: RoomGeometry,
}

impl Room {
    fn new(id: String, layout: RoomLayout) -> Self {
        Self {
            id,
            layout,
            anchors: Vec::new(),
            anchor_index: FxHashMap::default(),
            geometry: RoomGeometry::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    pub fn anchor_keys(&self) -> &[AnchorKey] {
        &self.anchors
    }

    pub fn anchor_key(&self, id: &str) -> Option<AnchorKey> {
        self.anchor_index.get(id).copied()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Derived geometry as of the last reconciliation pass.
    pub fn geometry(&self) -> &RoomGeometry {
        &self.geometry
    }

    /// World-space bounds of every anchor, `None` for an empty room.
    pub fn bounds(&self) -> Option<Bounds3> {
        self.geometry.bounds
    }
}

/// The live graph of rooms and anchors.
///
/// # Example
///
/// ```
/// use scene_lite_core::{AnchorData, RoomSnapshot, SceneSnapshot};
/// use scene_lite_graph::{EventLog, SceneGraph};
///
/// let mut room = RoomSnapshot::new("living");
/// room.anchors.push(AnchorData::new("table"));
///
/// let mut graph = SceneGraph::new();
/// let mut log = EventLog::new();
/// graph.reconcile(&SceneSnapshot::with_rooms(vec![room]), &mut log);
///
/// assert_eq!(graph.room_count(), 1);
/// assert_eq!(graph.anchor_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SceneGraph {
    pub(crate) rooms: SlotMap<RoomKey, Room>,
    pub(crate) anchors: SlotMap<AnchorKey, Anchor>,
    /// Rooms in creation order.
    pub(crate) room_order: Vec<RoomKey>,
    pub(crate) room_index: FxHashMap<String, RoomKey>,
}

impl SceneGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Room access ---

    pub fn room(&self, key: RoomKey) -> Option<&Room> {
        self.rooms.get(key)
    }

    pub fn room_key(&self, id: &str) -> Option<RoomKey> {
        self.room_index.get(id).copied()
    }

    pub fn room_by_id(&self, id: &str) -> Option<&Room> {
        self.room_key(id).and_then(|k| self.rooms.get(k))
    }

    /// Room keys in creation order.
    pub fn room_keys(&self) -> &[RoomKey] {
        &self.room_order
    }

    /// Rooms in creation order.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomKey, &Room)> + '_ {
        self.room_order
            .iter()
            .filter_map(move |&k| self.rooms.get(k).map(|r| (k, r)))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    // --- Anchor access ---

    pub fn anchor(&self, key: AnchorKey) -> Option<&Anchor> {
        self.anchors.get(key)
    }

    /// Anchors of a room in insertion order. Empty for an unknown room.
    pub fn anchors_of(&self, room: RoomKey) -> impl Iterator<Item = (AnchorKey, &Anchor)> + '_ {
        self.rooms
            .get(room)
            .map(|r| r.anchors.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&k| self.anchors.get(k).map(|a| (k, a)))
    }

    pub fn anchor_by_id(&self, room: RoomKey, id: &str) -> Option<(AnchorKey, &Anchor)> {
        let key = self.rooms.get(room)?.anchor_key(id)?;
        self.anchors.get(key).map(|a| (key, a))
    }

    /// Total number of live anchors across all rooms.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if the key references a live entity.
    pub fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::Room(k) => self.rooms.contains_key(k),
            EntityKey::Anchor(k) => self.anchors.contains_key(k),
        }
    }

    // --- Snapshot export ---

    /// The snapshot description of one live room.
    pub fn room_snapshot(&self, key: RoomKey) -> Result<RoomSnapshot> {
        let room = self.rooms.get(key).ok_or(Error::NotFound(key.into()))?;
        Ok(RoomSnapshot {
            id: room.id.clone(),
            layout: room.layout.clone(),
            anchors: self.anchors_of(key).map(|(_, a)| a.data.clone()).collect(),
        })
    }

    pub fn room_snapshot_by_id(&self, id: &str) -> Result<RoomSnapshot> {
        let key = self
            .room_key(id)
            .ok_or_else(|| Error::UnknownRoom(id.to_string()))?;
        self.room_snapshot(key)
    }

    /// A native snapshot of the whole graph. Reconciling the graph against
    /// this snapshot produces no events.
    pub fn to_snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::with_rooms(
            self.room_order
                .iter()
                .filter_map(|&k| self.room_snapshot(k).ok())
                .collect(),
        )
    }

    // --- Mutation (reconciliation only) ---

    pub(crate) fn insert_room(&mut self, id: String, layout: RoomLayout) -> RoomKey {
        let key = self.rooms.insert(Room::new(id.clone(), layout));
        self.room_order.push(key);
        self.room_index.insert(id, key);
        key
    }

    /// Removes a room. Its anchors must be removed first.
    pub(crate) fn remove_room(&mut self, key: RoomKey) -> Option<Room> {
        let room = self.rooms.remove(key)?;
        self.room_order.retain(|&k| k != key);
        if self.room_index.get(&room.id) == Some(&key) {
            self.room_index.remove(&room.id);
        }
        Some(room)
    }

    pub(crate) fn rename_room(&mut self, key: RoomKey, id: &str) {
        let Some(room) = self.rooms.get_mut(key) else {
            return;
        };
        if room.id == id {
            return;
        }
        if self.room_index.get(&room.id) == Some(&key) {
            self.room_index.remove(&room.id);
        }
        room.id = id.to_string();
        self.room_index.insert(room.id.clone(), key);
    }

    pub(crate) fn set_layout(&mut self, key: RoomKey, layout: RoomLayout) {
        if let Some(room) = self.rooms.get_mut(key) {
            room.layout = layout;
        }
    }

    pub(crate) fn insert_anchor(&mut self, room: RoomKey, data: AnchorData) -> Option<AnchorKey> {
        let id = data.id.clone();
        let slot = self.rooms.get_mut(room)?;
        let key = self.anchors.insert(Anchor { room, data });
        slot.anchors.push(key);
        slot.anchor_index.insert(id, key);
        Some(key)
    }

    pub(crate) fn remove_anchor(&mut self, key: AnchorKey) -> Option<Anchor> {
        let anchor = self.anchors.remove(key)?;
        if let Some(room) = self.rooms.get_mut(anchor.room) {
            room.anchors.retain(|&k| k != key);
            if room.anchor_index.get(&anchor.data.id) == Some(&key) {
                room.anchor_index.remove(&anchor.data.id);
            }
        }
        Some(anchor)
    }

    /// Overwrites an anchor's data in place and returns the previous data.
    pub(crate) fn replace_anchor(&mut self, key: AnchorKey, data: AnchorData) -> Option<AnchorData> {
        let anchor = self.anchors.get_mut(key)?;
        Some(std::mem::replace(&mut anchor.data, data))
    }
}
