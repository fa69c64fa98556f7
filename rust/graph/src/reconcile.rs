// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot reconciliation.
//!
//! Applies the matcher's decisions to the live graph and reports every
//! transition to a listener, in this order:
//!
//! 1. Changed rooms, in snapshot order: anchor creations, anchor removals,
//!    anchor updates, then one `RoomUpdated`.
//! 2. Removed rooms, in creation order: one `AnchorRemoved` per anchor,
//!    then `RoomRemoved`.
//! 3. New rooms, in snapshot order: one `AnchorCreated` per anchor, then
//!    `RoomCreated`.
//!
//! Unchanged rooms produce nothing. Derived geometry of every live room is
//! recomputed exactly once at the end of the pass.
//!
//! Live anchor count after a pass is always the count before, minus the
//! `AnchorRemoved` events, plus the `AnchorCreated` events.

use std::borrow::Cow;

use rustc_hash::FxHashSet;
use scene_lite_core::{AnchorData, RoomSnapshot, SceneSnapshot};

use crate::arena::SceneGraph;
use crate::events::{ReconcileSummary, SceneEvent, SceneListener};
use crate::keys::RoomKey;
use crate::matcher::{match_anchors, match_rooms};

/// Forwards events to the listener while counting them.
struct Emitter<'a, L: SceneListener + ?Sized> {
    listener: &'a mut L,
    summary: ReconcileSummary,
}

impl<L: SceneListener + ?Sized> Emitter<'_, L> {
    fn emit(&mut self, event: SceneEvent) {
        tracing::trace!(%event, "scene event");
        self.summary.record(&event);
        self.listener.on_event(&event);
    }
}

/// Drops rooms the engine cannot address: empty identifiers and repeated
/// identifiers (the first occurrence wins). Anchors of kept rooms that carry
/// non-finite values are dropped too and count as absent.
fn usable_rooms(snapshot: &SceneSnapshot) -> Vec<Cow<'_, RoomSnapshot>> {
    let mut seen = FxHashSet::default();
    snapshot
        .rooms
        .iter()
        .enumerate()
        .filter(|(index, room)| {
            if room.id.is_empty() {
                tracing::warn!(index, "skipping room with empty identifier");
                return false;
            }
            if !seen.insert(room.id.as_str()) {
                tracing::warn!(room = %room.id, "skipping repeated room identifier");
                return false;
            }
            if room.anchors.is_empty() {
                tracing::warn!(room = %room.id, "room has no anchors");
            }
            true
        })
        .map(|(_, room)| finite_anchors(room))
        .collect()
}

fn finite_anchors(room: &RoomSnapshot) -> Cow<'_, RoomSnapshot> {
    if room.anchors.iter().all(AnchorData::is_finite) {
        return Cow::Borrowed(room);
    }
    let mut kept = room.clone();
    kept.anchors.retain(|anchor| {
        let finite = anchor.is_finite();
        if !finite {
            tracing::warn!(
                room = %room.id,
                anchor = %anchor.id,
                "skipping anchor with non-finite geometry"
            );
        }
        finite
    });
    Cow::Owned(kept)
}

impl SceneGraph {
    /// Reconciles the graph against `snapshot` and reports every
    /// transition to `listener`.
    ///
    /// Never fails: malformed rooms and anchors are logged and skipped.
    /// Snapshots in a non-native coordinate system are normalized first;
    /// identifiers are compared as-is.
    pub fn reconcile<L>(&mut self, snapshot: &SceneSnapshot, listener: &mut L) -> ReconcileSummary
    where
        L: SceneListener + ?Sized,
    {
        let snapshot: Cow<'_, SceneSnapshot> = if snapshot.coordinate_system.is_native() {
            Cow::Borrowed(snapshot)
        } else {
            tracing::debug!(from = %snapshot.coordinate_system, "normalizing snapshot coordinates");
            Cow::Owned(snapshot.clone().into_native())
        };
        let usable = usable_rooms(&snapshot);
        let rooms: Vec<&RoomSnapshot> = usable.iter().map(|room| &**room).collect();
        let anchors_before = self.anchor_count();

        let plan = match_rooms(self, &rooms);
        let mut emitter = Emitter {
            listener,
            summary: ReconcileSummary {
                rooms_unchanged: plan.unchanged_count(),
                ..ReconcileSummary::default()
            },
        };

        for (index, key) in plan.changed() {
            self.apply_changed_room(key, rooms[index], &mut emitter);
        }
        for &key in &plan.removed {
            self.apply_removed_room(key, &mut emitter);
        }
        for index in plan.created() {
            self.apply_new_room(rooms[index], &mut emitter);
        }

        self.refresh_geometry();

        let summary = emitter.summary;
        debug_assert_eq!(
            self.anchor_count(),
            anchors_before + summary.anchors_created - summary.anchors_removed
        );
        tracing::info!(
            rooms = self.room_count(),
            anchors = self.anchor_count(),
            %summary,
            "reconciled snapshot"
        );
        summary
    }

    fn apply_changed_room<L>(
        &mut self,
        key: RoomKey,
        room: &RoomSnapshot,
        out: &mut Emitter<'_, L>,
    ) where
        L: SceneListener + ?Sized,
    {
        let plan = match_anchors(self, key, &room.anchors);
        out.summary.anchors_unchanged += plan.unchanged.len();

        for &index in &plan.created {
            let data = room.anchors[index].clone();
            if let Some(anchor) = self.insert_anchor(key, data.clone()) {
                out.emit(SceneEvent::AnchorCreated {
                    room: key,
                    anchor,
                    data,
                });
            }
        }
        for &anchor in &plan.removed {
            if let Some(removed) = self.remove_anchor(anchor) {
                out.emit(SceneEvent::AnchorRemoved {
                    room: key,
                    anchor,
                    data: removed.data,
                });
            }
        }
        for &(anchor, index) in &plan.updated {
            let data = room.anchors[index].clone();
            if let Some(previous) = self.replace_anchor(anchor, data.clone()) {
                out.emit(SceneEvent::AnchorUpdated {
                    room: key,
                    anchor,
                    previous,
                    data,
                });
            }
        }

        self.rename_room(key, &room.id);
        self.set_layout(key, room.layout.clone());
        out.emit(SceneEvent::RoomUpdated {
            room: key,
            id: room.id.clone(),
        });
    }

    fn apply_removed_room<L>(&mut self, key: RoomKey, out: &mut Emitter<'_, L>)
    where
        L: SceneListener + ?Sized,
    {
        let anchors = self
            .room(key)
            .map(|r| r.anchor_keys().to_vec())
            .unwrap_or_default();
        for anchor in anchors {
            if let Some(removed) = self.remove_anchor(anchor) {
                out.emit(SceneEvent::AnchorRemoved {
                    room: key,
                    anchor,
                    data: removed.data,
                });
            }
        }
        if let Some(room) = self.remove_room(key) {
            out.emit(SceneEvent::RoomRemoved { room: key, id: room.id });
        }
    }

    fn apply_new_room<L>(&mut self, room: &RoomSnapshot, out: &mut Emitter<'_, L>)
    where
        L: SceneListener + ?Sized,
    {
        let key = self.insert_room(room.id.clone(), room.layout.clone());
        let mut seen = FxHashSet::default();
        for data in &room.anchors {
            if data.id.is_empty() {
                tracing::warn!(room = %room.id, "skipping anchor with empty identifier");
                continue;
            }
            if !seen.insert(data.id.as_str()) {
                tracing::warn!(
                    room = %room.id,
                    anchor = %data.id,
                    "skipping repeated anchor identifier"
                );
                continue;
            }
            if let Some(anchor) = self.insert_anchor(key, data.clone()) {
                out.emit(SceneEvent::AnchorCreated {
                    room: key,
                    anchor,
                    data: data.clone(),
                });
            }
        }
        out.emit(SceneEvent::RoomCreated {
            room: key,
            id: room.id.clone(),
        });
    }
}
