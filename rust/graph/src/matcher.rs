// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identity matching between the live graph and an incoming snapshot.
//!
//! Matching only decides; it never mutates the graph. [`match_rooms`]
//! pairs snapshot rooms with live rooms and [`match_anchors`] pairs the
//! anchors of one matched room.
//!
//! Anchors compare with [`AnchorData::same_content`], so values that only
//! drifted through a coordinate-system round trip count as unchanged.
//!
//! Room precedence:
//! 1. Same identifier and structurally equal content: unchanged.
//! 2. Otherwise the first unclaimed live room (creation order) sharing at
//!    least one anchor identifier: changed, possibly under a new room
//!    identifier.
//! 3. Otherwise: created. Live rooms claimed by neither rule are removed.
//!
//! A room identifier on its own does not match: a snapshot room with a
//! known identifier but no anchor in common with that live room replaces it.

use rustc_hash::{FxHashMap, FxHashSet};
use scene_lite_core::{AnchorData, RoomSnapshot};

use crate::arena::SceneGraph;
use crate::keys::*;

/// Outcome for one snapshot room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomMatch {
    Unchanged(RoomKey),
    Changed(RoomKey),
    New,
}

/// Room-level decisions for a whole snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomPlan {
    /// One entry per snapshot room, in snapshot order.
    pub matches: Vec<RoomMatch>,
    /// Live rooms no snapshot room matched, in creation order.
    pub removed: Vec<RoomKey>,
}

impl RoomPlan {
    pub fn changed(&self) -> impl Iterator<Item = (usize, RoomKey)> + '_ {
        self.matches.iter().enumerate().filter_map(|(i, m)| match m {
            RoomMatch::Changed(key) => Some((i, *key)),
            _ => None,
        })
    }

    pub fn created(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(i, m)| matches!(m, RoomMatch::New).then_some(i))
    }

    pub fn unchanged_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| matches!(m, RoomMatch::Unchanged(_)))
            .count()
    }
}

fn is_unchanged(graph: &SceneGraph, key: RoomKey, room: &RoomSnapshot) -> bool {
    graph
        .room_snapshot(key)
        .is_ok_and(|live| live.same_content(room))
}

fn shares_anchor(graph: &SceneGraph, key: RoomKey, room: &RoomSnapshot) -> bool {
    graph.room(key).is_some_and(|live| {
        room.anchors
            .iter()
            .any(|a| live.anchor_index.contains_key(&a.id))
    })
}

/// Pairs snapshot rooms with live rooms.
pub fn match_rooms(graph: &SceneGraph, rooms: &[&RoomSnapshot]) -> RoomPlan {
    let mut matches = vec![RoomMatch::New; rooms.len()];
    let mut claimed: FxHashSet<RoomKey> = FxHashSet::default();

    // Exact matches first so a heuristic match can never steal an
    // unchanged room.
    for (i, room) in rooms.iter().enumerate() {
        if let Some(key) = graph.room_key(&room.id) {
            if !claimed.contains(&key) && is_unchanged(graph, key, room) {
                matches[i] = RoomMatch::Unchanged(key);
                claimed.insert(key);
            }
        }
    }

    for (i, room) in rooms.iter().enumerate() {
        if matches[i] != RoomMatch::New {
            continue;
        }
        let candidate = graph
            .room_keys()
            .iter()
            .copied()
            .find(|key| !claimed.contains(key) && shares_anchor(graph, *key, room));
        if let Some(key) = candidate {
            if let Some(live) = graph.room(key).filter(|live| live.id() != room.id) {
                tracing::debug!(
                    from = %live.id(),
                    to = %room.id,
                    "room matched under a new identifier"
                );
            }
            matches[i] = RoomMatch::Changed(key);
            claimed.insert(key);
        }
    }

    let removed = graph
        .room_keys()
        .iter()
        .copied()
        .filter(|key| !claimed.contains(key))
        .collect();

    RoomPlan { matches, removed }
}

/// Anchor-level decisions for one matched room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorPlan {
    pub unchanged: Vec<AnchorKey>,
    /// Live anchor and the index of its replacement in the snapshot room.
    pub updated: Vec<(AnchorKey, usize)>,
    /// Indices of snapshot anchors with no live counterpart.
    pub created: Vec<usize>,
    /// Live anchors absent from the snapshot room, in insertion order.
    pub removed: Vec<AnchorKey>,
    /// Indices of snapshot anchors ignored as malformed.
    pub skipped: Vec<usize>,
}

/// Pairs the anchors of a snapshot room with those of a live room.
///
/// Each live anchor is consumed at most once. Snapshot anchors with an
/// empty or repeated identifier are skipped with a warning.
pub fn match_anchors(graph: &SceneGraph, room: RoomKey, anchors: &[AnchorData]) -> AnchorPlan {
    let mut plan = AnchorPlan::default();
    let Some(live) = graph.room(room) else {
        plan.created = (0..anchors.len()).collect();
        return plan;
    };

    let mut remaining: FxHashSet<AnchorKey> = live.anchors.iter().copied().collect();
    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();

    for (i, anchor) in anchors.iter().enumerate() {
        if anchor.id.is_empty() {
            tracing::warn!(room = %live.id, index = i, "skipping anchor with empty identifier");
            plan.skipped.push(i);
            continue;
        }
        if let Some(first) = seen.insert(anchor.id.as_str(), i) {
            tracing::warn!(
                room = %live.id,
                anchor = %anchor.id,
                first,
                "skipping repeated anchor identifier"
            );
            plan.skipped.push(i);
            continue;
        }

        match live.anchor_key(&anchor.id) {
            Some(key) if remaining.remove(&key) => {
                let unchanged = graph
                    .anchor(key)
                    .is_some_and(|a| a.data.same_content(anchor));
                if unchanged {
                    plan.unchanged.push(key);
                } else {
                    plan.updated.push((key, i));
                }
            }
            _ => plan.created.push(i),
        }
    }

    plan.removed = live
        .anchors
        .iter()
        .copied()
        .filter(|k| remaining.contains(k))
        .collect();
    plan
}
