// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene snapshot model: the externally supplied description of all rooms.
//!
//! A snapshot is plain data. It is not owned by the live graph; the
//! reconciliation engine reads it and copies what it needs.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::anchor::AnchorData;
use crate::coords::CoordinateSystem;

/// Cross-reference from a room to the anchors forming its shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    #[serde(rename = "FloorUuid", default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(rename = "CeilingUuid", default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<String>,
    #[serde(rename = "GlobalMeshUuid", default, skip_serializing_if = "Option::is_none")]
    pub global_mesh: Option<String>,
    /// Wall anchors in loop order.
    #[serde(rename = "WallsUuid", default)]
    pub walls: Vec<String>,
}

impl RoomLayout {
    /// Every referenced anchor identifier with the role it plays.
    pub fn references(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.floor
            .as_deref()
            .map(|id| ("floor", id))
            .into_iter()
            .chain(self.ceiling.as_deref().map(|id| ("ceiling", id)))
            .chain(self.global_mesh.as_deref().map(|id| ("global mesh", id)))
            .chain(self.walls.iter().map(|id| ("wall", id.as_str())))
    }
}

/// One room as described by a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    #[serde(rename = "UUID")]
    pub id: String,
    #[serde(rename = "RoomLayout", default)]
    pub layout: RoomLayout,
    #[serde(rename = "Anchors", default)]
    pub anchors: Vec<AnchorData>,
}

impl RoomSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layout: RoomLayout::default(),
            anchors: Vec::new(),
        }
    }

    pub fn anchor(&self, id: &str) -> Option<&AnchorData> {
        self.anchors.iter().find(|a| a.id == id)
    }

    /// Structural equality treating the anchor list as a multiset, with
    /// anchors compared by [`AnchorData::same_content`].
    pub fn same_content(&self, other: &RoomSnapshot) -> bool {
        if self.id != other.id
            || self.layout != other.layout
            || self.anchors.len() != other.anchors.len()
        {
            return false;
        }
        let mut unmatched: Vec<&AnchorData> = other.anchors.iter().collect();
        for anchor in &self.anchors {
            match unmatched.iter().position(|a| a.same_content(anchor)) {
                Some(i) => {
                    unmatched.swap_remove(i);
                }
                None => return false,
            }
        }
        true
    }
}

/// Complete point-in-time description of every room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(rename = "CoordinateSystem", default)]
    pub coordinate_system: CoordinateSystem,
    #[serde(rename = "Rooms", default)]
    pub rooms: Vec<RoomSnapshot>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl SceneSnapshot {
    /// A native-space snapshot with no rooms. Also what the core sees when
    /// snapshot acquisition fails upstream.
    pub fn empty() -> Self {
        Self {
            coordinate_system: CoordinateSystem::Native,
            rooms: Vec::new(),
        }
    }

    pub fn with_rooms(rooms: Vec<RoomSnapshot>) -> Self {
        Self {
            coordinate_system: CoordinateSystem::Native,
            rooms,
        }
    }

    pub fn anchor_count(&self) -> usize {
        self.rooms.iter().map(|r| r.anchors.len()).sum()
    }

    /// Checks the snapshot for malformed content.
    ///
    /// Nothing found here is fatal; callers log the issues and carry on.
    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();
        if self.rooms.is_empty() {
            issues.push(SnapshotIssue::NoRooms);
        }

        let mut room_ids = FxHashSet::default();
        for (index, room) in self.rooms.iter().enumerate() {
            if room.id.is_empty() {
                issues.push(SnapshotIssue::EmptyRoomId { index });
            } else if !room_ids.insert(room.id.as_str()) {
                issues.push(SnapshotIssue::DuplicateRoomId(room.id.clone()));
            }
            if room.anchors.is_empty() {
                issues.push(SnapshotIssue::NoAnchors {
                    room: room.id.clone(),
                });
            }

            let mut anchor_ids = FxHashSet::default();
            for anchor in &room.anchors {
                if anchor.id.is_empty() {
                    issues.push(SnapshotIssue::EmptyAnchorId {
                        room: room.id.clone(),
                    });
                } else if !anchor_ids.insert(anchor.id.as_str()) {
                    issues.push(SnapshotIssue::DuplicateAnchorId {
                        room: room.id.clone(),
                        anchor: anchor.id.clone(),
                    });
                }
                if !anchor.is_finite() {
                    issues.push(SnapshotIssue::NonFinite {
                        room: room.id.clone(),
                        anchor: anchor.id.clone(),
                    });
                }
                if let Some(mesh) = &anchor.mesh {
                    let count = mesh.dangling_index_count();
                    if count > 0 {
                        issues.push(SnapshotIssue::DanglingMeshIndices {
                            room: room.id.clone(),
                            anchor: anchor.id.clone(),
                            count,
                        });
                    }
                }
            }

            for (role, id) in room.layout.references() {
                if !anchor_ids.contains(id) {
                    issues.push(SnapshotIssue::DanglingReference {
                        room: room.id.clone(),
                        anchor: id.to_string(),
                        role,
                    });
                }
            }
        }
        issues
    }

    /// Validates and logs every issue as a warning. Returns the issue count.
    pub fn log_issues(&self) -> usize {
        let issues = self.validate();
        for issue in &issues {
            tracing::warn!(%issue, "malformed snapshot");
        }
        issues.len()
    }
}

/// Malformed-input findings. None of these abort processing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotIssue {
    #[error("snapshot contains no rooms")]
    NoRooms,

    #[error("room at index {index} has an empty identifier")]
    EmptyRoomId { index: usize },

    #[error("room {0} appears more than once")]
    DuplicateRoomId(String),

    #[error("room {room} has no anchors")]
    NoAnchors { room: String },

    #[error("room {room} has an anchor with an empty identifier")]
    EmptyAnchorId { room: String },

    #[error("anchor {anchor} appears more than once in room {room}")]
    DuplicateAnchorId { room: String, anchor: String },

    #[error("room {room} references missing {role} anchor {anchor}")]
    DanglingReference {
        room: String,
        anchor: String,
        role: &'static str,
    },

    #[error("anchor {anchor} in room {room} has non-finite geometry")]
    NonFinite { room: String, anchor: String },

    #[error("anchor {anchor} in room {room} has {count} mesh indices past the vertex array")]
    DanglingMeshIndices {
        room: String,
        anchor: String,
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels;

    fn room() -> RoomSnapshot {
        let mut room = RoomSnapshot::new("room");
        room.anchors.push(AnchorData::new("floor").with_label(labels::FLOOR));
        room.anchors.push(AnchorData::new("wall").with_label(labels::WALL_FACE));
        room.layout.floor = Some("floor".into());
        room.layout.walls.push("wall".into());
        room
    }

    #[test]
    fn well_formed_snapshot_has_no_issues() {
        let snapshot = SceneSnapshot::with_rooms(vec![room()]);
        assert!(snapshot.validate().is_empty());
        assert_eq!(snapshot.anchor_count(), 2);
    }

    #[test]
    fn empty_snapshot_is_reported() {
        assert_eq!(SceneSnapshot::empty().validate(), vec![SnapshotIssue::NoRooms]);
    }

    #[test]
    fn dangling_layout_reference_is_reported() {
        let mut r = room();
        r.layout.ceiling = Some("missing".into());
        let issues = SceneSnapshot::with_rooms(vec![r]).validate();
        assert_eq!(
            issues,
            vec![SnapshotIssue::DanglingReference {
                room: "room".into(),
                anchor: "missing".into(),
                role: "ceiling",
            }]
        );
    }

    #[test]
    fn duplicates_are_reported() {
        let mut r = room();
        r.anchors.push(AnchorData::new("wall"));
        let issues = SceneSnapshot::with_rooms(vec![r.clone(), r]).validate();
        assert!(issues.contains(&SnapshotIssue::DuplicateRoomId("room".into())));
        assert!(issues.contains(&SnapshotIssue::DuplicateAnchorId {
            room: "room".into(),
            anchor: "wall".into(),
        }));
    }

    #[test]
    fn same_content_ignores_anchor_order() {
        let a = room();
        let mut b = room();
        b.anchors.reverse();
        assert_ne!(a, b);
        assert!(a.same_content(&b));

        b.anchors[0].labels.clear();
        assert!(!a.same_content(&b));
    }
}
