// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authored room → snapshot room.
//!
//! Pipeline per room:
//! 1. Wall corners from each authored wall (height from the first wall)
//! 2. Greedy nearest-corner ordering into a loop
//! 3. Corner snapping so consecutive walls share an edge
//! 4. Floor and ceiling from the footprint in the longest wall's frame
//! 5. Volumes re-pivoted, planes copied
//!
//! A room without walls still builds; it simply has no floor or ceiling.

use scene_lite_core::{labels, AnchorData, RoomSnapshot, SceneSnapshot};
use uuid::Uuid;

use crate::authored::{AuthoredRoom, AuthoredScene, WallPrimitive};
use crate::error::{Error, Result};
use crate::footprint::{Footprint, FootprintPlane};
use crate::volumes::{plane_anchor, volume_anchor};
use crate::walls::{order_walls, snap_wall_loop, WallCorners, MIN_WALL_WIDTH};

/// Deterministic identifier for an anchor synthesized for `room_id`.
///
/// Rebuilding the same authored room yields the same identifiers, so the
/// reconciliation engine sees an unchanged room rather than churn.
pub fn generated_anchor_id(room_id: &str, role: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{room_id}/{role}").as_bytes()).to_string()
}

fn check_wall(wall: &WallPrimitive) -> Result<()> {
    if wall.transform.is_finite() && wall.size.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite(wall.id.clone()))
    }
}

fn plane_from_footprint(id: String, label: &str, plane: FootprintPlane) -> AnchorData {
    AnchorData::new(id)
        .with_label(label)
        .with_transform(plane.transform)
        .with_plane(plane.bounds)
        .with_boundary(plane.boundary)
}

/// Builds one room. Fails only on non-finite input.
pub fn build_room(room: &AuthoredRoom) -> Result<RoomSnapshot> {
    for wall in &room.walls {
        check_wall(wall)?;
    }
    for volume in &room.volumes {
        if !(volume.transform.is_finite() && volume.size.is_finite()) {
            return Err(Error::NonFinite(volume.id.clone()));
        }
    }
    for plane in &room.planes {
        if !(plane.transform.is_finite() && plane.size.is_finite()) {
            return Err(Error::NonFinite(plane.id.clone()));
        }
    }

    let walls: Vec<&WallPrimitive> = room
        .walls
        .iter()
        .filter(|w| {
            let usable = w.size.x > MIN_WALL_WIDTH && w.size.y > MIN_WALL_WIDTH;
            if !usable {
                tracing::warn!(room = %room.id, wall = %w.id, "dropping wall with zero extent");
            }
            usable
        })
        .collect();

    let mut out = RoomSnapshot::new(room.id.clone());

    if walls.is_empty() {
        tracing::warn!(room = %room.id, "room has no walls; building without floor or ceiling");
    } else {
        // All walls are assumed to share the first wall's height.
        let height = walls[0].size.y;
        let corners: Vec<WallCorners> =
            walls.iter().map(|w| WallCorners::from_primitive(w)).collect();
        let order = order_walls(&corners);
        let snapped = snap_wall_loop(&corners, &order);

        for wall in &snapped {
            let source = walls[wall.source];
            if wall.width() <= MIN_WALL_WIDTH {
                tracing::warn!(
                    room = %room.id,
                    wall = %source.id,
                    "wall collapsed while snapping corners"
                );
            }
            out.anchors.push(
                AnchorData::new(source.id.clone())
                    .with_label(source.label.clone())
                    .with_transform(wall.transform(height))
                    .with_plane(wall.bounds(height)),
            );
            out.layout.walls.push(source.id.clone());
        }

        if let Some(footprint) = Footprint::from_walls(&snapped) {
            let floor_id = generated_anchor_id(&room.id, "floor");
            let ceiling_id = generated_anchor_id(&room.id, "ceiling");
            out.anchors
                .push(plane_from_footprint(floor_id.clone(), labels::FLOOR, footprint.floor()));
            out.anchors.push(plane_from_footprint(
                ceiling_id.clone(),
                labels::CEILING,
                footprint.ceiling(height),
            ));
            out.layout.floor = Some(floor_id);
            out.layout.ceiling = Some(ceiling_id);
        }
    }

    out.anchors.extend(room.volumes.iter().map(volume_anchor));
    out.anchors.extend(room.planes.iter().map(plane_anchor));

    tracing::debug!(
        room = %room.id,
        walls = out.layout.walls.len(),
        anchors = out.anchors.len(),
        "built authored room"
    );
    Ok(out)
}

/// Builds every room of an authored scene into a native snapshot.
///
/// Rooms that fail to build are logged and skipped.
pub fn build_scene(scene: &AuthoredScene) -> SceneSnapshot {
    let rooms = scene
        .rooms
        .iter()
        .filter_map(|room| match build_room(room) {
            Ok(built) => Some(built),
            Err(err) => {
                tracing::warn!(room = %room.id, error = %err, "skipping authored room");
                None
            }
        })
        .collect();
    SceneSnapshot::with_rooms(rooms)
}
