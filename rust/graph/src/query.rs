// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derived room geometry and read-only queries over the live graph.
//!
//! Derived geometry (world bounds, floor outline, floor and ceiling
//! heights) is recomputed once per reconciliation pass and cached on each
//! room. Containment queries read the cache only.

use scene_lite_core::{Bounds3, Vec2, Vec3};

use crate::arena::{Anchor, SceneGraph};
use crate::keys::*;

/// Cached world-space geometry of a room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomGeometry {
    /// Union of the world bounds of every anchor in the room.
    pub bounds: Option<Bounds3>,
    /// Floor outline projected onto the horizontal plane as (x, z).
    pub floor_outline: Vec<Vec2>,
    pub floor_height: Option<f64>,
    pub ceiling_height: Option<f64>,
}

impl RoomGeometry {
    /// Tests whether a world-space point lies inside the room.
    ///
    /// With a floor outline the point must fall inside the outline and
    /// between floor and ceiling heights; missing heights fall back to the
    /// room bounds. Without a floor the room bounds alone decide.
    pub fn contains(&self, point: Vec3) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if self.floor_outline.len() < 3 {
            return bounds.contains(point);
        }
        let bottom = self.floor_height.unwrap_or(bounds.min.y);
        let top = self.ceiling_height.unwrap_or(bounds.max.y);
        point.y >= bottom
            && point.y <= top
            && point_in_polygon_2d(&Vec2::new(point.x, point.z), &self.floor_outline)
    }

    /// Horizontal floor area from the outline (shoelace formula).
    pub fn floor_area(&self) -> f64 {
        let n = self.floor_outline.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = self.floor_outline[i];
            let b = self.floor_outline[(i + 1) % n];
            twice_area += a.x * b.y - b.x * a.y;
        }
        twice_area.abs() / 2.0
    }
}

/// 2D ray-casting point-in-polygon test.
fn point_in_polygon_2d(point: &Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > point.y) != (yj > point.y))
            && (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

impl SceneGraph {
    fn layout_anchor(&self, room: RoomKey, id: Option<&str>) -> Option<(AnchorKey, &Anchor)> {
        self.anchor_by_id(room, id?)
    }

    /// The floor anchor named by the room layout.
    pub fn floor(&self, room: RoomKey) -> Option<(AnchorKey, &Anchor)> {
        self.layout_anchor(room, self.rooms.get(room)?.layout.floor.as_deref())
    }

    pub fn ceiling(&self, room: RoomKey) -> Option<(AnchorKey, &Anchor)> {
        self.layout_anchor(room, self.rooms.get(room)?.layout.ceiling.as_deref())
    }

    pub fn global_mesh(&self, room: RoomKey) -> Option<(AnchorKey, &Anchor)> {
        self.layout_anchor(room, self.rooms.get(room)?.layout.global_mesh.as_deref())
    }

    /// Wall anchors in layout (loop) order. Dangling references are skipped.
    pub fn walls(&self, room: RoomKey) -> Vec<(AnchorKey, &Anchor)> {
        let Some(r) = self.rooms.get(room) else {
            return Vec::new();
        };
        r.layout
            .walls
            .iter()
            .filter_map(|id| self.anchor_by_id(room, id))
            .collect()
    }

    /// Every anchor carrying `label`, room by room in creation order.
    pub fn anchors_with_label<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = (AnchorKey, &'a Anchor)> + 'a {
        self.room_order
            .iter()
            .flat_map(move |&room| self.anchors_of(room))
            .filter(move |(_, a)| a.data.has_label(label))
    }

    /// The room owning an anchor.
    pub fn room_of(&self, anchor: AnchorKey) -> Option<RoomKey> {
        self.anchors.get(anchor).map(|a| a.room)
    }

    /// The first room (in creation order) containing `point`.
    pub fn room_at(&self, point: Vec3) -> Option<RoomKey> {
        self.rooms()
            .find(|(_, room)| room.geometry.contains(point))
            .map(|(key, _)| key)
    }

    /// Computes a room's derived geometry from its current anchors.
    pub fn compute_geometry(&self, room: RoomKey) -> RoomGeometry {
        let bounds = self
            .anchors_of(room)
            .map(|(_, a)| a.data.world_bounds())
            .reduce(|acc, b| acc.union(&b));

        let floor = self.floor(room);
        let floor_outline = floor
            .and_then(|(_, a)| a.data.world_outline())
            .map(|outline| outline.iter().map(|p| Vec2::new(p.x, p.z)).collect())
            .unwrap_or_default();

        RoomGeometry {
            bounds,
            floor_outline,
            floor_height: floor.map(|(_, a)| a.data.transform.translation.y),
            ceiling_height: self
                .ceiling(room)
                .map(|(_, a)| a.data.transform.translation.y),
        }
    }

    /// Recomputes and caches the derived geometry of every live room.
    pub(crate) fn refresh_geometry(&mut self) {
        let keys = self.room_order.clone();
        for key in keys {
            let geometry = self.compute_geometry(key);
            if let Some(room) = self.rooms.get_mut(key) {
                room.geometry = geometry;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(0.0, 3.0),
        ]
    }

    fn geometry() -> RoomGeometry {
        RoomGeometry {
            bounds: Some(Bounds3::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.5, 3.0))),
            floor_outline: square(),
            floor_height: Some(0.0),
            ceiling_height: Some(2.5),
        }
    }

    #[test]
    fn point_in_square() {
        assert!(point_in_polygon_2d(&Vec2::new(2.0, 1.5), &square()));
        assert!(!point_in_polygon_2d(&Vec2::new(5.0, 1.5), &square()));
        assert!(!point_in_polygon_2d(&Vec2::new(2.0, -0.1), &square()));
    }

    #[test]
    fn containment_respects_heights() {
        let g = geometry();
        assert!(g.contains(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!g.contains(Vec3::new(1.0, 3.0, 1.0)));
        assert!(!g.contains(Vec3::new(1.0, -0.5, 1.0)));
        assert!(!g.contains(Vec3::new(4.5, 1.0, 1.0)));
    }

    #[test]
    fn containment_without_floor_uses_bounds() {
        let g = RoomGeometry {
            floor_outline: Vec::new(),
            ..geometry()
        };
        assert!(g.contains(Vec3::new(3.9, 2.4, 2.9)));
        assert!(!g.contains(Vec3::new(3.9, 2.6, 2.9)));
        assert!(!RoomGeometry::default().contains(Vec3::ZERO));
    }

    #[test]
    fn floor_area_of_outline() {
        assert_relative_eq!(geometry().floor_area(), 12.0);
        assert_relative_eq!(RoomGeometry::default().floor_area(), 0.0);
    }
}
