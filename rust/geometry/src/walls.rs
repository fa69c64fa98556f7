// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall loop resolution.
//!
//! Authored walls arrive in arbitrary order with corners that rarely meet
//! exactly. [`order_walls`] chains them by nearest corners into a loop and
//! [`snap_wall_loop`] rebuilds every wall from shared corner points so that
//! consecutive walls meet on an exact edge.
//!
//! Walking the resulting loop goes from each wall's bottom-left corner to
//! its bottom-right corner, which sweeps clockwise around the room when
//! viewed from above (the room interior is always on the right).

use nalgebra::{Point3, Vector3};
use scene_lite_core::{Bounds2, Transform};

use crate::authored::WallPrimitive;

/// Below this width a snapped wall is considered collapsed.
pub const MIN_WALL_WIDTH: f64 = 1e-6;

#[inline]
pub fn world_up() -> Vector3<f64> {
    Vector3::y()
}

/// Floor-level corners of an authored wall in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallCorners {
    pub bottom_left: Point3<f64>,
    pub bottom_right: Point3<f64>,
    pub height: f64,
}

impl WallCorners {
    pub fn from_primitive(wall: &WallPrimitive) -> Self {
        let center = wall.transform.translation.to_point();
        let half_width = wall.transform.right() * (wall.size.x / 2.0);
        let half_height = wall.transform.up() * (wall.size.y / 2.0);
        Self {
            bottom_left: center - half_width - half_height,
            bottom_right: center + half_width - half_height,
            height: wall.size.y,
        }
    }
}

/// Orders walls into a loop by greedy nearest-corner walk.
///
/// Starts at wall 0 and repeatedly picks, among the walls not yet placed,
/// the one whose bottom-left corner is closest to the current wall's
/// bottom-right corner. Ties go to the wall that comes first in `walls`.
/// The walk assumes the walls form a single closed loop; if they do not,
/// the order is still complete but geometrically meaningless.
pub fn order_walls(walls: &[WallCorners]) -> Vec<usize> {
    if walls.is_empty() {
        return Vec::new();
    }

    let mut order = Vec::with_capacity(walls.len());
    let mut remaining: Vec<usize> = (1..walls.len()).collect();
    let mut current = 0;
    order.push(current);

    while !remaining.is_empty() {
        let from = walls[current].bottom_right;
        let mut best_slot = 0;
        let mut best_distance = f64::INFINITY;
        for (slot, &candidate) in remaining.iter().enumerate() {
            let distance = (walls[candidate].bottom_left - from).norm();
            if distance < best_distance {
                best_distance = distance;
                best_slot = slot;
            }
        }
        current = remaining.remove(best_slot);
        order.push(current);
    }

    let closing_gap = (walls[order[0]].bottom_left - walls[current].bottom_right).norm();
    tracing::debug!(walls = walls.len(), closing_gap, "ordered wall loop");

    order
}

/// A wall rebuilt from the snapped corner loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedWall {
    /// Index of the authored wall this was built from.
    pub source: usize,
    /// Bottom-left floor corner.
    pub start: Point3<f64>,
    /// Bottom-right floor corner.
    pub end: Point3<f64>,
}

impl SnappedWall {
    /// Horizontal run direction (start → end).
    pub fn direction(&self) -> Vector3<f64> {
        let mut run = self.end - self.start;
        run.y = 0.0;
        run.try_normalize(MIN_WALL_WIDTH).unwrap_or_else(Vector3::x)
    }

    /// Horizontal distance between the two corners.
    pub fn width(&self) -> f64 {
        let mut run = self.end - self.start;
        run.y = 0.0;
        run.norm()
    }

    /// Inward-facing normal (right of the run direction seen from above).
    pub fn inward(&self) -> Vector3<f64> {
        self.direction().cross(&world_up())
    }

    /// Center-pivot transform of the wall quad: X along the run, Y up,
    /// Z facing into the room.
    pub fn transform(&self, height: f64) -> Transform {
        let up = world_up();
        let center = nalgebra::center(&self.start, &self.end) + up * (height / 2.0);
        Transform::from_frame(center, self.direction(), up, self.inward())
    }

    pub fn bounds(&self, height: f64) -> Bounds2 {
        Bounds2::centered(self.width(), height)
    }
}

/// Rebuilds the ordered walls so consecutive walls share an exact corner.
///
/// Each shared corner is the midpoint between the previous wall's
/// bottom-right and the next wall's bottom-left. A single wall keeps its
/// own corners.
pub fn snap_wall_loop(walls: &[WallCorners], order: &[usize]) -> Vec<SnappedWall> {
    let n = order.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        let wall = &walls[order[0]];
        return vec![SnappedWall {
            source: order[0],
            start: wall.bottom_left,
            end: wall.bottom_right,
        }];
    }

    let corners: Vec<Point3<f64>> = (0..n)
        .map(|k| {
            let previous = &walls[order[(k + n - 1) % n]];
            let current = &walls[order[k]];
            nalgebra::center(&previous.bottom_right, &current.bottom_left)
        })
        .collect();

    (0..n)
        .map(|k| SnappedWall {
            source: order[k],
            start: corners[k],
            end: corners[(k + 1) % n],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scene_lite_core::{Vec2, Vec3};

    /// Inward-facing wall between two floor corners, listed left → right.
    fn wall(id: &str, left: (f64, f64), right: (f64, f64), height: f64) -> WallPrimitive {
        let start = Point3::new(left.0, 0.0, left.1);
        let end = Point3::new(right.0, 0.0, right.1);
        let snapped = SnappedWall { source: 0, start, end };
        WallPrimitive {
            id: id.to_string(),
            label: "WALL_FACE".to_string(),
            transform: snapped.transform(height),
            size: Vec2::new(snapped.width(), height),
        }
    }

    /// 4 x 3 room; corners clockwise seen from above (+Y toward the viewer).
    fn square_room() -> Vec<WallPrimitive> {
        vec![
            wall("north", (0.0, 0.0), (4.0, 0.0), 2.5),
            wall("east", (4.0, 0.0), (4.0, 3.0), 2.5),
            wall("south", (4.0, 3.0), (0.0, 3.0), 2.5),
            wall("west", (0.0, 3.0), (0.0, 0.0), 2.5),
        ]
    }

    fn corners(walls: &[WallPrimitive]) -> Vec<WallCorners> {
        walls.iter().map(WallCorners::from_primitive).collect()
    }

    #[test]
    fn corners_of_authored_wall() {
        let c = WallCorners::from_primitive(&square_room()[0]);
        assert_relative_eq!(c.bottom_left, Point3::new(0.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(c.bottom_right, Point3::new(4.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(c.height, 2.5);
    }

    #[test]
    fn inward_normal_points_into_room() {
        let walls = square_room();
        // The north wall runs +X along z = 0; the room lies at z > 0.
        let normal = walls[0].transform.forward();
        assert_relative_eq!(normal, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn orders_shuffled_walls_into_loop() {
        let walls = square_room();
        let shuffled = vec![
            walls[0].clone(),
            walls[2].clone(),
            walls[3].clone(),
            walls[1].clone(),
        ];
        let order = order_walls(&corners(&shuffled));
        let ids: Vec<&str> = order.iter().map(|&i| shuffled[i].id.as_str()).collect();
        assert_eq!(ids, vec!["north", "east", "south", "west"]);
    }

    #[test]
    fn tie_goes_to_first_enumerated_wall() {
        // Two candidates whose bottom-left corners are exactly 1 m away.
        let walls = vec![
            wall("seed", (0.0, 0.0), (4.0, 0.0), 2.5),
            wall("a", (4.0, 1.0), (6.0, 1.0), 2.5),
            wall("b", (4.0, -1.0), (6.0, -1.0), 2.5),
        ];
        let order = order_walls(&corners(&walls));
        assert_eq!(order, vec![0, 1, 2]);

        let swapped = vec![walls[0].clone(), walls[2].clone(), walls[1].clone()];
        let order = order_walls(&corners(&swapped));
        assert_eq!(swapped[order[1]].id, "b");
    }

    #[test]
    fn snapping_closes_imprecise_corners() {
        let mut walls = square_room();
        // Nudge the east wall so its corners miss the neighbours by 4 cm.
        walls[1].transform.translation = Vec3::new(4.04, 1.25, 1.5);
        let c = corners(&walls);
        let order = order_walls(&c);
        let snapped = snap_wall_loop(&c, &order);

        assert_eq!(snapped.len(), 4);
        for k in 0..snapped.len() {
            let next = &snapped[(k + 1) % snapped.len()];
            assert_eq!(snapped[k].end, next.start);
        }
        assert_relative_eq!(snapped[0].end.x, 4.02, epsilon = 1e-9);
        assert_relative_eq!(snapped[1].width(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn snapped_transform_faces_inward() {
        let c = corners(&square_room());
        let snapped = snap_wall_loop(&c, &order_walls(&c));
        let east = snapped[1].transform(2.5);
        assert_relative_eq!(east.forward(), Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(east.translation.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(east.translation.y, 1.25, epsilon = 1e-9);
        assert_relative_eq!(east.translation.z, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn empty_and_single_wall() {
        assert!(order_walls(&[]).is_empty());
        assert!(snap_wall_loop(&[], &[]).is_empty());

        let c = corners(&square_room()[..1]);
        let snapped = snap_wall_loop(&c, &order_walls(&c));
        assert_eq!(snapped.len(), 1);
        assert_relative_eq!(snapped[0].width(), 4.0, epsilon = 1e-9);
    }
}
