// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room footprint derived from a snapped wall loop.
//!
//! The longest wall defines the footprint frame: its run direction is the
//! footprint X axis and its inward normal the footprint depth axis. Floor
//! and ceiling planes are centered on the extents of the wall corners in
//! that frame, so a rectangular room gets a tight, axis-aligned floor.

use nalgebra::{Point3, Vector3};
use scene_lite_core::{Bounds2, Transform, Vec2};

use crate::walls::{world_up, SnappedWall};

/// Extents of the wall corners in the longest wall's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Start corner of the longest wall.
    pub origin: Point3<f64>,
    /// Run direction of the longest wall.
    pub x_axis: Vector3<f64>,
    /// Inward normal of the longest wall.
    pub depth_axis: Vector3<f64>,
    pub min: Vec2,
    pub max: Vec2,
    /// Corners as (along, depth) coordinates, in loop order.
    pub corners: Vec<Vec2>,
}

impl Footprint {
    /// Builds the footprint of a wall loop. Returns `None` for an empty loop.
    pub fn from_walls(walls: &[SnappedWall]) -> Option<Self> {
        let longest = longest_wall(walls)?;
        let origin = longest.start;
        let x_axis = longest.direction();
        let depth_axis = longest.inward();

        let corners: Vec<Vec2> = walls
            .iter()
            .map(|w| {
                let offset = w.start - origin;
                Vec2::new(offset.dot(&x_axis), offset.dot(&depth_axis))
            })
            .collect();
        let extents = Bounds2::from_points(&corners)?;

        Some(Self {
            origin,
            x_axis,
            depth_axis,
            min: extents.min,
            max: extents.max,
            corners,
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center of the footprint at floor level.
    pub fn center(&self) -> Point3<f64> {
        let mid_x = (self.min.x + self.max.x) / 2.0;
        let mid_depth = (self.min.y + self.max.y) / 2.0;
        self.origin + self.x_axis * mid_x + self.depth_axis * mid_depth
    }

    fn centered_corner(&self, c: &Vec2) -> Vec2 {
        Vec2::new(
            c.x - (self.min.x + self.max.x) / 2.0,
            c.y - (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Floor plane facing up. Local frame: X along the longest wall, Z up.
    /// The boundary follows the wall loop order.
    pub fn floor(&self) -> FootprintPlane {
        let up = world_up();
        let y_axis = up.cross(&self.x_axis);
        FootprintPlane {
            transform: Transform::from_frame(self.center(), self.x_axis, y_axis, up),
            bounds: Bounds2::centered(self.width(), self.depth()),
            boundary: self
                .corners
                .iter()
                .map(|c| {
                    let local = self.centered_corner(c);
                    Vec2::new(local.x, -local.y)
                })
                .collect(),
        }
    }

    /// Ceiling plane facing down, `height` above the floor. The boundary is
    /// wound in reverse relative to the floor.
    pub fn ceiling(&self, height: f64) -> FootprintPlane {
        let down = -world_up();
        let y_axis = down.cross(&self.x_axis);
        let center = self.center() + world_up() * height;
        FootprintPlane {
            transform: Transform::from_frame(center, self.x_axis, y_axis, down),
            bounds: Bounds2::centered(self.width(), self.depth()),
            boundary: self
                .corners
                .iter()
                .rev()
                .map(|c| self.centered_corner(c))
                .collect(),
        }
    }
}

/// Geometry of a synthesized floor or ceiling anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintPlane {
    pub transform: Transform,
    pub bounds: Bounds2,
    pub boundary: Vec<Vec2>,
}

/// The widest wall; the first one wins a tie.
pub fn longest_wall(walls: &[SnappedWall]) -> Option<&SnappedWall> {
    walls
        .iter()
        .reduce(|best, wall| if wall.width() > best.width() { wall } else { best })
}
