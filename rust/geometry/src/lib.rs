// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene-Lite Geometry
//!
//! Turns authored room primitives into native scene snapshots: walls are
//! ordered into a loop and snapped, floor and ceiling are synthesized from
//! the wall footprint, and furniture volumes are re-pivoted to their top
//! face.

pub mod authored;
pub mod builder;
pub mod error;
pub mod footprint;
pub mod volumes;
pub mod walls;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use authored::{AuthoredRoom, AuthoredScene, PlanePrimitive, VolumePrimitive, WallPrimitive};
pub use builder::{build_room, build_scene, generated_anchor_id};
pub use error::{Error, Result};
pub use footprint::{Footprint, FootprintPlane};
pub use volumes::{plane_anchor, top_pivot_bounds, top_pivot_transform, volume_anchor};
pub use walls::{order_walls, snap_wall_loop, SnappedWall, WallCorners};
