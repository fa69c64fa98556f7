// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Scene-Lite Core
//!
//! Value types describing a captured room scene.
//!
//! ## Overview
//!
//! - **Geometry primitives**: [`Vec2`], [`Vec3`], [`Bounds2`], [`Bounds3`],
//!   [`Transform`] and [`TriangleMesh`]
//! - **Snapshot model**: [`SceneSnapshot`] → [`RoomSnapshot`] → [`AnchorData`],
//!   with a [`RoomLayout`] cross-referencing the room shell
//! - **Coordinate systems**: lossless conversion between the native
//!   meters/Y-up space and the external centimeters/Z-up space
//! - **JSON**: [`SceneSnapshot::from_json`] / [`SceneSnapshot::to_json`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scene_lite_core::{CoordinateSystem, SceneSnapshot};
//!
//! let snapshot = SceneSnapshot::from_json(&std::fs::read_to_string("scene.json")?)?;
//! for room in &snapshot.rooms {
//!     println!("{}: {} anchors", room.id, room.anchors.len());
//! }
//! let out = snapshot.to_json(CoordinateSystem::ZUpCentimeters)?;
//! ```

pub mod anchor;
pub mod coords;
pub mod error;
pub mod labels;
pub mod mesh;
pub mod primitives;
pub mod serialization;
pub mod snapshot;

pub use anchor::{AnchorData, Labels, LENGTH_TOLERANCE, MESH_TOLERANCE};
pub use coords::{anchor_from_native, anchor_to_native, CoordinateSystem, UNITS_PER_METER};
pub use error::{Error, Result};
pub use mesh::TriangleMesh;
pub use primitives::{Bounds2, Bounds3, Transform, Vec2, Vec3};
pub use snapshot::{RoomLayout, RoomSnapshot, SceneSnapshot, SnapshotIssue};
