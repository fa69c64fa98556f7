// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate-system tags and the conversion between them.
//!
//! The native system is right-handed, Y-up and measured in meters.
//! `ZUpCentimeters` swaps the Y and Z axes (which flips handedness) and
//! measures in centimeters:
//!
//! | quantity | native → external |
//! |---|---|
//! | position, volume bounds | `100 · (x, z, y)` |
//! | Euler rotation (degrees) | `-(x, z, y)` |
//! | scale | `(x, z, y)` |
//! | plane bounds | `100 · (u, v)` |
//! | boundary polygon | `100 · (u, v)`, order reversed |
//! | mesh positions | `100 · (x, z, y)`, triangle winding reversed |
//!
//! Every row is its own inverse up to the unit factor, so converting out
//! and back reproduces the native values to floating-point tolerance.
//! Identifiers are never touched.

use serde::{Deserialize, Serialize};

use crate::anchor::AnchorData;
use crate::primitives::{Transform, Vec2, Vec3};
use crate::snapshot::SceneSnapshot;

/// External units per native meter.
pub const UNITS_PER_METER: f64 = 100.0;

/// Coordinate system a snapshot is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Right-handed, Y-up, meters.
    #[default]
    Native,
    /// Z-up, centimeters, opposite handedness.
    ZUpCentimeters,
}

impl CoordinateSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Native => "Native",
            CoordinateSystem::ZUpCentimeters => "ZUpCentimeters",
        }
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        matches!(self, CoordinateSystem::Native)
    }
}

impl std::fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoordinateSystem {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(CoordinateSystem::Native),
            "zupcentimeters" | "zup-centimeters" | "zup" => Ok(CoordinateSystem::ZUpCentimeters),
            other => Err(crate::error::Error::UnknownCoordinateSystem(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    ToNative,
    FromNative,
}

impl Direction {
    #[inline]
    fn length(&self, v: f64) -> f64 {
        match self {
            Direction::ToNative => v / UNITS_PER_METER,
            Direction::FromNative => v * UNITS_PER_METER,
        }
    }

    #[inline]
    fn point(&self, p: Vec3) -> Vec3 {
        Vec3::new(self.length(p.x), self.length(p.z), self.length(p.y))
    }

    #[inline]
    fn point2(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.length(p.x), self.length(p.y))
    }
}

#[inline]
fn swap_yz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

fn convert_transform(t: &Transform, dir: Direction) -> Transform {
    let r = swap_yz(t.rotation);
    Transform {
        translation: dir.point(t.translation),
        rotation: Vec3::new(-r.x, -r.y, -r.z),
        scale: swap_yz(t.scale),
    }
}

fn convert_anchor(anchor: &mut AnchorData, dir: Direction) {
    anchor.transform = convert_transform(&anchor.transform, dir);

    if let Some(bounds) = anchor.plane_bounds.as_mut() {
        bounds.min = dir.point2(bounds.min);
        bounds.max = dir.point2(bounds.max);
    }
    if let Some(boundary) = anchor.plane_boundary.as_mut() {
        for p in boundary.iter_mut() {
            *p = dir.point2(*p);
        }
        boundary.reverse();
    }
    if let Some(bounds) = anchor.volume_bounds.as_mut() {
        bounds.min = dir.point(bounds.min);
        bounds.max = dir.point(bounds.max);
    }
    if let Some(mesh) = anchor.mesh.as_mut() {
        for chunk in mesh.positions.chunks_exact_mut(3) {
            let p = dir.point(Vec3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64));
            chunk[0] = p.x as f32;
            chunk[1] = p.y as f32;
            chunk[2] = p.z as f32;
        }
        mesh.flip_winding();
    }
}

/// Converts an anchor expressed in `from` into native coordinates in place.
pub fn anchor_to_native(anchor: &mut AnchorData, from: CoordinateSystem) {
    if !from.is_native() {
        convert_anchor(anchor, Direction::ToNative);
    }
}

/// Converts a native anchor into `to` coordinates in place.
pub fn anchor_from_native(anchor: &mut AnchorData, to: CoordinateSystem) {
    if !to.is_native() {
        convert_anchor(anchor, Direction::FromNative);
    }
}

impl SceneSnapshot {
    /// Re-expresses the snapshot in native coordinates. No-op if already native.
    pub fn into_native(mut self) -> Self {
        let from = self.coordinate_system;
        if !from.is_native() {
            for anchor in self.rooms.iter_mut().flat_map(|r| r.anchors.iter_mut()) {
                anchor_to_native(anchor, from);
            }
            self.coordinate_system = CoordinateSystem::Native;
        }
        self
    }

    /// Returns a copy of a native snapshot expressed in `target` coordinates.
    ///
    /// Non-native input is normalized first.
    pub fn to_coordinate_system(&self, target: CoordinateSystem) -> Self {
        let mut out = self.clone().into_native();
        if !target.is_native() {
            for anchor in out.rooms.iter_mut().flat_map(|r| r.anchors.iter_mut()) {
                anchor_from_native(anchor, target);
            }
            out.coordinate_system = target;
        }
        out
    }
}
