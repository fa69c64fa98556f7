// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain geometry value types shared by snapshots, the builder and the graph.
//!
//! These types are deliberately dumb: they carry data, compare structurally
//! and convert to nalgebra when math is needed. On the wire vectors are
//! compact arrays (`[x, y, z]`).

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// A 2D point or extent (simplified for serialization).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Vec2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

/// A 3D point, direction or extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };

    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn from_point(p: &Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Axis-aligned rectangle in an anchor's local plane space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of the given size centered on the origin.
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            min: Vec2::new(-width / 2.0, -height / 2.0),
            max: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Corners in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Smallest rectangle containing every point, or `None` for an empty input.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(*first, *first);
        for p in &points[1..] {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }
}

/// Axis-aligned box in an anchor's local volume space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: Vec3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Rigid transform with scale: translation, Euler rotation in degrees, scale.
///
/// The rotation follows nalgebra's `from_euler_angles(x, y, z)` convention,
/// i.e. `R = Rz · Ry · Rx`. Points are mapped as `T · R · S · p`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Builds a transform from an origin and an orthonormal basis.
    ///
    /// The basis columns are the world-space directions of the local X, Y
    /// and Z axes. They must form a right-handed orthonormal frame.
    pub fn from_frame(
        origin: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        z_axis: Vector3<f64>,
    ) -> Self {
        let rotation = Rotation3::from_basis_unchecked(&[x_axis, y_axis, z_axis]);
        Self::from_rotation(origin, &rotation)
    }

    pub fn from_rotation(origin: Point3<f64>, rotation: &Rotation3<f64>) -> Self {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Self {
            translation: Vec3::from_point(&origin),
            rotation: Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()),
            scale: Vec3::ONE,
        }
    }

    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// 4x4 matrix mapping local coordinates to world coordinates.
    pub fn matrix(&self) -> Matrix4<f64> {
        let scale = Matrix4::new_nonuniform_scaling(&self.scale.to_vector());
        let rotation = self.rotation_matrix().to_homogeneous();
        let translation = Matrix4::new_translation(&self.translation.to_vector());
        translation * rotation * scale
    }

    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        Vec3::from_point(&self.matrix().transform_point(&local.to_point()))
    }

    /// World-space direction of the local X axis.
    pub fn right(&self) -> Vector3<f64> {
        self.rotation_matrix() * Vector3::x()
    }

    /// World-space direction of the local Y axis.
    pub fn up(&self) -> Vector3<f64> {
        self.rotation_matrix() * Vector3::y()
    }

    /// World-space direction of the local Z axis.
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation_matrix() * Vector3::z()
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl AbsDiffEq for Vec2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Vec2 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vec3_serializes_as_array() {
        let json = serde_json::to_string(&Vec3::new(1.0, 2.5, -3.0)).unwrap();
        assert_eq!(json, "[1.0,2.5,-3.0]");
        let back: Vec3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Vec3::new(1.0, 2.5, -3.0));
    }

    #[test]
    fn bounds2_corners_are_counter_clockwise() {
        let b = Bounds2::centered(2.0, 4.0);
        let c = b.corners();
        assert_eq!(c[0], Vec2::new(-1.0, -2.0));
        assert_eq!(c[1], Vec2::new(1.0, -2.0));
        assert_eq!(c[2], Vec2::new(1.0, 2.0));
        assert_eq!(c[3], Vec2::new(-1.0, 2.0));
        assert_eq!(b.size(), Vec2::new(2.0, 4.0));
    }

    #[test]
    fn bounds3_from_points_and_contains() {
        let b = Bounds3::from_points([
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(-1.0, 3.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 2.0));
        assert!(b.contains(Vec3::new(0.0, 1.0, 1.0)));
        assert!(!b.contains(Vec3::new(0.0, 4.0, 1.0)));
        assert!(Bounds3::from_points(Vec::new()).is_none());
    }

    #[test]
    fn transform_applies_scale_rotation_translation() {
        let t = Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 90.0, 0.0),
            Vec3::new(2.0, 1.0, 1.0),
        );
        // (1,0,0) scaled to (2,0,0), rotated 90° about Y to (0,0,-2)
        let p = t.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(p.z, -2.0, epsilon = 1e-10);
    }

    #[test]
    fn from_frame_recovers_axes() {
        let x = Vector3::new(0.0, 0.0, -1.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        let t = Transform::from_frame(Point3::new(1.0, 2.0, 3.0), x, y, z);
        assert_relative_eq!(t.right(), x, epsilon = 1e-10);
        assert_relative_eq!(t.up(), y, epsilon = 1e-10);
        assert_relative_eq!(t.forward(), z, epsilon = 1e-10);
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
    }
}
