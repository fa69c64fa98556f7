// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Anchor description: one labeled physical surface or volume.

use approx::relative_eq;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::mesh::TriangleMesh;
use crate::primitives::{Bounds2, Bounds3, Transform, Vec2, Vec3};

/// Ordered semantic labels. The first entry is the primary label.
pub type Labels = SmallVec<[String; 2]>;

/// Geometry and labels of a single anchor.
///
/// `PartialEq` is exact and structural over every field, including the
/// identifier; [`AnchorData::same_content`] tolerates conversion noise.
/// Plane geometry lives in the anchor's local XY plane (normal along local
/// Z); volume geometry is a local box with its apex at `max.z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorData {
    #[serde(rename = "UUID")]
    pub id: String,
    #[serde(rename = "SemanticClassifications", default)]
    pub labels: Labels,
    #[serde(rename = "Transform", default)]
    pub transform: Transform,
    #[serde(rename = "PlaneBounds", default, skip_serializing_if = "Option::is_none")]
    pub plane_bounds: Option<Bounds2>,
    #[serde(rename = "PlaneBoundary2D", default, skip_serializing_if = "Option::is_none")]
    pub plane_boundary: Option<Vec<Vec2>>,
    #[serde(rename = "VolumeBounds", default, skip_serializing_if = "Option::is_none")]
    pub volume_bounds: Option<Bounds3>,
    #[serde(rename = "GlobalMesh", default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<TriangleMesh>,
}

impl AnchorData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Labels::new(),
            transform: Transform::default(),
            plane_bounds: None,
            plane_boundary: None,
            volume_bounds: None,
            mesh: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets a rectangular plane and its matching four-point boundary.
    pub fn with_plane(mut self, bounds: Bounds2) -> Self {
        self.plane_boundary = Some(bounds.corners().to_vec());
        self.plane_bounds = Some(bounds);
        self
    }

    pub fn with_boundary(mut self, boundary: Vec<Vec2>) -> Self {
        self.plane_boundary = Some(boundary);
        self
    }

    pub fn with_volume(mut self, bounds: Bounds3) -> Self {
        self.volume_bounds = Some(bounds);
        self
    }

    pub fn with_mesh(mut self, mesh: TriangleMesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// The first label, used for display.
    pub fn primary_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    #[inline]
    pub fn is_plane(&self) -> bool {
        self.plane_bounds.is_some()
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.volume_bounds.is_some()
    }

    /// Plane outline in local space: the boundary polygon if present,
    /// otherwise the bounds rectangle.
    pub fn plane_outline(&self) -> Option<Vec<Vec2>> {
        match (&self.plane_boundary, &self.plane_bounds) {
            (Some(boundary), _) if !boundary.is_empty() => Some(boundary.clone()),
            (_, Some(bounds)) => Some(bounds.corners().to_vec()),
            _ => None,
        }
    }

    /// Plane outline mapped into world space.
    pub fn world_outline(&self) -> Option<Vec<Vec3>> {
        let outline = self.plane_outline()?;
        let matrix = self.transform.matrix();
        Some(
            outline
                .iter()
                .map(|p| Vec3::from_point(&matrix.transform_point(&Point3::new(p.x, p.y, 0.0))))
                .collect(),
        )
    }

    /// World-space axis-aligned bounds of every piece of geometry the anchor
    /// carries. Anchors without geometry report their position only.
    pub fn world_bounds(&self) -> Bounds3 {
        let matrix = self.transform.matrix();
        let mut local: Vec<Vec3> = Vec::new();
        if let Some(outline) = self.plane_outline() {
            local.extend(outline.iter().map(|p| Vec3::new(p.x, p.y, 0.0)));
        }
        if let Some(volume) = &self.volume_bounds {
            local.extend(volume.corners());
        }
        if let Some(mesh) = &self.mesh {
            if let Some(b) = mesh.bounds() {
                local.extend(b.corners());
            }
        }
        Bounds3::from_points(
            local
                .iter()
                .map(|p| Vec3::from_point(&matrix.transform_point(&p.to_point()))),
        )
        .unwrap_or_else(|| Bounds3::new(self.transform.translation, self.transform.translation))
    }

    /// True if every float the anchor carries is finite.
    pub fn is_finite(&self) -> bool {
        self.transform.is_finite()
            && self.plane_bounds.iter().all(|b| b.min.is_finite() && b.max.is_finite())
            && self.plane_boundary.iter().flatten().all(Vec2::is_finite)
            && self.volume_bounds.iter().all(|b| b.min.is_finite() && b.max.is_finite())
            && self.mesh.iter().flat_map(|m| &m.positions).all(|v| v.is_finite())
    }

    /// Equality up to coordinate-conversion noise.
    ///
    /// Identifiers, labels, mesh indices and which optional parts are present
    /// compare exactly; every float compares within [`LENGTH_TOLERANCE`]
    /// (mesh positions within [`MESH_TOLERANCE`]). Non-finite values never
    /// compare equal.
    pub fn same_content(&self, other: &AnchorData) -> bool {
        self.id == other.id
            && self.labels == other.labels
            && same_transform(&self.transform, &other.transform)
            && both(&self.plane_bounds, &other.plane_bounds, |a, b| {
                close2(&a.min, &b.min) && close2(&a.max, &b.max)
            })
            && both(&self.plane_boundary, &other.plane_boundary, |a, b| {
                a.len() == b.len() && a.iter().zip(b).all(|(p, q)| close2(p, q))
            })
            && both(&self.volume_bounds, &other.volume_bounds, |a, b| {
                close3(&a.min, &b.min) && close3(&a.max, &b.max)
            })
            && both(&self.mesh, &other.mesh, same_mesh)
    }
}

/// Tolerance for lengths, angles and scales, used both as absolute and
/// relative bound.
pub const LENGTH_TOLERANCE: f64 = 1e-9;

/// Tolerance for `f32` mesh positions.
pub const MESH_TOLERANCE: f32 = 1e-5;

fn both<T>(a: &Option<T>, b: &Option<T>, eq: impl Fn(&T, &T) -> bool) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[inline]
fn close2(a: &Vec2, b: &Vec2) -> bool {
    relative_eq!(*a, *b, epsilon = LENGTH_TOLERANCE, max_relative = LENGTH_TOLERANCE)
}

#[inline]
fn close3(a: &Vec3, b: &Vec3) -> bool {
    relative_eq!(*a, *b, epsilon = LENGTH_TOLERANCE, max_relative = LENGTH_TOLERANCE)
}

fn same_transform(a: &Transform, b: &Transform) -> bool {
    close3(&a.translation, &b.translation)
        && close3(&a.rotation, &b.rotation)
        && close3(&a.scale, &b.scale)
}

fn same_mesh(a: &TriangleMesh, b: &TriangleMesh) -> bool {
    a.indices == b.indices
        && a.positions.len() == b.positions.len()
        && a.positions.iter().zip(&b.positions).all(|(p, q)| {
            relative_eq!(*p, *q, epsilon = MESH_TOLERANCE, max_relative = MESH_TOLERANCE)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels;
    use approx::assert_relative_eq;

    #[test]
    fn equality_is_structural() {
        let a = AnchorData::new("a").with_label(labels::TABLE).with_plane(Bounds2::centered(1.0, 1.0));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.plane_boundary.as_mut().unwrap()[0] = Vec2::new(-0.6, -0.5);
        assert_ne!(a, b);

        let mut c = a.clone();
        c.labels.push(labels::OTHER.to_string());
        assert_ne!(a, c);
    }

    #[test]
    fn label_order_matters() {
        let a = AnchorData::new("a").with_label("X").with_label("Y");
        let b = AnchorData::new("a").with_label("Y").with_label("X");
        assert_ne!(a, b);
        assert_eq!(a.primary_label(), Some("X"));
    }

    #[test]
    fn world_bounds_of_translated_volume() {
        let a = AnchorData::new("v")
            .with_transform(Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)))
            .with_volume(Bounds3::new(Vec3::new(-0.5, -0.5, -1.0), Vec3::new(0.5, 0.5, 0.0)));
        let b = a.world_bounds();
        assert_relative_eq!(b.min.x, 0.5);
        assert_relative_eq!(b.max.y, 2.5);
        assert_relative_eq!(b.min.z, 2.0);
        assert_relative_eq!(b.max.z, 3.0);
    }

    #[test]
    fn outline_falls_back_to_bounds() {
        let mut a = AnchorData::new("p").with_plane(Bounds2::centered(2.0, 2.0));
        a.plane_boundary = None;
        assert_eq!(a.plane_outline().unwrap().len(), 4);
        assert!(AnchorData::new("none").plane_outline().is_none());
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let a: AnchorData = serde_json::from_str(r#"{"UUID":"x"}"#).unwrap();
        assert_eq!(a, AnchorData::new("x"));
    }

    fn meshed() -> AnchorData {
        let mut mesh = TriangleMesh::new();
        mesh.add_vertex(0.1, 0.2, 0.3);
        mesh.add_vertex(1.7, 0.0, 0.0);
        mesh.add_vertex(0.0, 0.0, 2.9);
        mesh.add_triangle(0, 1, 2);
        AnchorData::new("m")
            .with_label(labels::GLOBAL_MESH)
            .with_transform(Transform::from_translation(Vec3::new(0.3, 1.1, -2.7)))
            .with_mesh(mesh)
    }

    #[test]
    fn same_content_tolerates_rounding() {
        let a = meshed();
        let mut b = a.clone();
        b.transform.translation.x += 1e-15;
        b.mesh.as_mut().unwrap().positions[0] = 0.1 + f32::EPSILON;
        assert_ne!(a, b);
        assert!(a.same_content(&b));
    }

    #[test]
    fn same_content_sees_real_changes() {
        let a = meshed();

        let mut moved = a.clone();
        moved.transform.translation.y += 1e-3;
        assert!(!a.same_content(&moved));

        let mut rewound = a.clone();
        rewound.mesh.as_mut().unwrap().flip_winding();
        assert!(!a.same_content(&rewound));

        let relabeled = a.clone().with_label(labels::OTHER);
        assert!(!a.same_content(&relabeled));

        let planed = a.clone().with_plane(Bounds2::centered(1.0, 1.0));
        assert!(!a.same_content(&planed));
    }

    #[test]
    fn non_finite_is_never_the_same() {
        let mut a = meshed();
        a.transform.rotation.y = f64::NAN;
        assert!(!a.is_finite());
        assert!(!a.same_content(&a.clone()));
    }
}
