// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture primitives → anchors.
//!
//! Authored volumes pivot at their center with Y up. Anchors pivot at the
//! top face with Z up, so the pivot moves up by half the height and the
//! frame turns -90° about its local X axis.

use nalgebra::{Rotation3, Vector3};
use scene_lite_core::{AnchorData, Bounds2, Bounds3, Labels, Transform, Vec3};

use crate::authored::{PlanePrimitive, VolumePrimitive};

/// Re-pivots a center/Y-up volume transform to top/Z-up.
///
/// `height` is the scaled height of the volume. The result is unscaled:
/// authored scale is folded into the anchor extents instead, since the
/// frame turn swaps the local Y and Z axes.
pub fn top_pivot_transform(transform: &Transform, height: f64) -> Transform {
    let rotation = transform.rotation_matrix();
    let top = transform.translation.to_point() + rotation * Vector3::y() * (height / 2.0);
    let turned = rotation * Rotation3::from_axis_angle(&Vector3::x_axis(), -std::f64::consts::FRAC_PI_2);
    Transform::from_rotation(top, &turned)
}

/// Local box of a top-pivot volume: apex at z = 0, extending down by `height`.
pub fn top_pivot_bounds(size: Vec3) -> Bounds3 {
    Bounds3::new(
        Vec3::new(-size.x / 2.0, -size.z / 2.0, -size.y),
        Vec3::new(size.x / 2.0, size.z / 2.0, 0.0),
    )
}

pub fn volume_anchor(volume: &VolumePrimitive) -> AnchorData {
    let scale = volume.transform.scale;
    let size = Vec3::new(
        volume.size.x * scale.x,
        volume.size.y * scale.y,
        volume.size.z * scale.z,
    );
    let mut anchor = AnchorData::new(volume.id.clone())
        .with_transform(top_pivot_transform(&volume.transform, size.y))
        .with_volume(top_pivot_bounds(size));
    anchor.labels = volume.labels.iter().cloned().collect::<Labels>();
    anchor
}

/// Plane anchor with the authored scale folded into its rectangle.
pub fn plane_anchor(plane: &PlanePrimitive) -> AnchorData {
    let mut transform = plane.transform;
    let scale = std::mem::replace(&mut transform.scale, Vec3::ONE);
    let mut anchor = AnchorData::new(plane.id.clone())
        .with_transform(transform)
        .with_plane(Bounds2::centered(plane.size.x * scale.x, plane.size.y * scale.y));
    anchor.labels = plane.labels.iter().cloned().collect::<Labels>();
    anchor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scene_lite_core::{labels, Vec2};

    fn table() -> VolumePrimitive {
        VolumePrimitive {
            id: "table".to_string(),
            labels: vec![labels::TABLE.to_string()],
            transform: Transform::new(
                Vec3::new(1.0, 0.4, 2.0),
                Vec3::new(0.0, 30.0, 0.0),
                Vec3::ONE,
            ),
            size: Vec3::new(1.2, 0.8, 0.6),
        }
    }

    #[test]
    fn pivot_moves_to_top_face() {
        let anchor = volume_anchor(&table());
        let t = anchor.transform;
        assert_relative_eq!(t.translation.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(t.translation.y, 0.8, epsilon = 1e-12);
        assert_relative_eq!(t.translation.z, 2.0, epsilon = 1e-12);
        // Local Z is now world up.
        assert_relative_eq!(t.forward(), Vector3::y(), epsilon = 1e-9);
    }

    #[test]
    fn bounds_hang_below_apex() {
        let anchor = volume_anchor(&table());
        let b = anchor.volume_bounds.unwrap();
        assert_relative_eq!(b.max.z, 0.0);
        assert_relative_eq!(b.min.z, -0.8);
        assert_relative_eq!(b.size().x, 1.2);
        assert_relative_eq!(b.size().y, 0.6);

        // The world-space box sits on the floor.
        let world = anchor.world_bounds();
        assert_relative_eq!(world.min.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(world.max.y, 0.8, epsilon = 1e-9);
        assert_eq!(anchor.primary_label(), Some(labels::TABLE));
    }

    #[test]
    fn scale_is_folded_into_volume_extents() {
        let mut stretched = table();
        stretched.transform.scale = Vec3::new(2.0, 1.5, 0.5);
        let anchor = volume_anchor(&stretched);

        assert_eq!(anchor.transform.scale, Vec3::ONE);
        let size = anchor.volume_bounds.unwrap().size();
        assert_relative_eq!(size.x, 2.4, epsilon = 1e-12);
        // Local Y spans the authored depth, local Z the authored height.
        assert_relative_eq!(size.y, 0.3, epsilon = 1e-12);
        assert_relative_eq!(size.z, 1.2, epsilon = 1e-12);

        // Scaled height still rests on the floor.
        assert_relative_eq!(anchor.transform.translation.y, 1.0, epsilon = 1e-12);
        let world = anchor.world_bounds();
        assert_relative_eq!(world.min.y, -0.2, epsilon = 1e-9);
        assert_relative_eq!(world.max.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn plane_primitive_becomes_rectangle() {
        let plane = PlanePrimitive {
            id: "screen".to_string(),
            labels: vec![labels::SCREEN.to_string()],
            transform: Transform::new(Vec3::new(0.0, 1.5, 0.1), Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0)),
            size: Vec2::new(1.6, 0.9),
        };
        let anchor = plane_anchor(&plane);
        assert_eq!(anchor.transform.scale, Vec3::ONE);
        let size = anchor.plane_bounds.unwrap().size();
        assert_relative_eq!(size.x, 3.2);
        assert_relative_eq!(size.y, 1.8);
        assert_eq!(anchor.plane_boundary.as_ref().map(Vec::len), Some(4));
        assert!(anchor.volume_bounds.is_none());
    }
}
