// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON entry points for snapshots.
//!
//! Reading normalizes to native coordinates; writing converts to the
//! requested system. The wire format uses PascalCase field names and
//! compact arrays for vectors.

use crate::coords::CoordinateSystem;
use crate::error::{Error, Result};
use crate::snapshot::SceneSnapshot;

impl SceneSnapshot {
    /// Parses a snapshot and converts it to native coordinates.
    ///
    /// Structural problems are logged as warnings rather than rejected;
    /// only unparseable JSON is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: SceneSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        let source = parsed.coordinate_system;
        let snapshot = parsed.into_native();
        let issues = snapshot.log_issues();
        tracing::debug!(
            coordinate_system = %source,
            rooms = snapshot.rooms.len(),
            anchors = snapshot.anchor_count(),
            issues,
            "parsed scene snapshot"
        );
        Ok(snapshot)
    }

    /// Serializes the snapshot expressed in `target` coordinates.
    pub fn to_json(&self, target: CoordinateSystem) -> Result<String> {
        let converted = self.to_coordinate_system(target);
        serde_json::to_string_pretty(&converted).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorData;
    use crate::labels;
    use crate::primitives::{Bounds2, Transform, Vec3};
    use crate::snapshot::RoomSnapshot;
    use approx::assert_relative_eq;

    const EXTERNAL: &str = r#"{
        "CoordinateSystem": "ZUpCentimeters",
        "Rooms": [{
            "UUID": "room-1",
            "RoomLayout": { "FloorUuid": "floor-1", "WallsUuid": [] },
            "Anchors": [{
                "UUID": "floor-1",
                "SemanticClassifications": ["FLOOR"],
                "Transform": {
                    "Translation": [100.0, 200.0, 0.0],
                    "Rotation": [-90.0, 0.0, 0.0],
                    "Scale": [1.0, 1.0, 1.0]
                },
                "PlaneBounds": { "Min": [-150.0, -100.0], "Max": [150.0, 100.0] },
                "PlaneBoundary2D": [[-150.0, 100.0], [150.0, 100.0], [150.0, -100.0], [-150.0, -100.0]]
            }]
        }]
    }"#;

    fn sample() -> SceneSnapshot {
        let mut room = RoomSnapshot::new("room-1");
        room.anchors.push(
            AnchorData::new("floor-1")
                .with_label(labels::FLOOR)
                .with_transform(Transform::new(
                    Vec3::new(1.0, 0.0, 2.0),
                    Vec3::new(90.0, 0.0, 0.0),
                    Vec3::ONE,
                ))
                .with_plane(Bounds2::centered(3.0, 2.0)),
        );
        room.layout.floor = Some("floor-1".into());
        SceneSnapshot::with_rooms(vec![room])
    }

    #[test]
    fn from_json_normalizes_to_native() {
        let snapshot = SceneSnapshot::from_json(EXTERNAL).unwrap();
        assert_eq!(snapshot.coordinate_system, CoordinateSystem::Native);

        let floor = &snapshot.rooms[0].anchors[0];
        assert_eq!(floor.id, "floor-1");
        assert_relative_eq!(floor.transform.translation.x, 1.0);
        assert_relative_eq!(floor.transform.translation.y, 0.0);
        assert_relative_eq!(floor.transform.translation.z, 2.0);
        assert_eq!(floor.transform.rotation, Vec3::new(90.0, 0.0, 0.0));
        assert_eq!(snapshot, sample());
    }

    #[test]
    fn round_trip_through_both_systems() {
        let original = sample();
        for system in [CoordinateSystem::Native, CoordinateSystem::ZUpCentimeters] {
            let json = original.to_json(system).unwrap();
            let back = SceneSnapshot::from_json(&json).unwrap();
            assert_eq!(back, original, "round trip through {system}");
        }
    }

    #[test]
    fn identifiers_survive_conversion() {
        let json = sample().to_json(CoordinateSystem::ZUpCentimeters).unwrap();
        assert!(json.contains("\"floor-1\""));
        assert!(json.contains("\"room-1\""));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = SceneSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn missing_fields_default() {
        let snapshot = SceneSnapshot::from_json("{}").unwrap();
        assert!(snapshot.rooms.is_empty());
        assert!(snapshot.coordinate_system.is_native());
    }
}
