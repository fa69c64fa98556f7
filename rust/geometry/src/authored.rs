// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authored (static) scene description.
//!
//! Authored scenes come from hand-placed primitives rather than live
//! capture. Walls arrive unordered with possibly imprecise corners;
//! volumes use a center pivot with Y up.

use scene_lite_core::{labels, Transform, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A wall quad. Local X runs along the width, local Y is up and local Z
/// faces into the room. `transform` places the wall's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WallPrimitive {
    pub id: String,
    #[serde(default = "default_wall_label")]
    pub label: String,
    pub transform: Transform,
    /// Width and height.
    pub size: Vec2,
}

fn default_wall_label() -> String {
    labels::WALL_FACE.to_string()
}

/// A furniture box with a center pivot and Y up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumePrimitive {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub transform: Transform,
    /// Width (X), height (Y) and depth (Z).
    pub size: Vec3,
}

/// A free-standing plane (table top, screen, wall art).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlanePrimitive {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub transform: Transform,
    /// Width and height in the plane's local XY.
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthoredRoom {
    pub id: String,
    #[serde(default)]
    pub walls: Vec<WallPrimitive>,
    #[serde(default)]
    pub volumes: Vec<VolumePrimitive>,
    #[serde(default)]
    pub planes: Vec<PlanePrimitive>,
}

impl AuthoredRoom {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            walls: Vec::new(),
            volumes: Vec::new(),
            planes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthoredScene {
    #[serde(default)]
    pub rooms: Vec<AuthoredRoom>,
}

impl AuthoredScene {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_authored_scene() {
        let json = r#"{
            "Rooms": [{
                "Id": "living",
                "Walls": [{
                    "Id": "w0",
                    "Transform": { "Translation": [0, 1.25, 2], "Rotation": [0, 180, 0], "Scale": [1, 1, 1] },
                    "Size": [4.0, 2.5]
                }],
                "Volumes": [{
                    "Id": "table",
                    "Labels": ["TABLE"],
                    "Transform": { "Translation": [0, 0.4, 0], "Rotation": [0, 0, 0], "Scale": [1, 1, 1] },
                    "Size": [1.2, 0.8, 0.6]
                }]
            }]
        }"#;
        let scene = AuthoredScene::from_json(json).unwrap();
        let room = &scene.rooms[0];
        assert_eq!(room.id, "living");
        assert_eq!(room.walls[0].label, labels::WALL_FACE);
        assert_eq!(room.walls[0].size, Vec2::new(4.0, 2.5));
        assert_eq!(room.volumes[0].labels, vec!["TABLE".to_string()]);
        assert!(room.planes.is_empty());
    }

    #[test]
    fn malformed_authored_scene_is_an_error() {
        assert!(matches!(
            AuthoredScene::from_json(r#"{"Rooms": 3}"#),
            Err(Error::Serialization(_))
        ));
    }
}
