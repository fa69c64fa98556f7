// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end session flows: external JSON in, events out, JSON back.

use approx::assert_relative_eq;
use scene_lite_core::{CoordinateSystem, SceneSnapshot};
use scene_lite_graph::{EventKind, SceneEvent};
use scene_lite_processing::{Config, Error, SceneSession};
use std::cell::RefCell;
use std::rc::Rc;

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

const AUTHORED: &str = r#"{
    "Rooms": [{
        "Id": "office",
        "Volumes": [{
            "Id": "desk",
            "Labels": ["TABLE"],
            "Transform": { "Translation": [1, 0.75, 1], "Rotation": [0, 0, 0], "Scale": [1, 1, 1] },
            "Size": [1.4, 0.75, 0.7]
        }]
    }]
}"#;

fn session_with(vars: &[(&'static str, &'static str)]) -> SceneSession {
    let vars = vars.to_vec();
    SceneSession::new(Config::from_lookup(move |key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }))
}

fn recorder(session: &mut SceneSession) -> Rc<RefCell<Vec<EventKind>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    session.subscribe(move |e: &SceneEvent| sink.borrow_mut().push(e.kind()));
    seen
}

#[test]
fn external_json_is_stored_natively() {
    let mut session = session_with(&[]);
    let seen = recorder(&mut session);

    let summary = session.apply_json(EXTERNAL).unwrap();
    assert_eq!(summary.rooms_created, 1);
    assert_eq!(
        *seen.borrow(),
        vec![EventKind::AnchorCreated, EventKind::RoomCreated]
    );

    let key = session.graph().room_key("room-1").unwrap();
    let (_, floor) = session.graph().floor(key).unwrap();
    assert_relative_eq!(floor.data.transform.translation.x, 1.0);
    assert_relative_eq!(floor.data.transform.translation.y, 0.0);
    assert_relative_eq!(floor.data.transform.translation.z, 2.0);
}

#[test]
fn export_uses_configured_coordinates() {
    let mut session = session_with(&[("SCENE_LITE_OUTPUT_COORDS", "zup")]);
    session.apply_json(EXTERNAL).unwrap();

    let json = session.export_json().unwrap();
    assert!(json.contains("ZUpCentimeters"));
    assert!(json.contains("\"floor-1\""));

    let native = session.export_json_as(CoordinateSystem::Native).unwrap();
    let parsed = SceneSnapshot::from_json(&native).unwrap();
    assert_eq!(parsed, session.export_snapshot());
}

#[test]
fn reapplying_exported_scene_is_quiet() {
    let mut session = session_with(&[("SCENE_LITE_OUTPUT_COORDS", "zup")]);
    session.apply_json(EXTERNAL).unwrap();
    let exported = session.export_json().unwrap();

    let seen = recorder(&mut session);
    let summary = session.apply_json(&exported).unwrap();
    assert!(summary.is_empty(), "{summary}");
    assert_eq!(summary.rooms_unchanged, 1);
    assert!(seen.borrow().is_empty());
    assert_eq!(session.graph().room_count(), 1);
}

#[test]
fn authored_scene_flow() {
    let mut session = session_with(&[]);
    let summary = session.apply_authored_json(AUTHORED).unwrap();
    assert_eq!(summary.rooms_created, 1);
    assert_eq!(summary.anchors_created, 1);

    let key = session.graph().room_key("office").unwrap();
    let (_, desk) = session.graph().anchor_by_id(key, "desk").unwrap();
    assert!(desk.data.is_volume());

    let summary = session.apply_authored_json(AUTHORED).unwrap();
    assert!(summary.is_empty());
    assert_eq!(session.pass_count(), 2);
}

#[test]
fn invalid_json_leaves_graph_untouched() {
    let mut session = session_with(&[]);
    session.apply_json(EXTERNAL).unwrap();

    assert!(matches!(
        session.apply_json("{ nope"),
        Err(Error::Snapshot(_))
    ));
    assert!(matches!(
        session.apply_authored_json(r#"{"Rooms": 3}"#),
        Err(Error::Authored(_))
    ));
    assert_eq!(session.graph().room_count(), 1);
    assert_eq!(session.pass_count(), 1);
}

#[test]
fn loads_snapshot_from_file() {
    let path = std::env::temp_dir().join(format!("scene-lite-{}.json", std::process::id()));
    std::fs::write(&path, EXTERNAL).unwrap();

    let mut session = session_with(&[]);
    let summary = session.load_snapshot_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(summary.unwrap().anchors_created, 1);
    assert!(session.export_room_json("room-1").unwrap().contains("floor-1"));
}
