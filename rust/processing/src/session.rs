// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A long-lived scene session: one live graph, its listeners and the
//! configuration they were created with.

use crate::config::Config;
use crate::error::{Error, Result};
use scene_lite_core::{CoordinateSystem, SceneSnapshot};
use scene_lite_geometry::{build_scene, AuthoredScene};
use scene_lite_graph::{
    EventDispatcher, ListenerId, ReconcileSummary, RoomKey, SceneGraph, SceneListener,
};
use std::path::Path;

/// Owns a [`SceneGraph`] and the listeners notified on every pass.
#[derive(Debug)]
pub struct SceneSession {
    graph: SceneGraph,
    events: EventDispatcher,
    config: Config,
    passes: usize,
}

impl Default for SceneSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SceneSession {
    pub fn new(config: Config) -> Self {
        Self {
            graph: SceneGraph::new(),
            events: EventDispatcher::new(),
            config,
            passes: 0,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of snapshots applied so far.
    pub fn pass_count(&self) -> usize {
        self.passes
    }

    pub fn subscribe(&mut self, listener: impl SceneListener + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    /// Subscribes to the anchor events of a single room. The listener is
    /// dropped when the room is removed.
    pub fn subscribe_room(
        &mut self,
        room: RoomKey,
        listener: impl SceneListener + 'static,
    ) -> ListenerId {
        self.events.subscribe_room(room, listener)
    }

    /// Reconciles the live graph against `snapshot`.
    pub fn apply_snapshot(&mut self, snapshot: &SceneSnapshot) -> ReconcileSummary {
        let summary = self.graph.reconcile(snapshot, &mut self.events);
        self.passes += 1;
        tracing::info!(
            pass = self.passes,
            rooms = self.graph.room_count(),
            anchors = self.graph.anchor_count(),
            %summary,
            "applied scene snapshot"
        );
        summary
    }

    /// Parses snapshot JSON in any supported coordinate system and applies it.
    pub fn apply_json(&mut self, json: &str) -> Result<ReconcileSummary> {
        let snapshot = SceneSnapshot::from_json(json)?;
        Ok(self.apply_snapshot(&snapshot))
    }

    /// Builds snapshots from authored primitives and applies them.
    pub fn apply_authored(&mut self, scene: &AuthoredScene) -> ReconcileSummary {
        let snapshot = build_scene(scene);
        self.apply_snapshot(&snapshot)
    }

    pub fn apply_authored_json(&mut self, json: &str) -> Result<ReconcileSummary> {
        let scene = AuthoredScene::from_json(json)?;
        Ok(self.apply_authored(&scene))
    }

    pub fn load_snapshot_file(&mut self, path: impl AsRef<Path>) -> Result<ReconcileSummary> {
        let json = read_file(path.as_ref())?;
        self.apply_json(&json)
    }

    pub fn load_authored_file(&mut self, path: impl AsRef<Path>) -> Result<ReconcileSummary> {
        let json = read_file(path.as_ref())?;
        self.apply_authored_json(&json)
    }

    /// Current graph contents as a native-space snapshot.
    pub fn export_snapshot(&self) -> SceneSnapshot {
        self.graph.to_snapshot()
    }

    /// Current graph contents as JSON in the configured output coordinates.
    pub fn export_json(&self) -> Result<String> {
        self.export_json_as(self.config.output_coordinates)
    }

    pub fn export_json_as(&self, target: CoordinateSystem) -> Result<String> {
        Ok(self.export_snapshot().to_json(target)?)
    }

    /// A single live room as JSON in the configured output coordinates.
    pub fn export_room_json(&self, id: &str) -> Result<String> {
        let room = self.graph.room_snapshot_by_id(id)?;
        let snapshot = SceneSnapshot::with_rooms(vec![room]);
        Ok(snapshot.to_json(self.config.output_coordinates)?)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_lite_core::{labels, AnchorData, Bounds2, RoomSnapshot, Transform, Vec3};

    fn config() -> Config {
        Config::from_lookup(|_| None)
    }

    fn room(id: &str, anchors: &[&str]) -> RoomSnapshot {
        let mut room = RoomSnapshot::new(id);
        room.anchors = anchors
            .iter()
            .map(|a| {
                AnchorData::new(*a)
                    .with_label(labels::OTHER)
                    .with_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 1.0)))
                    .with_plane(Bounds2::centered(1.0, 1.0))
            })
            .collect();
        room
    }

    #[test]
    fn counts_passes() {
        let mut session = SceneSession::new(config());
        assert_eq!(session.pass_count(), 0);
        session.apply_snapshot(&SceneSnapshot::with_rooms(vec![room("r", &["a", "b"])]));
        session.apply_snapshot(&SceneSnapshot::with_rooms(vec![room("r", &["a"])]));
        assert_eq!(session.pass_count(), 2);
        assert_eq!(session.graph().anchor_count(), 1);
    }

    #[test]
    fn unknown_room_export_fails() {
        let session = SceneSession::new(config());
        assert!(matches!(
            session.export_room_json("missing"),
            Err(Error::Graph(scene_lite_graph::Error::UnknownRoom(_)))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let mut session = SceneSession::new(config());
        let err = session
            .load_snapshot_file("/definitely/not/here.json")
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
        assert_eq!(session.pass_count(), 0);
    }
}
