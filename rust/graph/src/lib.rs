// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Scene-Lite Graph
//!
//! The live room/anchor graph and the reconciliation engine that keeps it
//! in step with incoming scene snapshots.
//!
//! Rooms and anchors live in slot maps with stable generational keys, so a
//! consumer holding a key keeps addressing the same entity across passes
//! for as long as it survives. Each pass matches snapshot rooms and anchors
//! to live ones by identifier (with a shared-anchor fallback for rooms),
//! applies the minimal set of creations, updates and removals, and reports
//! each one as a [`SceneEvent`].
//!
//! ```rust,ignore
//! use scene_lite_graph::{EventDispatcher, SceneEvent, SceneGraph};
//!
//! let mut graph = SceneGraph::new();
//! let mut events = EventDispatcher::new();
//! events.subscribe(|e: &SceneEvent| println!("{e}"));
//!
//! graph.reconcile(&first_snapshot, &mut events);
//! graph.reconcile(&second_snapshot, &mut events);
//! ```

pub mod arena;
pub mod error;
pub mod events;
pub mod keys;
pub mod matcher;
pub mod query;
pub mod reconcile;

pub use arena::{Anchor, Room, SceneGraph};
pub use error::{Error, Result};
pub use events::{
    EventDispatcher, EventKind, EventLog, ListenerId, ReconcileSummary, SceneEvent, SceneListener,
};
pub use keys::{AnchorKey, EntityKey, RoomKey};
pub use matcher::{match_anchors, match_rooms, AnchorPlan, RoomMatch, RoomPlan};
pub use query::RoomGeometry;
