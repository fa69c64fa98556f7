// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Well-known semantic labels.
//!
//! Labels are free-form strings on the wire; these constants cover the
//! classifications produced by scene capture and used by the builder.

pub const FLOOR: &str = "FLOOR";
pub const CEILING: &str = "CEILING";
pub const WALL_FACE: &str = "WALL_FACE";
pub const INVISIBLE_WALL_FACE: &str = "INVISIBLE_WALL_FACE";
pub const GLOBAL_MESH: &str = "GLOBAL_MESH";
pub const TABLE: &str = "TABLE";
pub const COUCH: &str = "COUCH";
pub const BED: &str = "BED";
pub const STORAGE: &str = "STORAGE";
pub const SCREEN: &str = "SCREEN";
pub const LAMP: &str = "LAMP";
pub const PLANT: &str = "PLANT";
pub const DOOR_FRAME: &str = "DOOR_FRAME";
pub const WINDOW_FRAME: &str = "WINDOW_FRAME";
pub const WALL_ART: &str = "WALL_ART";
pub const OTHER: &str = "OTHER";
