// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Rooms and anchors get unique, type-safe keys from `slotmap::SlotMap`.
//! Keys stay valid while other entities come and go (generational
//! indices), so a key held by a consumer keeps naming the same live entity
//! across reconciliation passes until that entity is removed.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a live room.
    pub struct RoomKey;

    /// Key for a live anchor.
    pub struct AnchorKey;
}

/// A key that can reference any live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Room(RoomKey),
    Anchor(AnchorKey),
}

impl EntityKey {
    pub fn kind(&self) -> &'static str {
        match self {
            EntityKey::Room(_) => "Room",
            EntityKey::Anchor(_) => "Anchor",
        }
    }
}

impl From<RoomKey> for EntityKey {
    fn from(k: RoomKey) -> Self {
        EntityKey::Room(k)
    }
}

impl From<AnchorKey> for EntityKey {
    fn from(k: AnchorKey) -> Self {
        EntityKey::Anchor(k)
    }
}
