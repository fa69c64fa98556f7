// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for graph operations.

use crate::keys::EntityKey;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when addressing the live graph.
///
/// Reconciliation itself never fails; malformed snapshots are logged and
/// processed best-effort.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A key no longer refers to a live entity.
    #[error("{} not found: {0:?}", .0.kind())]
    NotFound(EntityKey),

    /// No live room carries this identifier.
    #[error("no room with identifier {0}")]
    UnknownRoom(String),
}
