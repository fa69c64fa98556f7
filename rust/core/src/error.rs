// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for snapshot handling.

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A coordinate-system name that is not one of the supported systems.
    #[error("unknown coordinate system: {0}")]
    UnknownCoordinateSystem(String),
}
