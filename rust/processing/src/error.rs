// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for session operations.

use std::path::PathBuf;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Snapshot JSON could not be read or written.
    #[error(transparent)]
    Snapshot(#[from] scene_lite_core::Error),

    /// Authored scene JSON could not be parsed.
    #[error(transparent)]
    Authored(#[from] scene_lite_geometry::Error),

    #[error(transparent)]
    Graph(#[from] scene_lite_graph::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
