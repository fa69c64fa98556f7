// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Scene-Lite Processing
//!
//! Ties snapshot parsing, authored-room building and graph reconciliation
//! into a [`SceneSession`], configured from the environment.
//!
//! ```rust,ignore
//! use scene_lite_processing::{init_tracing, Config, SceneSession};
//!
//! let config = Config::from_env();
//! init_tracing(&config);
//!
//! let mut session = SceneSession::new(config);
//! session.subscribe(|e: &scene_lite_graph::SceneEvent| println!("{e}"));
//! let summary = session.load_snapshot_file("scene.json")?;
//! println!("{summary}");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_tracing;
pub use session::SceneSession;
