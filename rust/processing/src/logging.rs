// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracing subscriber setup.

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber described by `config`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(config: &Config) -> bool {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.log_json {
        builder.json().try_init().is_ok()
    } else {
        builder.pretty().try_init().is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.log_filter, json = config.log_json, "tracing initialised");
    }
    installed
}
