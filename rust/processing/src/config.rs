// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration loaded from environment variables.

use scene_lite_core::CoordinateSystem;

/// Session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Tracing filter directive (`SCENE_LITE_LOG`, then `RUST_LOG`).
    pub log_filter: String,
    /// Emit logs as JSON lines instead of pretty text.
    pub log_json: bool,
    /// Coordinate system used when exporting snapshots.
    pub output_coordinates: CoordinateSystem,
    /// Report unchanged rooms and anchors alongside the change summary.
    pub emit_unchanged: bool,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key).and_then(|v| {
                let parsed = parse_flag(&v);
                if parsed.is_none() {
                    tracing::warn!(variable = key, value = %v, "ignoring unrecognised flag value");
                }
                parsed
            })
        };

        Self {
            log_filter: lookup("SCENE_LITE_LOG")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".into()),
            log_json: flag("SCENE_LITE_LOG_JSON").unwrap_or(false),
            output_coordinates: lookup("SCENE_LITE_OUTPUT_COORDS")
                .and_then(|v| match v.parse() {
                    Ok(system) => Some(system),
                    Err(err) => {
                        tracing::warn!(error = %err, "falling back to native output coordinates");
                        None
                    }
                })
                .unwrap_or_default(),
            emit_unchanged: flag("SCENE_LITE_EMIT_UNCHANGED").unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
