// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene diff tool
//!
//! Applies two scene files in sequence and prints the lifecycle events the
//! second one produces against the first.
//!
//! Usage:
//!   scene-lite-diff <current.json> <next.json> [--authored] [--coords <system>] [--output <path>]

use anyhow::{Context, Result};
use scene_lite_core::CoordinateSystem;
use scene_lite_graph::{ReconcileSummary, SceneEvent};
use scene_lite_processing::{init_tracing, Config, SceneSession};
use std::env;
use std::path::{Path, PathBuf};

fn print_usage() {
    eprintln!("Usage: scene-lite-diff <current.json> <next.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --authored            Inputs are authored primitive scenes");
    eprintln!("  --coords <system>     Output coordinates: native or zup");
    eprintln!("  --output <path>       Write the reconciled scene as JSON");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SCENE_LITE_LOG, SCENE_LITE_LOG_JSON, SCENE_LITE_OUTPUT_COORDS,");
    eprintln!("  SCENE_LITE_EMIT_UNCHANGED");
}

fn load(session: &mut SceneSession, path: &Path, authored: bool) -> Result<ReconcileSummary> {
    let result = if authored {
        session.load_authored_file(path)
    } else {
        session.load_snapshot_file(path)
    };
    result.with_context(|| format!("failed to apply {}", path.display()))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::from_env();

    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut authored = false;
    let mut output: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--authored" => authored = true,
            "--coords" => {
                i += 1;
                let value = args.get(i).context("--coords needs a value")?;
                config.output_coordinates = value
                    .parse::<CoordinateSystem>()
                    .with_context(|| format!("invalid --coords value {value}"))?;
            }
            "--output" | "-o" => {
                i += 1;
                output = Some(PathBuf::from(args.get(i).context("--output needs a path")?));
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {arg}");
                print_usage();
                std::process::exit(1);
            }
            path => inputs.push(PathBuf::from(path)),
        }
        i += 1;
    }

    let [current, next] = match <[PathBuf; 2]>::try_from(inputs) {
        Ok(pair) => pair,
        Err(_) => {
            print_usage();
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    let emit_unchanged = config.emit_unchanged;
    let mut session = SceneSession::new(config);

    load(&mut session, &current, authored)?;
    session.subscribe(|event: &SceneEvent| println!("{event}"));

    let summary = load(&mut session, &next, authored)?;

    println!("{summary}");
    if emit_unchanged {
        println!(
            "unchanged: {} rooms, {} anchors",
            summary.rooms_unchanged, summary.anchors_unchanged
        );
    }

    if let Some(path) = output {
        let json = session.export_json()?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}
