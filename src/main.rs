// geodispatch: fair route dispatch over a geofenced coordinate pool
// Copyright (C) 2026 geodispatch Contributors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geodispatch::fixture::Fixture;
use geodispatch::AreaConfigDocument;

/// Run and inspect a geographic route dispatcher from a JSON scenario file.
#[derive(Debug, Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a manager for a fixture area and dispatch a fixed number of
    /// `next()` calls per worker, printing what each worker receives.
    Run {
        /// Path to the fixture JSON file.
        fixture: PathBuf,
        /// Path to the persisted area-config document (created if missing).
        #[clap(long, default_value = "mappings.json")]
        config: PathBuf,
        /// Worker origins to register, in order.
        #[clap(long = "worker", value_name = "ORIGIN")]
        workers: Vec<String>,
        /// Number of `next()` calls to make per worker.
        #[clap(long, default_value_t = 6)]
        steps: usize,
    },
    /// Run the same scenario as `run`, then print the administrative
    /// queries (route status, per-worker rounds, workerpool snapshot).
    Status {
        /// Path to the fixture JSON file.
        fixture: PathBuf,
        /// Path to the persisted area-config document (created if missing).
        #[clap(long, default_value = "mappings.json")]
        config: PathBuf,
        /// Worker origins to register, in order.
        #[clap(long = "worker", value_name = "ORIGIN")]
        workers: Vec<String>,
        /// Number of `next()` calls to make per worker before reporting.
        #[clap(long, default_value_t = 6)]
        steps: usize,
    },
    /// Validate a persisted area-config document: parse it and print each
    /// area's name and calibration state.
    Doctor {
        /// Path to the persisted area-config document.
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    match args.command {
        Command::Run { fixture, config, workers, steps } => run(fixture, config, workers, steps).await?,
        Command::Status { fixture, config, workers, steps } => status(fixture, config, workers, steps).await?,
        Command::Doctor { config } => doctor(config)?,
    }

    Ok(())
}

async fn run(
    fixture_path: PathBuf,
    config_path: PathBuf,
    workers: Vec<String>,
    steps: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::load(&fixture_path)?;
    let manager = fixture.build_manager(&config_path)?;
    manager.start().await;

    let workers = if workers.is_empty() { vec!["worker-1".to_string()] } else { workers };
    for origin in &workers {
        manager.register_worker(origin).await;
    }

    for origin in &workers {
        for step in 0..steps {
            match manager.next(origin).await? {
                Some(loc) => println!("{origin} step {step}: ({}, {})", loc.lat, loc.lng),
                None => println!("{origin} step {step}: <no coordinate available>"),
            }
        }
    }

    manager.stop_workers().await;
    manager.stop();
    Ok(())
}

async fn status(
    fixture_path: PathBuf,
    config_path: PathBuf,
    workers: Vec<String>,
    steps: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::load(&fixture_path)?;
    let manager = fixture.build_manager(&config_path)?;
    manager.start().await;

    let workers = if workers.is_empty() { vec!["worker-1".to_string()] } else { workers };
    for origin in &workers {
        manager.register_worker(origin).await;
    }
    for origin in &workers {
        for _ in 0..steps {
            manager.next(origin).await?;
        }
    }

    let (served, route_len) = manager.route_status().await;
    println!("route status: {served}/{route_len} served this round");
    for origin in &workers {
        println!("{origin}: {} completed rounds", manager.rounds(origin).await);
    }
    for (origin, depth) in manager.workerpool_snapshot().await {
        println!("{origin}: {depth} pending in its own queue");
    }
    println!("registered workers: {}", manager.registered_workers().await);

    manager.stop_workers().await;
    manager.stop();
    Ok(())
}

fn doctor(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&config_path)?;
    let doc: AreaConfigDocument = serde_json::from_str(&raw)?;
    if doc.areas.is_empty() {
        println!("{}: no areas defined", config_path.display());
    }
    for area in &doc.areas {
        let state = if area.init { "calibrating" } else { "ready" };
        println!("{}: {state}", area.name);
    }
    Ok(())
}
