//! Loads the world dataset into the cache and prints how long the probe set
//! takes to read from the cache versus the relational store.
//!
//! Configuration comes from `WORLD_*` environment variables (see
//! `config.rs`); a `.env` file in the working directory is honoured.

use anyhow::Context;
use std::process;
use world_probe::config::Settings;
use world_probe::keydb::KeyDbConnector;
use world_probe::pipeline;
use world_probe::populate::open_database;
use world_probe::report::print_report;

fn run(settings: &Settings) -> anyhow::Result<()> {
    let mut conn = open_database(&settings.database)?;

    let keydb = KeyDbConnector::open(&settings.keydb_url)?;
    keydb
        .ping()
        .with_context(|| format!("KeyDB at {} is not reachable", settings.keydb_url))?;
    log::info!("Connected to KeyDB at {}", settings.keydb_url);

    let report = pipeline::run(&mut conn, &keydb, &settings.run)?;
    log::info!(
        "Run complete: {} documents loaded, {} written.",
        report.cities_loaded,
        report.write.written
    );

    print_report(&report.timings);
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().unwrap_or_else(|e| {
        eprintln!("{e}. Exiting.");
        process::exit(1);
    });

    world_core::initialize_logger(settings.log_level, settings.log_file.as_deref()).unwrap_or_else(
        |e| {
            eprintln!("Failed to initialize logger: {e}. Exiting.");
            process::exit(1);
        },
    );

    log::info!(
        "Starting world probe (level={}, logfile={})",
        settings.log_level,
        settings.log_file.as_deref().unwrap_or("none")
    );

    if let Err(e) = run(&settings) {
        log::error!("World probe failed: {e:#}");
        process::exit(1);
    }
}
