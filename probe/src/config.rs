//! Runtime settings, resolved from the environment (and a `.env` file when
//! present).

use crate::error::{Error, Result};
use crate::pipeline::{DEFAULT_PAGE_SIZE, DEFAULT_PROBE_IDS, RunOptions};
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

const DEFAULT_KEYDB_URL: &str = "redis://127.0.0.1:6379/";
const DEFAULT_LOG_FILE: &str = "world-probe.log";

/// Where the relational dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    /// A fresh in-memory database seeded with the synthetic world.
    InMemorySynthetic,
    /// An existing SQLite file, e.g. one written by `seed-world`.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub keydb_url: String,
    pub database: DatabaseSource,
    pub run: RunOptions,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl Settings {
    /// Read every `WORLD_*` variable, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            keydb_url: resolve_keydb_url(),
            database: resolve_database(),
            run: RunOptions {
                page_size: resolve_page_size()?,
                probe_ids: resolve_probe_ids()?,
            },
            log_level: resolve_log_level()?,
            log_file: resolve_log_file(),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn resolve_keydb_url() -> String {
    non_empty_var("WORLD_KEYDB_URL").unwrap_or_else(|| DEFAULT_KEYDB_URL.to_string())
}

pub fn resolve_database() -> DatabaseSource {
    match non_empty_var("WORLD_DB_PATH") {
        Some(path) => DatabaseSource::File(PathBuf::from(path)),
        None => DatabaseSource::InMemorySynthetic,
    }
}

pub fn resolve_page_size() -> Result<usize> {
    match non_empty_var("WORLD_PAGE_SIZE") {
        Some(value) => parse_page_size(&value),
        None => Ok(DEFAULT_PAGE_SIZE),
    }
}

pub fn resolve_probe_ids() -> Result<Vec<i32>> {
    match non_empty_var("WORLD_PROBE_IDS") {
        Some(value) => parse_probe_ids(&value),
        None => Ok(DEFAULT_PROBE_IDS.to_vec()),
    }
}

pub fn resolve_log_level() -> Result<LevelFilter> {
    match non_empty_var("WORLD_LOG_LEVEL") {
        Some(value) => parse_log_level(&value)
            .ok_or_else(|| Error::Config(format!("unknown log level '{value}'"))),
        None => Ok(LevelFilter::Info),
    }
}

pub fn resolve_log_file() -> Option<String> {
    match env::var("WORLD_LOG_FILE") {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => Some(DEFAULT_LOG_FILE.to_string()),
    }
}

pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn parse_page_size(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(Error::Config(format!(
            "page size must be a positive integer, got '{value}'"
        ))),
        Ok(size) => Ok(size),
    }
}

/// Comma-separated city ids, e.g. `3,2545,123`. Order is kept.
pub fn parse_probe_ids(value: &str) -> Result<Vec<i32>> {
    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| Error::Config(format!("invalid probe id '{part}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(Error::Config("probe id list is empty".to_string()));
    }
    Ok(ids)
}
