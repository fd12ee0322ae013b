//! World cache probe.
//!
//! Loads the world dataset from SQLite, flattens every city into a
//! `CityCountry` document, stores the documents in a Redis-compatible cache
//! keyed by city id, and times cache reads against relational joins for a
//! fixed probe set.
//!
//! Run the probe: `cargo run -p world-probe --bin world-probe`
//! Seed a database file: `cargo run -p world-probe --bin seed-world -- --db world.sqlite`

pub mod cache_store;
pub mod config;
pub mod error;
pub mod keydb;
pub mod pipeline;
pub mod populate;
pub mod report;
pub mod repository;
pub mod schema;

pub use error::{Error, Result};
