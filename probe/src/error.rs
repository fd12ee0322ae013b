//! Error type for the probe crate.

use thiserror::Error;
use world_core::TransformError;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything in here is fatal to a run. Per-document encode and decode
/// failures never become an `Error`; the cache passes log and skip them.
#[derive(Error, Debug)]
pub enum Error {
    /// Cache server unreachable or a command failed.
    #[error("KeyDB error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Relational store failure.
    #[error("SQLite error: {0}")]
    Relational(#[from] rusqlite::Error),

    /// A probed city id does not exist in the relational store.
    #[error("city {0} not found")]
    CityNotFound(i32),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Stored rows that cannot be mapped onto the world types.
    #[error("Invalid world data: {0}")]
    Dataset(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
