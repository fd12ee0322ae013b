//! SQLite schema for the world dataset.
//!
//! Three tables mirror the classic world sample database: `country` keyed by
//! its three-letter code, `city` referencing its country, and
//! `country_language` keyed by `(country_code, language)`.

use crate::error::Result;
use rusqlite::Connection;

/// Configure a connection for a single-process, read-mostly workload.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA cache_size = -65536;
         PRAGMA temp_store = MEMORY;",
    )?;
    Ok(())
}

/// Create all tables and indexes if they do not exist yet.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS country (
            code            TEXT PRIMARY KEY NOT NULL,
            code_2          TEXT NOT NULL,
            name            TEXT NOT NULL,
            continent       TEXT NOT NULL,
            region          TEXT NOT NULL,
            surface_area    REAL NOT NULL,
            indep_year      INTEGER,
            population      INTEGER NOT NULL,
            life_expectancy REAL,
            gnp             REAL,
            gnpo_id         REAL,
            local_name      TEXT NOT NULL,
            government_form TEXT NOT NULL,
            head_of_state   TEXT,
            capital         INTEGER
        );

        CREATE TABLE IF NOT EXISTS city (
            id           INTEGER PRIMARY KEY NOT NULL,
            name         TEXT NOT NULL,
            country_code TEXT NOT NULL REFERENCES country(code),
            district     TEXT NOT NULL,
            population   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_city_country ON city(country_code);

        CREATE TABLE IF NOT EXISTS country_language (
            country_code TEXT NOT NULL REFERENCES country(code),
            language     TEXT NOT NULL,
            is_official  INTEGER NOT NULL,
            percentage   REAL NOT NULL,
            PRIMARY KEY (country_code, language)
        );",
    )?;
    Ok(())
}

/// Whether the world tables exist and hold at least one city.
pub fn has_world_data(conn: &Connection) -> Result<bool> {
    let tables: u32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type = 'table' AND name IN ('country', 'city', 'country_language')",
        [],
        |r| r.get(0),
    )?;
    if tables < 3 {
        return Ok(false);
    }
    let cities: u32 = conn.query_row("SELECT COUNT(*) FROM city", [], |r| r.get(0))?;
    Ok(cities > 0)
}

/// Remove every row, keeping the tables.
pub fn clear_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DELETE FROM country_language;
         DELETE FROM city;
         DELETE FROM country;",
    )?;
    Ok(())
}
