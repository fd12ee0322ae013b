//! Writes flattened city documents to the cache and reads them back.
//!
//! Key schema: `{city_id}` (plain decimal, no prefix) holding the JSON
//! encoding of a `CityCountry`.
//!
//! A document that fails to encode or decode is logged and skipped; the pass
//! goes on. A cache command failure aborts the pass.

use crate::error::Result;
use crate::keydb::{CacheConnector, CacheStore, PIPELINE_BATCH_SIZE};
use world_core::types::{CityCountry, cache_key};

/// Outcome of a write pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
}

/// What a single cache lookup found.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(CityCountry),
    Missing,
    /// Entry present but not a valid document; carries the decode error.
    Malformed(String),
}

/// One probed id and what the cache held for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead {
    pub id: i32,
    pub lookup: CacheLookup,
}

impl CacheRead {
    pub fn document(&self) -> Option<&CityCountry> {
        match &self.lookup {
            CacheLookup::Hit(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Encode and store every document under its id.
pub fn write_documents<S: CacheStore>(store: &mut S, documents: &[CityCountry]) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    for batch in documents.chunks(PIPELINE_BATCH_SIZE) {
        let mut entries = Vec::with_capacity(batch.len());
        for doc in batch {
            match doc.to_json() {
                Ok(json) => entries.push((doc.cache_key(), json)),
                Err(e) => {
                    log::error!("Encode city {}: {e}", doc.id);
                    summary.skipped += 1;
                }
            }
        }
        store.set_batch(&entries)?;
        summary.written += entries.len();
        log::debug!("  Wrote {} documents ({} so far).", entries.len(), summary.written);
    }

    Ok(summary)
}

/// Fetch and decode the document of every id, in order.
pub fn read_documents<S: CacheStore>(store: &mut S, ids: &[i32]) -> Result<Vec<CacheRead>> {
    let mut reads = Vec::with_capacity(ids.len());

    for &id in ids {
        let key = cache_key(id);
        let lookup = match store.get(&key)? {
            None => {
                log::warn!("Cache miss for key {key}");
                CacheLookup::Missing
            }
            Some(raw) => match CityCountry::from_json(&raw) {
                Ok(doc) => CacheLookup::Hit(doc),
                Err(e) => {
                    log::warn!("Decode key {key}: {e}");
                    CacheLookup::Malformed(e.to_string())
                }
            },
        };
        reads.push(CacheRead { id, lookup });
    }

    Ok(reads)
}

/// Write pass on its own cache connection, released when the pass ends.
pub fn push_to_cache<C: CacheConnector>(connector: &C, documents: &[CityCountry]) -> Result<WriteSummary> {
    let mut store = connector.connect()?;
    let summary = write_documents(&mut store, documents)?;
    log::info!(
        "Cached {} documents ({} skipped).",
        summary.written,
        summary.skipped
    );
    Ok(summary)
}

/// Read pass on its own cache connection, released when the pass ends.
pub fn probe_cache<C: CacheConnector>(connector: &C, ids: &[i32]) -> Result<Vec<CacheRead>> {
    let mut store = connector.connect()?;
    read_documents(&mut store, ids)
}
