//! The full run: load every city, flatten, cache, then time both read paths
//! over the probe set.

use crate::cache_store::{CacheRead, WriteSummary, probe_cache, push_to_cache};
use crate::error::{Error, Result};
use crate::keydb::CacheConnector;
use crate::report::ProbeTimings;
use crate::repository::{FetchScope, with_session};
use rusqlite::Connection;
use std::time::{Duration, Instant};
use world_core::transform::denormalize;
use world_core::types::{City, CityCountry};

/// Cities per relational page during the bulk load.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Probe set used when none is configured.
pub const DEFAULT_PROBE_IDS: [i32; 10] = [3, 2545, 123, 4, 189, 89, 3458, 1189, 10, 102];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub page_size: usize,
    pub probe_ids: Vec<i32>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            probe_ids: DEFAULT_PROBE_IDS.to_vec(),
        }
    }
}

/// What the relational probe touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationalWalk {
    pub cities: usize,
    pub languages: usize,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub cities_loaded: usize,
    pub write: WriteSummary,
    pub cache_reads: Vec<CacheRead>,
    pub walk: RelationalWalk,
    pub timings: ProbeTimings,
}

fn timed<T>(work: impl FnOnce() -> Result<T>) -> Result<(T, Duration)> {
    let start = Instant::now();
    let out = work()?;
    Ok((out, start.elapsed()))
}

/// Load every city with its country and languages, in id order, page by page
/// inside one session.
pub fn fetch_data(conn: &mut Connection, page_size: usize) -> Result<Vec<City>> {
    if page_size == 0 {
        return Err(Error::Config("page size must be greater than zero".to_string()));
    }

    with_session(conn, |session| {
        let countries = session.all_countries()?;
        let total = session.count_all_cities()?;
        log::info!("Loading {total} cities ({} countries)...", countries.len());

        let mut cities = Vec::with_capacity(total);
        for offset in (0..total).step_by(page_size) {
            let page = session.page_cities(offset, page_size, FetchScope::WithLanguages)?;
            log::debug!("  Page at offset {offset}: {} cities.", page.len());
            cities.extend(page);
        }

        log::info!("Loaded {} cities.", cities.len());
        Ok(cities)
    })
}

pub fn transform_data(cities: &[City]) -> Result<Vec<CityCountry>> {
    Ok(denormalize(cities)?)
}

/// Walk city, country and languages for every id inside one session.
///
/// Each id pays the full join; a missing id aborts with
/// [`Error::CityNotFound`].
pub fn probe_relational(conn: &mut Connection, ids: &[i32]) -> Result<RelationalWalk> {
    with_session(conn, |session| {
        let mut walk = RelationalWalk::default();
        for &id in ids {
            let city = session
                .city_by_id(id, FetchScope::WithLanguages)?
                .ok_or(Error::CityNotFound(id))?;
            let languages = city
                .country()
                .and_then(|country| country.languages.as_ref())
                .map_or(0, Vec::len);
            walk.cities += 1;
            walk.languages += languages;
        }
        Ok(walk)
    })
}

/// Load, flatten and cache the whole dataset, then time both probes.
pub fn run<C: CacheConnector>(
    conn: &mut Connection,
    cache: &C,
    options: &RunOptions,
) -> Result<RunReport> {
    let cities = fetch_data(conn, options.page_size)?;
    let documents = transform_data(&cities)?;
    drop(cities);

    let write = push_to_cache(cache, &documents)?;

    let (cache_reads, cache_time) = timed(|| probe_cache(cache, &options.probe_ids))?;
    let (walk, relational_time) = timed(|| probe_relational(conn, &options.probe_ids))?;

    let timings = ProbeTimings {
        cache: cache_time,
        relational: relational_time,
    };
    let hits = cache_reads.iter().filter(|r| r.document().is_some()).count();
    log::info!(
        "Probed {} ids: {hits} cache hits, {} cities / {} languages walked.",
        options.probe_ids.len(),
        walk.cities,
        walk.languages
    );
    if let Some(speedup) = timings.speedup() {
        log::info!("Cache path was {speedup:.1}x faster than the relational walk.");
    }

    Ok(RunReport {
        cities_loaded: documents.len(),
        write,
        cache_reads,
        walk,
        timings,
    })
}
