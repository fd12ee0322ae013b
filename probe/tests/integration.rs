//! Integration tests: the full load, flatten, cache and probe run against an
//! in-memory SQLite world and the in-process cache.

use rusqlite::Connection;
use std::collections::BTreeSet;
use world_core::transform::denormalize_city;
use world_core::types::{Continent, Language};
use world_probe::Error;
use world_probe::cache_store::{CacheLookup, probe_cache, push_to_cache};
use world_probe::keydb::{CacheConnector, CacheStore, KeyDbConnector, MemoryCache};
use world_probe::pipeline::{self, RunOptions, fetch_data, probe_relational, transform_data};
use world_probe::populate::{DatasetParams, generate_synthetic, insert_world, sample_world};
use world_probe::repository::{FetchScope, with_session};
use world_probe::schema::{configure_connection, create_tables};

fn small_params() -> DatasetParams {
    DatasetParams {
        city_count: 300,
        synthetic_countries: 25,
    }
}

fn setup(params: Option<&DatasetParams>) -> Connection {
    let mut conn = Connection::open_in_memory().expect("open");
    configure_connection(&conn).expect("configure");
    create_tables(&conn).expect("create_tables");
    let data = match params {
        Some(params) => generate_synthetic(params),
        None => sample_world(),
    };
    insert_world(&mut conn, &data).expect("insert_world");
    conn
}

fn options(page_size: usize, probe_ids: &[i32]) -> RunOptions {
    RunOptions {
        page_size,
        probe_ids: probe_ids.to_vec(),
    }
}

// ── End-to-end ──────────────────────────────────────────────────────

#[test]
fn kabul_round_trips_through_the_cache() {
    let mut conn = setup(None);
    let cache = MemoryCache::new();

    let report = pipeline::run(&mut conn, &cache, &options(500, &[3])).unwrap();
    assert_eq!(report.cities_loaded, sample_world().cities.len());

    let kabul = report.cache_reads[0].document().expect("key 3 cached");
    assert_eq!(kabul.id, 3);
    assert_eq!(kabul.name, "Kabul");
    assert_eq!(kabul.district, "Kabol");
    assert_eq!(kabul.population, 1_780_000);
    assert_eq!(kabul.country_name, "Afghanistan");
    assert_eq!(kabul.continent, Continent::Asia);
    assert_eq!(kabul.country_region, "Southern and Central Asia");
    assert_eq!(kabul.country_surface_area, 652_090.0);
    assert_eq!(kabul.country_population, 22_720_000);

    let expected: BTreeSet<Language> = [("Pashto", 52.4), ("Dari", 32.1)]
        .into_iter()
        .map(|(name, pct)| Language {
            language: name.to_string(),
            is_official: true,
            percentage: pct,
        })
        .collect();
    assert_eq!(kabul.languages, expected);
}

#[test]
fn every_city_is_cached_under_its_id() {
    let mut conn = setup(Some(&small_params()));
    let cache = MemoryCache::new();

    let report = pipeline::run(&mut conn, &cache, &options(64, &[1, 150, 300])).unwrap();
    assert_eq!(report.write.written, 300);
    assert_eq!(report.write.skipped, 0);
    assert_eq!(cache.len(), 300);

    let expected_keys: BTreeSet<String> = (1..=300).map(|id: i32| id.to_string()).collect();
    let actual_keys: BTreeSet<String> = cache.snapshot().into_keys().collect();
    assert_eq!(actual_keys, expected_keys);
}

#[test]
fn cached_documents_match_relational_denormalization() {
    let mut conn = setup(Some(&small_params()));
    let cache = MemoryCache::new();
    let ids = [2, 17, 123, 299];
    let report = pipeline::run(&mut conn, &cache, &options(50, &ids)).unwrap();

    for read in &report.cache_reads {
        let city = with_session(&mut conn, |s| s.city_by_id(read.id, FetchScope::WithLanguages))
            .unwrap()
            .unwrap();
        let fresh = denormalize_city(&city).unwrap();
        assert_eq!(read.document(), Some(&fresh), "city {}", read.id);
    }
}

#[test]
fn language_sets_match_country_languages() {
    let mut conn = setup(Some(&small_params()));
    let cities = fetch_data(&mut conn, 100).unwrap();
    let docs = transform_data(&cities).unwrap();

    for (city, doc) in cities.iter().zip(&docs) {
        assert_eq!(city.id, doc.id);
        let source = city.country().unwrap().languages.as_ref().unwrap();
        assert_eq!(doc.languages.len(), source.len(), "city {}", city.id);
        for lang in source {
            assert!(doc.languages.iter().any(|l| l.language == lang.language
                && l.is_official == lang.is_official
                && l.percentage == lang.percentage));
        }
    }
}

#[test]
fn rerunning_the_pipeline_leaves_identical_cache_contents() {
    let mut conn = setup(Some(&small_params()));
    let cache = MemoryCache::new();

    pipeline::run(&mut conn, &cache, &options(100, &[1])).unwrap();
    let first = cache.snapshot();
    pipeline::run(&mut conn, &cache, &options(37, &[1])).unwrap();
    let second = cache.snapshot();

    assert_eq!(first, second);
}

// ── Probes ──────────────────────────────────────────────────────────

#[test]
fn missing_probe_id_fails_the_relational_walk() {
    let mut conn = setup(None);
    let err = probe_relational(&mut conn, &[3, 2545, 123]).unwrap_err();
    assert!(matches!(err, Error::CityNotFound(2545)), "got {err:?}");
}

#[test]
fn missing_probe_id_fails_the_whole_run() {
    let mut conn = setup(None);
    let cache = MemoryCache::new();
    let err = pipeline::run(&mut conn, &cache, &options(500, &[3, 2545, 123])).unwrap_err();
    assert!(matches!(err, Error::CityNotFound(2545)));
    // The cache was already written before the probes ran.
    assert_eq!(cache.len(), sample_world().cities.len());
}

#[test]
fn cache_probe_reports_misses_without_failing() {
    let mut conn = setup(None);
    let cache = MemoryCache::new();
    let docs = transform_data(&fetch_data(&mut conn, 500).unwrap()).unwrap();
    push_to_cache(&cache, &docs).unwrap();

    let reads = probe_cache(&cache, &[3, 2545, 5]).unwrap();
    assert_eq!(reads.len(), 3);
    assert!(reads[0].document().is_some());
    assert_eq!(reads[1].lookup, CacheLookup::Missing);
    assert_eq!(reads[2].document().map(|d| d.name.as_str()), Some("Amsterdam"));
}

#[test]
fn default_probe_set_resolves_against_world_sized_data() {
    let mut conn = setup(Some(&DatasetParams::world_sized()));
    let cache = MemoryCache::new();
    let report = pipeline::run(&mut conn, &cache, &RunOptions::default()).unwrap();

    assert_eq!(report.cities_loaded, 4079);
    assert_eq!(report.walk.cities, 10);
    assert!(report.cache_reads.iter().all(|r| r.document().is_some()));
}

#[test]
fn unloaded_country_is_a_transform_error() {
    let mut conn = setup(None);
    let cities = with_session(&mut conn, |s| s.page_cities(0, 10, FetchScope::CityOnly)).unwrap();
    let err = transform_data(&cities).unwrap_err();
    assert!(matches!(err, Error::Transform(_)));
}

// ── Live KeyDB ──────────────────────────────────────────────────────

/// Needs a Redis-compatible server at `WORLD_KEYDB_URL`
/// (default `redis://127.0.0.1:6379/`). Run with `cargo test -- --ignored`.
#[test]
#[ignore]
fn keydb_round_trip() {
    let url = world_probe::config::resolve_keydb_url();
    let keydb = KeyDbConnector::open(&url).unwrap();
    keydb.ping().unwrap();

    let mut conn = setup(None);
    let report = pipeline::run(&mut conn, &keydb, &options(2, &[3, 5, 7])).unwrap();
    assert!(report.cache_reads.iter().all(|r| r.document().is_some()));

    let mut store = keydb.connect().unwrap();
    let scratch = "world-probe:test:overwrite";
    store.set(scratch, "first").unwrap();
    store.set(scratch, "second").unwrap();
    assert_eq!(store.get(scratch).unwrap().as_deref(), Some("second"));
    assert_eq!(store.get("world-probe:never-written").unwrap(), None);
}
