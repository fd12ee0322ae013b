//! World dataset seeding: a small fixed fixture plus a deterministic synthetic
//! generator that scales it up to the size of the real world sample database.

use crate::config::DatabaseSource;
use crate::error::{Error, Result};
use crate::schema::{configure_connection, create_tables, has_world_data};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rusqlite::{Connection, params};
use world_core::types::{City, Continent, Country, CountryLanguage};

/// Rows to insert. Countries carry their languages; cities carry only their
/// country code.
#[derive(Debug, Clone, Default)]
pub struct DatasetParams {
    /// Total number of cities, fixture included. Ids run from 1 to this;
    /// values below the fixture size still yield the whole fixture.
    pub city_count: usize,
    /// Number of synthetic countries added next to the fixture's.
    pub synthetic_countries: usize,
}

impl DatasetParams {
    /// Same shape as the world sample database: 4079 cities in 239 countries.
    pub fn world_sized() -> Self {
        Self {
            city_count: 4079,
            synthetic_countries: 236,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorldData {
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
}

const LANGUAGE_NAMES: &[&str] = &[
    "Arabic", "Bengali", "Creole English", "Dutch", "English", "French", "German", "Hindi",
    "Italian", "Japanese", "Korean", "Malay", "Portuguese", "Quechua", "Russian", "Spanish",
    "Swahili", "Tagalog", "Turkish", "Urdu", "Wolof", "Yoruba",
];

const REGIONS: &[(Continent, &str)] = &[
    (Continent::Asia, "Eastern Asia"),
    (Continent::Asia, "Middle East"),
    (Continent::Europe, "Western Europe"),
    (Continent::Europe, "Eastern Europe"),
    (Continent::NorthAmerica, "Caribbean"),
    (Continent::NorthAmerica, "Central America"),
    (Continent::Africa, "Western Africa"),
    (Continent::Africa, "Northern Africa"),
    (Continent::Oceania, "Polynesia"),
    (Continent::Oceania, "Micronesia"),
    (Continent::Antarctica, "Antarctica"),
    (Continent::SouthAmerica, "South America"),
];

fn language(code: &str, name: &str, is_official: bool, percentage: f64) -> CountryLanguage {
    CountryLanguage {
        country_code: code.to_string(),
        language: name.to_string(),
        is_official,
        percentage,
    }
}

fn city(id: i32, name: &str, code: &str, district: &str, population: i32) -> City {
    City {
        id,
        name: name.to_string(),
        district: district.to_string(),
        population,
        country_code: code.to_string(),
        country: None,
    }
}

/// Three real countries and seven of their cities. Kabul is city 3.
pub fn sample_world() -> WorldData {
    let countries = vec![
        Country {
            code: "AFG".to_string(),
            code2: "AF".to_string(),
            name: "Afghanistan".to_string(),
            continent: Continent::Asia,
            region: "Southern and Central Asia".to_string(),
            surface_area: 652_090.0,
            indep_year: Some(1919),
            population: 22_720_000,
            life_expectancy: Some(45.9),
            gnp: Some(5976.0),
            gnp_old: None,
            local_name: "Afganistan/Afqanestan".to_string(),
            government_form: "Islamic Emirate".to_string(),
            head_of_state: Some("Mohammad Omar".to_string()),
            capital: Some(3),
            languages: Some(vec![
                language("AFG", "Pashto", true, 52.4),
                language("AFG", "Dari", true, 32.1),
            ]),
        },
        Country {
            code: "NLD".to_string(),
            code2: "NL".to_string(),
            name: "Netherlands".to_string(),
            continent: Continent::Europe,
            region: "Western Europe".to_string(),
            surface_area: 41_526.0,
            indep_year: Some(1581),
            population: 15_864_000,
            life_expectancy: Some(78.3),
            gnp: Some(371_362.0),
            gnp_old: Some(360_478.0),
            local_name: "Nederland".to_string(),
            government_form: "Constitutional Monarchy".to_string(),
            head_of_state: Some("Beatrix".to_string()),
            capital: Some(5),
            languages: Some(vec![
                language("NLD", "Dutch", true, 95.6),
                language("NLD", "Fries", false, 3.7),
                language("NLD", "Arabic", false, 0.9),
                language("NLD", "Turkish", false, 0.8),
            ]),
        },
        Country {
            code: "ABW".to_string(),
            code2: "AW".to_string(),
            name: "Aruba".to_string(),
            continent: Continent::NorthAmerica,
            region: "Caribbean".to_string(),
            surface_area: 193.0,
            indep_year: None,
            population: 103_000,
            life_expectancy: Some(78.4),
            gnp: Some(828.0),
            gnp_old: Some(793.0),
            local_name: "Aruba".to_string(),
            government_form: "Nonmetropolitan Territory of The Netherlands".to_string(),
            head_of_state: Some("Beatrix".to_string()),
            capital: Some(7),
            languages: Some(vec![
                language("ABW", "Papiamento", false, 76.7),
                language("ABW", "English", false, 9.5),
                language("ABW", "Spanish", false, 7.4),
                language("ABW", "Dutch", true, 5.3),
            ]),
        },
    ];

    let cities = vec![
        city(1, "Qandahar", "AFG", "Qandahar", 237_500),
        city(2, "Herat", "AFG", "Herat", 186_800),
        city(3, "Kabul", "AFG", "Kabol", 1_780_000),
        city(4, "Mazar-e-Sharif", "AFG", "Balkh", 127_800),
        city(5, "Amsterdam", "NLD", "Noord-Holland", 731_200),
        city(6, "Rotterdam", "NLD", "Zuid-Holland", 593_321),
        city(7, "Oranjestad", "ABW", "Aruba", 29_034),
    ];

    WorldData { countries, cities }
}

/// Three-letter code for synthetic country `index`. Starts at `XAA`, which
/// keeps clear of the fixture's codes.
fn synthetic_code(index: usize) -> String {
    let letters = [
        b'X' + (index / 676) as u8,
        b'A' + ((index / 26) % 26) as u8,
        b'A' + (index % 26) as u8,
    ];
    String::from_utf8_lossy(&letters).into_owned()
}

/// The fixture plus synthetic countries and cities.
///
/// Uses a fixed seed, so the same parameters always produce the same rows.
pub fn generate_synthetic(params: &DatasetParams) -> WorldData {
    let mut rng = StdRng::seed_from_u64(0x5EED_C0DE_CAFE_0001);
    let mut data = sample_world();

    // ── Countries ───────────────────────────────────────────────────
    for i in 0..params.synthetic_countries.min(3 * 676) {
        let code = synthetic_code(i);
        let (continent, region) = REGIONS[rng.gen_range(0..REGIONS.len())];

        let language_count = rng.gen_range(0..=5);
        let picked: Vec<&&str> = LANGUAGE_NAMES
            .choose_multiple(&mut rng, language_count)
            .collect();
        let languages = picked
            .into_iter()
            .enumerate()
            .map(|(n, name)| {
                let official = if n == 0 {
                    rng.gen_bool(0.8)
                } else {
                    rng.gen_bool(0.2)
                };
                let percentage = rng.gen_range(1..=1000) as f64 / 10.0;
                language(&code, name, official, percentage)
            })
            .collect();

        data.countries.push(Country {
            code2: code[1..].to_string(),
            name: format!("country_{i:03}"),
            continent,
            region: region.to_string(),
            surface_area: rng.gen_range(10..2_000_000) as f64,
            indep_year: if rng.gen_bool(0.7) {
                Some(rng.gen_range(1500..2000))
            } else {
                None
            },
            population: rng.gen_range(1_000..200_000_000),
            life_expectancy: Some(rng.gen_range(400..850) as f64 / 10.0),
            gnp: Some(rng.gen_range(100..1_000_000) as f64),
            gnp_old: None,
            local_name: format!("country_{i:03}"),
            government_form: "Republic".to_string(),
            head_of_state: None,
            capital: None,
            languages: Some(languages),
            code,
        });
    }

    // ── Cities ──────────────────────────────────────────────────────
    let first_id = data.cities.len() + 1;
    for id in first_id..=params.city_count {
        let owner = &data.countries[rng.gen_range(0..data.countries.len())];
        let district = format!("district_{:02}", rng.gen_range(0..40));
        let code = owner.code.clone();
        data.cities.push(city(
            id as i32,
            &format!("city_{id:04}"),
            &code,
            &district,
            rng.gen_range(1_000..5_000_000),
        ));
    }

    data
}

/// Bulk-insert a dataset in one transaction.
pub fn insert_world(conn: &mut Connection, data: &WorldData) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let mut country_stmt = tx.prepare(
            "INSERT INTO country (
                code, code_2, name, continent, region, surface_area, indep_year,
                population, life_expectancy, gnp, gnpo_id, local_name,
                government_form, head_of_state, capital
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )?;
        let mut language_stmt = tx.prepare(
            "INSERT INTO country_language (country_code, language, is_official, percentage)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut city_stmt = tx.prepare(
            "INSERT INTO city (id, name, country_code, district, population)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for country in &data.countries {
            country_stmt.execute(params![
                country.code,
                country.code2,
                country.name,
                country.continent.as_str(),
                country.region,
                country.surface_area,
                country.indep_year,
                country.population,
                country.life_expectancy,
                country.gnp,
                country.gnp_old,
                country.local_name,
                country.government_form,
                country.head_of_state,
                country.capital,
            ])?;

            for lang in country.languages.iter().flatten() {
                language_stmt.execute(params![
                    lang.country_code,
                    lang.language,
                    lang.is_official,
                    lang.percentage,
                ])?;
            }
        }

        for city in &data.cities {
            city_stmt.execute(params![
                city.id,
                city.name,
                city.country_code,
                city.district,
                city.population,
            ])?;
        }
    }
    tx.commit()?;

    log::info!(
        "Inserted {} countries and {} cities.",
        data.countries.len(),
        data.cities.len()
    );
    Ok(())
}

/// Open the configured relational store, ready to query.
///
/// A file must already hold the world tables; the in-memory store is created
/// and seeded with the world-sized synthetic dataset.
pub fn open_database(source: &DatabaseSource) -> Result<Connection> {
    match source {
        DatabaseSource::File(path) => {
            if !path.exists() {
                return Err(Error::Dataset(format!(
                    "{} does not exist. Run seed-world first.",
                    path.display()
                )));
            }
            let conn = Connection::open(path)?;
            configure_connection(&conn)?;
            if !has_world_data(&conn)? {
                return Err(Error::Dataset(format!(
                    "{} holds no world data. Run seed-world first.",
                    path.display()
                )));
            }
            log::info!("Using world database {}", path.display());
            Ok(conn)
        }
        DatabaseSource::InMemorySynthetic => {
            let mut conn = Connection::open_in_memory()?;
            configure_connection(&conn)?;
            create_tables(&conn)?;
            insert_world(&mut conn, &generate_synthetic(&DatasetParams::world_sized()))?;
            log::info!("Using in-memory synthetic world database");
            Ok(conn)
        }
    }
}
