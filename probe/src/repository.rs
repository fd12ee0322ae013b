//! Relational access to the world dataset.
//!
//! Every read happens inside a [`WorldSession`]: one SQLite transaction plus
//! an identity map of fully loaded countries. What gets joined is always
//! stated up front through a [`FetchScope`]; nothing is fetched lazily.

use crate::error::{Error, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::collections::HashMap;
use std::sync::Arc;
use world_core::types::{City, Continent, Country, CountryLanguage};

/// How much of the object graph a city query loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchScope {
    /// City row only; `City::country` stays `None`.
    CityOnly,
    /// City plus its country row; `Country::languages` stays `None`.
    WithCountry,
    /// City, country, and the country's complete language set.
    WithLanguages,
}

const CITY_COLUMNS: &str = "city.id, city.name, city.country_code, city.district, city.population";

const COUNTRY_COLUMNS: &str = "country.code, country.code_2, country.name, country.continent,
    country.region, country.surface_area, country.indep_year, country.population,
    country.life_expectancy, country.gnp, country.gnpo_id, country.local_name,
    country.government_form, country.head_of_state, country.capital";

/// Number of columns in [`CITY_COLUMNS`]; country columns follow it in joins.
const CITY_COLUMN_COUNT: usize = 5;

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        country_code: row.get(2)?,
        district: row.get(3)?,
        population: row.get(4)?,
        country: None,
    })
}

/// Map country columns starting at column `base`.
fn country_from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<Country> {
    let continent_name: String = row.get(base + 3)?;
    let continent = Continent::from_name(&continent_name).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            base + 3,
            Type::Text,
            format!("unknown continent '{continent_name}'").into(),
        )
    })?;

    Ok(Country {
        code: row.get(base)?,
        code2: row.get(base + 1)?,
        name: row.get(base + 2)?,
        continent,
        region: row.get(base + 4)?,
        surface_area: row.get(base + 5)?,
        indep_year: row.get(base + 6)?,
        population: row.get(base + 7)?,
        life_expectancy: row.get(base + 8)?,
        gnp: row.get(base + 9)?,
        gnp_old: row.get(base + 10)?,
        local_name: row.get(base + 11)?,
        government_form: row.get(base + 12)?,
        head_of_state: row.get(base + 13)?,
        capital: row.get(base + 14)?,
        languages: None,
    })
}

fn language_from_row(row: &Row<'_>) -> rusqlite::Result<CountryLanguage> {
    Ok(CountryLanguage {
        country_code: row.get(0)?,
        language: row.get(1)?,
        is_official: row.get(2)?,
        percentage: row.get(3)?,
    })
}

fn load_languages(conn: &Connection, code: &str) -> Result<Vec<CountryLanguage>> {
    let mut stmt = conn.prepare_cached(
        "SELECT country_code, language, is_official, percentage
         FROM country_language WHERE country_code = ?1 ORDER BY language",
    )?;
    let rows = stmt.query_map(params![code], language_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn load_country(conn: &Connection, code: &str, with_languages: bool) -> Result<Option<Country>> {
    let sql = format!("SELECT {COUNTRY_COLUMNS} FROM country WHERE country.code = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    let country = stmt
        .query_row(params![code], |row| country_from_row(row, 0))
        .optional()?;

    match country {
        Some(mut country) if with_languages => {
            country.languages = Some(load_languages(conn, code)?);
            Ok(Some(country))
        }
        other => Ok(other),
    }
}

/// One unit of work against the relational store.
pub struct WorldSession<'conn> {
    tx: Transaction<'conn>,
    /// Countries loaded with their languages, shared by every city that
    /// references them in this session.
    countries: HashMap<String, Arc<Country>>,
}

impl<'conn> WorldSession<'conn> {
    pub fn begin(conn: &'conn mut Connection) -> Result<Self> {
        Ok(Self {
            tx: conn.transaction()?,
            countries: HashMap::new(),
        })
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn count_all_cities(&self) -> Result<usize> {
        let count: i64 = self
            .tx
            .query_row("SELECT COUNT(*) FROM city", [], |r| r.get(0))?;
        usize::try_from(count).map_err(|_| Error::Dataset(format!("negative city count {count}")))
    }

    /// Every country with its languages, ordered by code. Also fills the
    /// identity map so later city pages reuse these instances.
    pub fn all_countries(&mut self) -> Result<Vec<Arc<Country>>> {
        let mut languages: HashMap<String, Vec<CountryLanguage>> = HashMap::new();
        {
            let mut stmt = self.tx.prepare_cached(
                "SELECT country_code, language, is_official, percentage
                 FROM country_language ORDER BY country_code, language",
            )?;
            for lang in stmt.query_map([], language_from_row)? {
                let lang = lang?;
                languages
                    .entry(lang.country_code.clone())
                    .or_default()
                    .push(lang);
            }
        }

        let sql = format!("SELECT {COUNTRY_COLUMNS} FROM country ORDER BY country.code");
        let mut stmt = self.tx.prepare_cached(&sql)?;
        let rows = stmt.query_map([], |row| country_from_row(row, 0))?;

        let mut countries = Vec::new();
        for country in rows {
            let mut country = country?;
            country.languages = Some(languages.remove(&country.code).unwrap_or_default());
            let country = Arc::new(country);
            self.countries
                .insert(country.code.clone(), Arc::clone(&country));
            countries.push(country);
        }
        Ok(countries)
    }

    /// One page of cities ordered by id, with countries resolved per `scope`.
    pub fn page_cities(
        &mut self,
        offset: usize,
        limit: usize,
        scope: FetchScope,
    ) -> Result<Vec<City>> {
        let mut cities = {
            let sql = format!("SELECT {CITY_COLUMNS} FROM city ORDER BY city.id LIMIT ?1 OFFSET ?2");
            let mut stmt = self.tx.prepare_cached(&sql)?;
            let rows = stmt.query_map(params![limit as i64, offset as i64], city_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        if scope == FetchScope::CityOnly {
            return Ok(cities);
        }

        // Country rows without languages are only shared within this page.
        let mut bare: HashMap<String, Arc<Country>> = HashMap::new();
        for city in &mut cities {
            let country = match scope {
                FetchScope::WithLanguages => self.resolve_full_country(&city.country_code)?,
                _ => match self.countries.get(&city.country_code) {
                    Some(country) => Arc::clone(country),
                    None => match bare.get(&city.country_code) {
                        Some(country) => Arc::clone(country),
                        None => {
                            let country = Arc::new(self.require_country(&city.country_code, false)?);
                            bare.insert(city.country_code.clone(), Arc::clone(&country));
                            country
                        }
                    },
                },
            };
            city.country = Some(country);
        }
        Ok(cities)
    }

    /// A single city, joined per `scope`.
    ///
    /// Bypasses the identity map: every call runs the city/country join and
    /// the language query afresh.
    pub fn city_by_id(&self, id: i32, scope: FetchScope) -> Result<Option<City>> {
        if scope == FetchScope::CityOnly {
            let sql = format!("SELECT {CITY_COLUMNS} FROM city WHERE city.id = ?1");
            let mut stmt = self.tx.prepare_cached(&sql)?;
            return Ok(stmt.query_row(params![id], city_from_row).optional()?);
        }

        let sql = format!(
            "SELECT {CITY_COLUMNS}, {COUNTRY_COLUMNS}
             FROM city JOIN country ON country.code = city.country_code
             WHERE city.id = ?1"
        );
        let mut stmt = self.tx.prepare_cached(&sql)?;
        let joined = stmt
            .query_row(params![id], |row| {
                Ok((city_from_row(row)?, country_from_row(row, CITY_COLUMN_COUNT)?))
            })
            .optional()?;

        let Some((mut city, mut country)) = joined else {
            return Ok(None);
        };
        if scope == FetchScope::WithLanguages {
            country.languages = Some(load_languages(&self.tx, &country.code)?);
        }
        city.country = Some(Arc::new(country));
        Ok(Some(city))
    }

    fn resolve_full_country(&mut self, code: &str) -> Result<Arc<Country>> {
        if let Some(country) = self.countries.get(code) {
            return Ok(Arc::clone(country));
        }
        let country = Arc::new(self.require_country(code, true)?);
        self.countries.insert(code.to_string(), Arc::clone(&country));
        Ok(country)
    }

    fn require_country(&self, code: &str, with_languages: bool) -> Result<Country> {
        load_country(&self.tx, code, with_languages)?
            .ok_or_else(|| Error::Dataset(format!("city references unknown country '{code}'")))
    }
}

/// Runs `work` inside a session. Commits when it returns `Ok`; on `Err` (or a
/// panic) the transaction is dropped and rolled back.
pub fn with_session<T, F>(conn: &mut Connection, work: F) -> Result<T>
where
    F: FnOnce(&mut WorldSession<'_>) -> Result<T>,
{
    let mut session = WorldSession::begin(conn)?;
    let out = work(&mut session)?;
    session.commit()?;
    Ok(out)
}
