//! Flattens cities and their countries into cache documents.

use crate::error::TransformError;
use crate::types::{City, CityCountry, CountryLanguage, Language};
use std::collections::BTreeSet;

/// Projects a country language onto a `Language`, dropping the country code.
pub fn summarize_language(source: &CountryLanguage) -> Language {
    Language {
        language: source.language.clone(),
        is_official: source.is_official,
        percentage: source.percentage,
    }
}

/// Flattens one city with its country and the country's full language set.
pub fn denormalize_city(city: &City) -> Result<CityCountry, TransformError> {
    let country = city
        .country()
        .ok_or(TransformError::MissingCountry { city_id: city.id })?;
    let country_languages =
        country
            .languages
            .as_ref()
            .ok_or_else(|| TransformError::LanguagesNotLoaded {
                country_code: country.code.clone(),
            })?;

    let languages: BTreeSet<Language> = country_languages.iter().map(summarize_language).collect();

    Ok(CityCountry {
        id: city.id,
        name: city.name.clone(),
        district: city.district.clone(),
        population: city.population,
        country_code: country.code.clone(),
        alternative_country_code: country.code2.clone(),
        country_name: country.name.clone(),
        continent: country.continent,
        country_region: country.region.clone(),
        country_surface_area: country.surface_area,
        country_population: country.population,
        languages,
    })
}

/// Flattens every city, keeping input order. Stops at the first city whose
/// country or languages were not loaded.
pub fn denormalize(cities: &[City]) -> Result<Vec<CityCountry>, TransformError> {
    cities.iter().map(denormalize_city).collect()
}
