//! The flattened city document written to the cache.

use super::Continent;
use serde::{Deserialize, Serialize, Serializer, ser};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// JSON has no NaN or infinity; refuse them instead of emitting `null`.
fn finite_f64<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        Err(ser::Error::custom(format!("non-finite float {value}")))
    }
}

/// A country language with the country code dropped.
///
/// Equality and ordering cover every field (percentage by total order), so a
/// `BTreeSet<Language>` collapses duplicates by value and iterates in a
/// stable order.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub language: String,
    pub is_official: bool,
    #[serde(serialize_with = "finite_f64")]
    pub percentage: f64,
}

impl Ord for Language {
    fn cmp(&self, other: &Self) -> Ordering {
        self.language
            .cmp(&other.language)
            .then(self.is_official.cmp(&other.is_official))
            .then(self.percentage.total_cmp(&other.percentage))
    }
}

impl PartialOrd for Language {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Language {}

/// One city joined with its country and the country's languages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CityCountry {
    pub id: i32,
    pub name: String,
    pub district: String,
    pub population: i32,
    pub country_code: String,
    pub alternative_country_code: String,
    pub country_name: String,
    pub continent: Continent,
    pub country_region: String,
    #[serde(serialize_with = "finite_f64")]
    pub country_surface_area: f64,
    pub country_population: i32,
    pub languages: BTreeSet<Language>,
}

/// Cache key for a city id: the plain decimal id.
pub fn cache_key(id: i32) -> String {
    id.to_string()
}

impl CityCountry {
    pub fn cache_key(&self) -> String {
        cache_key(self.id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(name: &str, official: bool, pct: f64) -> Language {
        Language {
            language: name.to_string(),
            is_official: official,
            percentage: pct,
        }
    }

    fn kabul() -> CityCountry {
        CityCountry {
            id: 3,
            name: "Kabul".to_string(),
            district: "Kabol".to_string(),
            population: 1_780_000,
            country_code: "AFG".to_string(),
            alternative_country_code: "AF".to_string(),
            country_name: "Afghanistan".to_string(),
            continent: Continent::Asia,
            country_region: "Southern and Central Asia".to_string(),
            country_surface_area: 652_090.0,
            country_population: 22_720_000,
            languages: [lang("Pashto", true, 52.4), lang("Dari", true, 32.1)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn json_roundtrip_preserves_document() {
        let original = kabul();
        let json = original.to_json().unwrap();
        let decoded = CityCountry::from_json(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let json = kabul().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for field in [
            "id",
            "name",
            "district",
            "population",
            "countryCode",
            "alternativeCountryCode",
            "countryName",
            "continent",
            "countryRegion",
            "countrySurfaceArea",
            "countryPopulation",
            "languages",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        let first = &value["languages"][0];
        assert_eq!(first["language"], "Dari");
        assert_eq!(first["isOfficial"], true);
        assert_eq!(value["continent"], "Asia");
    }

    #[test]
    fn awkward_percentages_survive_roundtrip() {
        let mut doc = kabul();
        doc.languages = [lang("A", false, 0.1 + 0.2), lang("B", false, 1.0 / 3.0)]
            .into_iter()
            .collect();
        let decoded = CityCountry::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(doc, decoded);
    }

    #[test]
    fn non_finite_floats_fail_to_encode() {
        let mut doc = kabul();
        doc.country_surface_area = f64::INFINITY;
        assert!(doc.to_json().is_err());

        let mut doc = kabul();
        doc.languages.insert(lang("Uzbek", false, f64::NAN));
        assert!(doc.to_json().is_err());
    }

    #[test]
    fn duplicate_languages_collapse_by_value() {
        let set: BTreeSet<Language> = [
            lang("Dari", true, 32.1),
            lang("Dari", true, 32.1),
            lang("Dari", false, 32.1),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CityCountry::from_json("{\"id\": 3").is_err());
        assert!(CityCountry::from_json("not json").is_err());
    }

    #[test]
    fn cache_key_is_plain_decimal() {
        assert_eq!(kabul().cache_key(), "3");
        assert_eq!(cache_key(2545), "2545");
        assert_eq!(cache_key(-7), "-7");
    }
}
