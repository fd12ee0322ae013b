use super::Continent;

/// One language spoken in a country. Identity is `(country_code, language)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryLanguage {
    pub country_code: String,
    pub language: String,
    pub is_official: bool,
    pub percentage: f64,
}

/// A row of the `country` table.
///
/// `languages` is `None` when the fetch that produced this country did not
/// load the language association, and `Some` (possibly empty) when it did.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub code: String,
    pub code2: String,
    pub name: String,
    pub continent: Continent,
    pub region: String,
    pub surface_area: f64,
    pub indep_year: Option<i16>,
    pub population: i32,
    pub life_expectancy: Option<f64>,
    pub gnp: Option<f64>,
    pub gnp_old: Option<f64>,
    pub local_name: String,
    pub government_form: String,
    pub head_of_state: Option<String>,
    /// City id of the capital.
    pub capital: Option<i32>,
    pub languages: Option<Vec<CountryLanguage>>,
}

impl Country {
    pub fn has_languages_loaded(&self) -> bool {
        self.languages.is_some()
    }
}
