use super::Country;
use std::sync::Arc;

/// A row of the `city` table, optionally with its owning country resolved.
///
/// Cities loaded in the same page share one `Country` allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub district: String,
    pub population: i32,
    pub country_code: String,
    pub country: Option<Arc<Country>>,
}

impl City {
    pub fn country(&self) -> Option<&Country> {
        self.country.as_deref()
    }
}
