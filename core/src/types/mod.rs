//! World dataset types: the relational entities and the flattened cache document.

mod city;
mod city_country;
mod continent;
mod country;

pub use city::City;
pub use city_country::{CityCountry, Language, cache_key};
pub use continent::Continent;
pub use country::{Country, CountryLanguage};
