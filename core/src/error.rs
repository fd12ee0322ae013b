use thiserror::Error;

/// Precondition violations hit while flattening cities.
///
/// These mean the caller fetched cities with too narrow a fetch scope; they
/// are not retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("city {city_id} has no country resolved")]
    MissingCountry { city_id: i32 },

    #[error("country {country_code} was loaded without its languages")]
    LanguagesNotLoaded { country_code: String },
}
