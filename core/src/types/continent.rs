use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Continent a country belongs to, stored and serialized by its display name.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Continent {
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    Africa,
    Oceania,
    Antarctica,
    #[serde(rename = "South America")]
    SouthAmerica,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Africa,
        Continent::Oceania,
        Continent::Antarctica,
        Continent::SouthAmerica,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Africa => "Africa",
            Continent::Oceania => "Oceania",
            Continent::Antarctica => "Antarctica",
            Continent::SouthAmerica => "South America",
        }
    }

    /// Looks a continent up by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown continent '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for continent in Continent::ALL {
            assert_eq!(Continent::from_name(continent.as_str()), Some(continent));
        }
    }

    #[test]
    fn serializes_by_display_name() {
        let json = serde_json::to_string(&Continent::NorthAmerica).unwrap();
        assert_eq!(json, "\"North America\"");
        let back: Continent = serde_json::from_str("\"South America\"").unwrap();
        assert_eq!(back, Continent::SouthAmerica);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("Atlantis".parse::<Continent>().is_err());
    }
}
