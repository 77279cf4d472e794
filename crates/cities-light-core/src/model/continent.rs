// crates/cities-light-core/src/model/continent.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven continents, stored by their two-letter geonames code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "OC")]
    Oceania,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "AN")]
    Antarctica,
    #[serde(rename = "SA")]
    SouthAmerica,
    #[serde(rename = "AS")]
    Asia,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Oceania,
        Continent::Europe,
        Continent::Africa,
        Continent::NorthAmerica,
        Continent::Antarctica,
        Continent::SouthAmerica,
        Continent::Asia,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Continent::Oceania => "OC",
            Continent::Europe => "EU",
            Continent::Africa => "AF",
            Continent::NorthAmerica => "NA",
            Continent::Antarctica => "AN",
            Continent::SouthAmerica => "SA",
            Continent::Asia => "AS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Continent::Oceania => "Oceania",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            Continent::NorthAmerica => "North America",
            Continent::Antarctica => "Antarctica",
            Continent::SouthAmerica => "South America",
            Continent::Asia => "Asia",
        }
    }
}

impl FromStr for Continent {
    type Err = String;

    /// Accepts the two-letter code or the label, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Continent::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown continent {s:?}"))
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
