// crates/cities-light-core/src/raw.rs

//! Import row types.
//!
//! These mirror what the upstream import tooling hands over: already parsed,
//! one record per row, with references expressed by natural keys (country
//! ISO2 code, region geoname id or name) rather than store ids.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRow {
    #[serde(default)]
    pub geoname_id: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub code2: Option<String>,
    #[serde(default)]
    pub code3: Option<String>,
    /// Two-letter code ("EU") or label ("Europe").
    pub continent: String,
    #[serde(default)]
    pub tld: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub alternate_names: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    #[serde(default)]
    pub geoname_id: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub geoname_code: Option<String>,
    /// ISO2 code of the owning country.
    pub country_code: String,
    #[serde(default)]
    pub alternate_names: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityRow {
    #[serde(default)]
    pub geoname_id: Option<u32>,
    pub name: String,
    /// ISO2 code; may be omitted when the region identifies the country.
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub region_geoname_id: Option<u32>,
    /// Region name inside `country_code`, used when no region geoname id is given.
    #[serde(default)]
    pub region_name: Option<String>,
    /// Decimal degrees as text, e.g. "48.85341".
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub feature_class: Option<String>,
    #[serde(default)]
    pub feature_code: Option<String>,
    #[serde(default)]
    pub alternate_names: Option<String>,
}

/// A full import batch. Rows are applied countries first, then regions,
/// then cities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub countries: Vec<CountryRow>,
    #[serde(default)]
    pub regions: Vec<RegionRow>,
    #[serde(default)]
    pub cities: Vec<CityRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.countries.len() + self.regions.len() + self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
