// crates/cities-light-core/src/model/entities.rs
use super::{CityId, Continent, CountryId, PrefixId, RegionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A country.
///
/// `name_ascii`, `slug` and `display_name` are derived on every write; see
/// [`crate::derive`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: Option<CountryId>,
    pub name: String,
    pub name_ascii: String,
    pub slug: String,
    pub display_name: String,
    pub geoname_id: Option<u32>,
    pub alternate_names: Vec<String>,

    pub code2: Option<String>, // e.g. "FR"
    pub code3: Option<String>, // e.g. "FRA"
    pub continent: Continent,
    pub tld: String,
}

impl Country {
    pub fn new(name: impl Into<String>, continent: Continent) -> Self {
        Country {
            id: None,
            name: name.into(),
            name_ascii: String::new(),
            slug: String::new(),
            display_name: String::new(),
            geoname_id: None,
            alternate_names: Vec::new(),
            code2: None,
            code3: None,
            continent,
            tld: String::new(),
        }
    }

    pub fn with_codes(mut self, code2: impl Into<String>, code3: impl Into<String>) -> Self {
        self.code2 = Some(code2.into());
        self.code3 = Some(code3.into());
        self
    }

    pub fn with_geoname_id(mut self, geoname_id: u32) -> Self {
        self.geoname_id = Some(geoname_id);
        self
    }

    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = tld.into();
        self
    }
}

/// A first-level administrative division (state, region, province...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: Option<RegionId>,
    pub name: String,
    pub name_ascii: String,
    pub slug: String,
    pub display_name: String,
    pub geoname_id: Option<u32>,
    pub alternate_names: Vec<String>,

    pub geoname_code: Option<String>, // e.g. "FR.11"
    pub country: CountryId,
}

impl Region {
    pub fn new(name: impl Into<String>, country: CountryId) -> Self {
        Region {
            id: None,
            name: name.into(),
            name_ascii: String::new(),
            slug: String::new(),
            display_name: String::new(),
            geoname_id: None,
            alternate_names: Vec::new(),
            geoname_code: None,
            country,
        }
    }

    pub fn with_geoname_id(mut self, geoname_id: u32) -> Self {
        self.geoname_id = Some(geoname_id);
        self
    }

    pub fn with_geoname_code(mut self, code: impl Into<String>) -> Self {
        self.geoname_code = Some(code.into());
        self
    }
}

/// A populated place.
///
/// `country` may be left unset when `region` is set; derivation fills it in
/// from the region before the record is committed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Option<CityId>,
    pub name: String,
    pub name_ascii: String,
    pub slug: String,
    pub display_name: String,
    pub geoname_id: Option<u32>,
    pub alternate_names: Vec<String>,

    pub region: Option<RegionId>,
    pub country: Option<CountryId>,
    /// Decimal degrees, at most 8 digits with 5 after the point.
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub population: Option<i64>,
    pub feature_class: Option<String>, // single character, e.g. "P"
    pub feature_code: Option<String>,  // e.g. "PPLC"
}

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        City {
            id: None,
            name: name.into(),
            name_ascii: String::new(),
            slug: String::new(),
            display_name: String::new(),
            geoname_id: None,
            alternate_names: Vec::new(),
            region: None,
            country: None,
            latitude: None,
            longitude: None,
            population: None,
            feature_class: None,
            feature_code: None,
        }
    }

    pub fn with_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_country(mut self, country: CountryId) -> Self {
        self.country = Some(country);
        self
    }

    pub fn with_population(mut self, population: i64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_feature(mut self, class: impl Into<String>, code: impl Into<String>) -> Self {
        self.feature_class = Some(class.into());
        self.feature_code = Some(code.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: Decimal, longitude: Decimal) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_geoname_id(mut self, geoname_id: u32) -> Self {
        self.geoname_id = Some(geoname_id);
        self
    }
}

/// Shared autocomplete dictionary entry. One row per distinct prefix text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityNamePrefix {
    pub id: PrefixId,
    pub prefix: String,
}
