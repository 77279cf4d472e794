// crates/cities-light-core/src/validate.rs

//! Field-level checks that reject a record with [`GeoError::InvalidField`]
//! before derivation or commit touch it.

use crate::config::Settings;
use crate::error::{GeoError, Result};
use crate::model::{City, Country, EntityKind, Region};
use rust_decimal::Decimal;

/// Digits allowed after the decimal point in coordinates.
pub const COORD_DECIMAL_PLACES: u32 = 5;
/// Total digits allowed in coordinates.
pub const COORD_MAX_DIGITS: u32 = 8;

pub trait Validate {
    fn validate(&self, settings: &Settings) -> Result<()>;
}

fn check_name(entity: EntityKind, name: &str, settings: &Settings) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GeoError::invalid(entity, "name", "must not be empty"));
    }
    let len = name.chars().count();
    if len > settings.max_name_len {
        return Err(GeoError::invalid(
            entity,
            "name",
            format!("{len} characters, at most {} allowed", settings.max_name_len),
        ));
    }
    Ok(())
}

fn check_exact_len(
    entity: EntityKind,
    field: &'static str,
    value: Option<&str>,
    len: usize,
) -> Result<()> {
    match value {
        Some(v) if v.chars().count() != len => Err(GeoError::invalid(
            entity,
            field,
            format!("{v:?} must be exactly {len} characters"),
        )),
        _ => Ok(()),
    }
}

fn check_max_len(
    entity: EntityKind,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(GeoError::invalid(
            entity,
            field,
            format!("{v:?} is longer than {max} characters"),
        )),
        _ => Ok(()),
    }
}

/// Checks a coordinate against the column precision and the `±bound` range.
pub fn check_coordinate(field: &'static str, value: Decimal, bound: i64) -> Result<()> {
    let normalized = value.normalize();
    if normalized.scale() > COORD_DECIMAL_PLACES {
        return Err(GeoError::invalid(
            EntityKind::City,
            field,
            format!("{value} has more than {COORD_DECIMAL_PLACES} decimal places"),
        ));
    }
    let int_digits_limit = COORD_MAX_DIGITS - COORD_DECIMAL_PLACES;
    if normalized.abs() >= Decimal::from(10_i64.pow(int_digits_limit)) {
        return Err(GeoError::invalid(
            EntityKind::City,
            field,
            format!("{value} has more than {COORD_MAX_DIGITS} digits"),
        ));
    }
    if normalized.abs() > Decimal::from(bound) {
        return Err(GeoError::invalid(
            EntityKind::City,
            field,
            format!("{value} is outside [-{bound}, {bound}]"),
        ));
    }
    Ok(())
}

impl Validate for Country {
    fn validate(&self, settings: &Settings) -> Result<()> {
        let kind = EntityKind::Country;
        check_name(kind, &self.name, settings)?;
        check_exact_len(kind, "code2", self.code2.as_deref(), 2)?;
        check_exact_len(kind, "code3", self.code3.as_deref(), 3)?;
        check_max_len(kind, "tld", Some(&self.tld), 5)?;
        Ok(())
    }
}

impl Validate for Region {
    fn validate(&self, settings: &Settings) -> Result<()> {
        let kind = EntityKind::Region;
        check_name(kind, &self.name, settings)?;
        check_max_len(kind, "geoname_code", self.geoname_code.as_deref(), 50)?;
        Ok(())
    }
}

impl Validate for City {
    fn validate(&self, settings: &Settings) -> Result<()> {
        let kind = EntityKind::City;
        check_name(kind, &self.name, settings)?;

        if self.region.is_none() && self.country.is_none() {
            return Err(GeoError::invalid(
                kind,
                "country",
                "a city needs a region or a country",
            ));
        }

        check_exact_len(kind, "feature_class", self.feature_class.as_deref(), 1)?;
        check_max_len(kind, "feature_code", self.feature_code.as_deref(), 10)?;

        if let Some(p) = self.population {
            if p < 0 {
                return Err(GeoError::invalid(kind, "population", "must not be negative"));
            }
        }
        if let Some(lat) = self.latitude {
            check_coordinate("latitude", lat, 90)?;
        }
        if let Some(lng) = self.longitude {
            check_coordinate("longitude", lng, 180)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Continent, CountryId};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn country_codes_length() {
        let s = Settings::default();
        assert!(Country::new("France", Continent::Europe)
            .with_codes("FR", "FRA")
            .validate(&s)
            .is_ok());
        let err = Country::new("France", Continent::Europe)
            .with_codes("FRA", "FRA")
            .validate(&s)
            .unwrap_err();
        assert!(matches!(err, GeoError::InvalidField { field: "code2", .. }));
    }

    #[test]
    fn empty_and_long_names_rejected() {
        let s = Settings::default();
        assert!(Country::new("  ", Continent::Europe).validate(&s).is_err());
        let long = "x".repeat(201);
        assert!(Region::new(long, CountryId(1)).validate(&s).is_err());
    }

    #[test]
    fn city_needs_region_or_country() {
        let s = Settings::default();
        let err = City::new("Atlantis").validate(&s).unwrap_err();
        assert!(matches!(err, GeoError::InvalidField { field: "country", .. }));
        assert!(City::new("Paris").with_country(CountryId(1)).validate(&s).is_ok());
    }

    #[test]
    fn coordinates_precision_and_range() {
        assert!(check_coordinate("latitude", dec("48.85341"), 90).is_ok());
        assert!(check_coordinate("latitude", dec("48.853410000"), 90).is_ok());
        assert!(check_coordinate("latitude", dec("-90"), 90).is_ok());
        assert!(check_coordinate("latitude", dec("48.853411"), 90).is_err());
        assert!(check_coordinate("latitude", dec("90.00001"), 90).is_err());
        assert!(check_coordinate("longitude", dec("1000.5"), 180).is_err());
        assert!(check_coordinate("longitude", dec("-179.99999"), 180).is_ok());
    }

    #[test]
    fn feature_fields() {
        let s = Settings::default();
        let ok = City::new("Paris")
            .with_country(CountryId(1))
            .with_feature("P", "PPLC");
        assert!(ok.validate(&s).is_ok());

        let bad_class = City::new("Paris")
            .with_country(CountryId(1))
            .with_feature("PP", "PPLC");
        assert!(bad_class.validate(&s).is_err());

        let bad_code = City::new("Paris")
            .with_country(CountryId(1))
            .with_feature("P", "PPLCXXXXXXX");
        assert!(bad_code.validate(&s).is_err());

        let negative = City::new("Paris")
            .with_country(CountryId(1))
            .with_population(-1);
        assert!(negative.validate(&s).is_err());
    }
}
