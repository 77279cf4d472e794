// crates/cities-light-core/src/derive.rs

//! # Derivation Engine
//!
//! Fills the computed columns of a record right before it is committed:
//!
//! 1. `name_ascii` back-fill: set to [`to_ascii`]`(name)` only when empty, so a
//!    manual override survives.
//! 2. `slug`: filled from `name_ascii` when empty.
//! 3. `display_name`: always recomputed.
//! 4. City only: `country` back-filled from `region.country` when unset.
//!
//! The city display name already uses the country resolved through the
//! region, so step 3 never needs a country that step 4 has not set yet.

use crate::config::Settings;
use crate::error::{GeoError, Result};
use crate::model::{City, Country, EntityKind, Region};
use crate::text::{slugify, to_ascii};
use crate::traits::Lookup;

/// Pre-commit derivation, implemented by every entity type.
pub trait Deriver {
    /// Mutates `self` in place. Related entities are only read via `lookup`.
    fn derive<L: Lookup + ?Sized>(&mut self, lookup: &L, settings: &Settings) -> Result<()>;
}

fn fill_name_ascii(name: &str, name_ascii: &mut String) {
    if name_ascii.is_empty() {
        *name_ascii = to_ascii(name);
    }
}

fn fill_slug(name_ascii: &str, slug: &mut String, settings: &Settings) {
    if slug.is_empty() {
        *slug = slugify(name_ascii, settings.max_slug_len);
    }
}

impl Deriver for Country {
    fn derive<L: Lookup + ?Sized>(&mut self, _lookup: &L, settings: &Settings) -> Result<()> {
        fill_name_ascii(&self.name, &mut self.name_ascii);
        fill_slug(&self.name_ascii, &mut self.slug, settings);
        self.display_name = self.name.clone();
        Ok(())
    }
}

impl Deriver for Region {
    fn derive<L: Lookup + ?Sized>(&mut self, lookup: &L, settings: &Settings) -> Result<()> {
        let country = lookup.country(self.country).ok_or_else(|| {
            GeoError::dangling(
                EntityKind::Region,
                "country",
                EntityKind::Country,
                self.country.get(),
            )
        })?;

        fill_name_ascii(&self.name, &mut self.name_ascii);
        fill_slug(&self.name_ascii, &mut self.slug, settings);
        self.display_name = format!("{}, {}", self.name, country.name);
        Ok(())
    }
}

impl Deriver for City {
    fn derive<L: Lookup + ?Sized>(&mut self, lookup: &L, settings: &Settings) -> Result<()> {
        let region = match self.region {
            Some(id) => Some(lookup.region(id).ok_or_else(|| {
                GeoError::dangling(EntityKind::City, "region", EntityKind::Region, id.get())
            })?),
            None => None,
        };

        let country_id = self
            .country
            .or_else(|| region.map(|r| r.country))
            .ok_or_else(|| {
                GeoError::invalid(
                    EntityKind::City,
                    "country",
                    "a city needs a region or a country",
                )
            })?;
        let country = lookup.country(country_id).ok_or_else(|| {
            GeoError::dangling(
                EntityKind::City,
                "country",
                EntityKind::Country,
                country_id.get(),
            )
        })?;

        fill_name_ascii(&self.name, &mut self.name_ascii);
        fill_slug(&self.name_ascii, &mut self.slug, settings);
        self.display_name = match region {
            Some(region) => format!("{}, {}, {}", self.name, region.name, country.name),
            None => format!("{}, {}", self.name, country.name),
        };

        if self.country.is_none() {
            self.country = Some(country_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityId, Continent, CountryId, RegionId};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Fixture {
        countries: HashMap<CountryId, Country>,
        regions: HashMap<RegionId, Region>,
    }

    impl Lookup for Fixture {
        fn country(&self, id: CountryId) -> Option<&Country> {
            self.countries.get(&id)
        }
        fn region(&self, id: RegionId) -> Option<&Region> {
            self.regions.get(&id)
        }
        fn city(&self, _id: CityId) -> Option<&City> {
            None
        }
    }

    fn fixture() -> Fixture {
        let mut f = Fixture::default();
        f.countries.insert(
            CountryId(1),
            Country::new("United States", Continent::NorthAmerica),
        );
        f.regions
            .insert(RegionId(7), Region::new("Texas", CountryId(1)));
        f
    }

    #[test]
    fn name_ascii_is_back_filled_once() {
        let f = fixture();
        let settings = Settings::default();

        let mut c = Country::new("Côte d'Ivoire", Continent::Africa);
        c.derive(&f, &settings).unwrap();
        assert_eq!(c.name_ascii, to_ascii("Côte d'Ivoire"));
        assert_eq!(c.slug, "cote-divoire");
        assert_eq!(c.display_name, "Côte d'Ivoire");

        let mut preset = Country::new("Côte d'Ivoire", Continent::Africa);
        preset.name_ascii = "PRESET".into();
        preset.derive(&f, &settings).unwrap();
        assert_eq!(preset.name_ascii, "PRESET");
        assert_eq!(preset.slug, "preset");
    }

    #[test]
    fn display_name_always_recomputed() {
        let f = fixture();
        let mut r = Region::new("Texas", CountryId(1));
        r.display_name = "stale".into();
        r.derive(&f, &Settings::default()).unwrap();
        assert_eq!(r.display_name, "Texas, United States");
    }

    #[test]
    fn region_with_dangling_country_fails() {
        let f = fixture();
        let mut r = Region::new("Nowhere", CountryId(99));
        let err = r.derive(&f, &Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            GeoError::DanglingReference {
                entity: EntityKind::Region,
                id: 99,
                ..
            }
        ));
        assert!(r.name_ascii.is_empty());
    }

    #[test]
    fn city_display_name_with_and_without_region() {
        let f = fixture();
        let settings = Settings::default();

        let mut with_region = City::new("Paris")
            .with_region(RegionId(7))
            .with_country(CountryId(1));
        with_region.derive(&f, &settings).unwrap();
        assert_eq!(with_region.display_name, "Paris, Texas, United States");

        let mut without_region = City::new("Paris").with_country(CountryId(1));
        without_region.derive(&f, &settings).unwrap();
        assert_eq!(without_region.display_name, "Paris, United States");
    }

    #[test]
    fn city_country_back_filled_from_region() {
        let f = fixture();
        let mut city = City::new("Paris").with_region(RegionId(7));
        city.derive(&f, &Settings::default()).unwrap();
        assert_eq!(city.country, Some(CountryId(1)));
        assert_eq!(city.display_name, "Paris, Texas, United States");
    }

    #[test]
    fn city_keeps_explicit_country() {
        let mut f = fixture();
        f.countries
            .insert(CountryId(2), Country::new("Mexico", Continent::NorthAmerica));
        let mut city = City::new("Paris")
            .with_region(RegionId(7))
            .with_country(CountryId(2));
        city.derive(&f, &Settings::default()).unwrap();
        assert_eq!(city.country, Some(CountryId(2)));
        assert_eq!(city.display_name, "Paris, Texas, Mexico");
    }

    #[test]
    fn city_without_region_or_country_is_invalid() {
        let f = fixture();
        let mut city = City::new("Atlantis");
        let err = city.derive(&f, &Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            GeoError::InvalidField {
                field: "country",
                ..
            }
        ));
    }

    #[test]
    fn city_with_dangling_region_fails() {
        let f = fixture();
        let mut city = City::new("Paris").with_region(RegionId(8));
        let err = city.derive(&f, &Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            GeoError::DanglingReference {
                target: EntityKind::Region,
                ..
            }
        ));
    }
}
