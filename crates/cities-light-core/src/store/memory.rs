// crates/cities-light-core/src/store/memory.rs
use super::{PrefixDictionary, Table};
use crate::common::DbStats;
use crate::error::{GeoError, Result};
use crate::model::{
    City, CityId, CityNamePrefix, Country, CountryId, Entity, EntityKind, PrefixId, Region,
    RegionId,
};
use crate::snapshot::StoreSnapshot;
use crate::traits::{GeoStore, Lookup, NameMatch};
use crate::unique::{KeyPart, UniqueKey};
use std::collections::BTreeSet;
use tracing::debug;

/// A complete geographic store held in memory.
///
/// Writes need `&mut self`; the prefix dictionary is internally locked so
/// indexing can run from several threads over a shared `&MemoryStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    countries: Table<Country>,
    regions: Table<Region>,
    cities: Table<City>,
    prefixes: PrefixDictionary,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn city_ids(&self) -> Vec<CityId> {
        self.cities.iter().filter_map(|c| c.id).collect()
    }

    /// Regions of `country`, in id order.
    pub fn regions_of(&self, country: CountryId) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| r.country == country)
            .collect()
    }

    pub fn cities_of_region(&self, region: RegionId) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.region == Some(region))
            .collect()
    }

    pub fn cities_of_country(&self, country: CountryId) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.country == Some(country))
            .collect()
    }

    /// Find a country by code, trying ISO2 first and then ISO3 (both
    /// case-insensitive).
    pub fn find_country_by_code(&self, code: &str) -> Option<&Country> {
        let code = code.trim();
        self.countries
            .iter()
            .find(|c| {
                c.code2
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(code))
            })
            .or_else(|| {
                self.countries.iter().find(|c| {
                    c.code3
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case(code))
                })
            })
    }

    /// Exact name match through the unique index, falling back to an
    /// accent- and case-insensitive scan.
    pub fn find_country_by_name(&self, name: &str) -> Option<&Country> {
        let key = UniqueKey::CountryName(name.to_owned());
        self.countries
            .find(key.constraint(), &key.key())
            .or_else(|| self.countries.iter().find(|c| c.is_named(name)))
    }

    /// Same as [`MemoryStore::find_country_by_name`], scoped to one country.
    pub fn find_region(&self, country: CountryId, name: &str) -> Option<&Region> {
        let key = UniqueKey::RegionName {
            country,
            name: name.to_owned(),
        };
        self.regions.find(key.constraint(), &key.key()).or_else(|| {
            self.regions
                .iter()
                .find(|r| r.country == country && r.is_named(name))
        })
    }

    pub fn find_cities_by_substring(&self, substr: &str) -> Vec<&City> {
        if substr.trim().is_empty() {
            return Vec::new();
        }
        self.cities
            .iter()
            .filter(|c| c.name_contains(substr))
            .collect()
    }

    pub fn prefix_dictionary(&self) -> &PrefixDictionary {
        &self.prefixes
    }

    pub fn prefixes_of(&self, city: CityId) -> Vec<String> {
        self.prefixes.prefixes_of(city)
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            countries: self.countries.len(),
            regions: self.regions.len(),
            cities: self.cities.len(),
            prefixes: self.prefixes.len(),
            prefix_links: self.prefixes.link_count(),
        }
    }

    pub fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: StoreSnapshot::VERSION,
            countries: self.countries.iter().cloned().collect(),
            regions: self.regions.iter().cloned().collect(),
            cities: self.cities.iter().cloned().collect(),
            prefixes: self.prefixes.entries(),
            links: self.prefixes.links(),
        }
    }

    /// Rebuilds a store, re-checking every unique rule and reference.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        if snapshot.version != StoreSnapshot::VERSION {
            return Err(GeoError::InvalidData(format!(
                "snapshot version {} (expected {})",
                snapshot.version,
                StoreSnapshot::VERSION
            )));
        }
        let store = MemoryStore {
            countries: Table::from_rows(snapshot.countries)?,
            regions: Table::from_rows(snapshot.regions)?,
            cities: Table::from_rows(snapshot.cities)?,
            prefixes: PrefixDictionary::from_parts(snapshot.prefixes, snapshot.links)?,
        };

        for region in store.regions.iter() {
            store.check_country(EntityKind::Region, region.country)?;
        }
        for city in store.cities.iter() {
            store.check_city_refs(city)?;
        }
        for (city, _) in store.prefixes.links() {
            if !store.cities.contains(city.get()) {
                return Err(GeoError::InvalidData(format!(
                    "prefix link to unknown city #{city}"
                )));
            }
        }
        Ok(store)
    }

    fn check_country(&self, entity: EntityKind, id: CountryId) -> Result<()> {
        if self.countries.contains(id.get()) {
            Ok(())
        } else {
            Err(GeoError::dangling(entity, "country", EntityKind::Country, id.get()))
        }
    }

    fn check_city_refs(&self, city: &City) -> Result<()> {
        let country = city.country.ok_or_else(|| {
            GeoError::invalid(EntityKind::City, "country", "not resolved before commit")
        })?;
        self.check_country(EntityKind::City, country)?;
        if let Some(region) = city.region {
            if !self.regions.contains(region.get()) {
                return Err(GeoError::dangling(
                    EntityKind::City,
                    "region",
                    EntityKind::Region,
                    region.get(),
                ));
            }
        }
        Ok(())
    }
}

impl Lookup for MemoryStore {
    fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(id.get())
    }

    fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.get())
    }

    fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id.get())
    }
}

impl GeoStore for MemoryStore {
    fn get_by_unique_key(&self, key: &UniqueKey) -> Option<Entity> {
        let (name, tuple) = (key.constraint(), key.key());
        if tuple.contains(&KeyPart::Null) {
            return None;
        }
        match key.entity() {
            EntityKind::Country => self.countries.find(name, &tuple).cloned().map(Entity::Country),
            EntityKind::Region => self.regions.find(name, &tuple).cloned().map(Entity::Region),
            EntityKind::City => self.cities.find(name, &tuple).cloned().map(Entity::City),
            EntityKind::CityNamePrefix => None,
        }
    }

    fn commit_country(&mut self, country: Country) -> Result<CountryId> {
        let id = CountryId(self.countries.commit(country)?);
        debug!(%id, "country committed");
        Ok(id)
    }

    fn commit_region(&mut self, region: Region) -> Result<RegionId> {
        self.check_country(EntityKind::Region, region.country)?;
        let id = RegionId(self.regions.commit(region)?);
        debug!(%id, "region committed");
        Ok(id)
    }

    fn commit_city(&mut self, city: City) -> Result<CityId> {
        self.check_city_refs(&city)?;
        let id = CityId(self.cities.commit(city)?);
        debug!(%id, "city committed");
        Ok(id)
    }

    fn get_or_create_prefix(&self, text: &str) -> Result<CityNamePrefix> {
        if text.is_empty() {
            return Err(GeoError::invalid(
                EntityKind::CityNamePrefix,
                "prefix",
                "must not be empty",
            ));
        }
        self.prefixes.get_or_create(text)
    }

    fn associate(&self, city: CityId, prefix: PrefixId) -> Result<bool> {
        if !self.cities.contains(city.get()) {
            return Err(GeoError::dangling(
                EntityKind::CityNamePrefix,
                "city",
                EntityKind::City,
                city.get(),
            ));
        }
        if !self.prefixes.contains_id(prefix) {
            return Err(GeoError::dangling(
                EntityKind::City,
                "autocomplete_prefixes",
                EntityKind::CityNamePrefix,
                prefix.get(),
            ));
        }
        Ok(self.prefixes.associate(city, prefix))
    }

    fn retain_links(&self, city: CityId, keep: &BTreeSet<PrefixId>) -> Result<usize> {
        Ok(self.prefixes.retain_links(city, keep))
    }

    fn prefix_members(&self, text: &str) -> Vec<CityId> {
        self.prefixes.members(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::Continent;
    use crate::unique::{CITY_NATURAL_POPULATION, REGION_COUNTRY_NAME};

    fn seeded() -> (MemoryStore, CountryId, RegionId) {
        let s = Settings::default();
        let mut store = MemoryStore::new();
        let us = store
            .save(
                Country::new("United States", Continent::NorthAmerica).with_codes("US", "USA"),
                &s,
            )
            .unwrap();
        let tx = store.save(Region::new("Texas", us), &s).unwrap();
        (store, us, tx)
    }

    #[test]
    fn save_runs_derivation() {
        let (mut store, _, tx) = seeded();
        let id = store
            .save(City::new("Paris").with_region(tx), &Settings::default())
            .unwrap();
        let paris = store.city(id).unwrap();
        assert_eq!(paris.display_name, "Paris, Texas, United States");
        assert_eq!(paris.slug, "paris");
        assert!(paris.country.is_some());
    }

    #[test]
    fn duplicate_city_rejected_atomically() {
        let (mut store, us, tx) = seeded();
        let s = Settings::default();
        let city = City::new("Paris")
            .with_region(tx)
            .with_country(us)
            .with_feature("P", "PPL")
            .with_population(25_171);
        store.save(city.clone(), &s).unwrap();

        let err = store.save(city, &s).unwrap_err();
        assert_eq!(err.constraint(), Some(CITY_NATURAL_POPULATION));
        assert_eq!(store.stats().cities, 1);
    }

    #[test]
    fn region_name_unique_per_country() {
        let (mut store, us, _) = seeded();
        let s = Settings::default();
        let err = store.save(Region::new("Texas", us), &s).unwrap_err();
        assert_eq!(err.constraint(), Some(REGION_COUNTRY_NAME));

        let mx = store
            .save(Country::new("Mexico", Continent::NorthAmerica), &s)
            .unwrap();
        assert!(store.save(Region::new("Texas", mx), &s).is_ok());
    }

    #[test]
    fn commit_rejects_dangling_refs() {
        let (mut store, _, _) = seeded();
        let err = store
            .commit_region(Region::new("Nowhere", CountryId(77)))
            .unwrap_err();
        assert!(matches!(err, GeoError::DanglingReference { .. }));

        let err = store
            .commit_city(
                City::new("Lost")
                    .with_country(CountryId(1))
                    .with_region(RegionId(9)),
            )
            .unwrap_err();
        assert!(matches!(err, GeoError::DanglingReference { .. }));
    }

    #[test]
    fn unique_key_lookup() {
        let (store, us, tx) = seeded();
        match store.get_by_unique_key(&UniqueKey::CountryCode2("US".into())) {
            Some(Entity::Country(c)) => assert_eq!(c.id, Some(us)),
            other => panic!("unexpected {other:?}"),
        }
        let region = store.get_by_unique_key(&UniqueKey::RegionName {
            country: us,
            name: "Texas".into(),
        });
        let region_id = match region {
            Some(Entity::Region(r)) => r.id,
            _ => None,
        };
        assert_eq!(region_id, Some(tx));
        assert!(store
            .get_by_unique_key(&UniqueKey::CountryCode3("FRA".into()))
            .is_none());
    }

    #[test]
    fn tolerant_lookups() {
        let (mut store, us, _) = seeded();
        let s = Settings::default();
        store
            .save(
                Country::new("Côte d'Ivoire", Continent::Africa).with_codes("CI", "CIV"),
                &s,
            )
            .unwrap();
        assert_eq!(
            store.find_country_by_code("usa").and_then(|c| c.id),
            Some(us)
        );
        assert_eq!(
            store
                .find_country_by_name("cote d'ivoire")
                .map(|c| c.code2.as_deref()),
            Some(Some("CI"))
        );
        assert!(store.find_region(us, "TEXAS").is_some());
    }

    #[test]
    fn associate_checks_both_sides() {
        let (mut store, _, tx) = seeded();
        let city = store
            .save(City::new("Austin").with_region(tx), &Settings::default())
            .unwrap();
        let p = store.get_or_create_prefix("aus").unwrap();
        assert!(store.associate(city, p.id).unwrap());
        assert!(!store.associate(city, p.id).unwrap());
        assert!(store.associate(CityId(99), p.id).is_err());
        assert!(store.associate(city, PrefixId(99)).is_err());
        assert!(store.get_or_create_prefix("").is_err());
    }
}
