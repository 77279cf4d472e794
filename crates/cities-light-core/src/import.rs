// crates/cities-light-core/src/import.rs

//! # Bulk Import
//!
//! Applies [`crate::raw`] rows to a store one at a time. Each row is an
//! upsert: it updates the record found by geoname id (or by natural key when
//! the row has none) and creates a new record otherwise.
//!
//! A failing row is counted and logged; the batch carries on. When prefix
//! indexing is enabled it runs after each city commit and its failures are
//! counted separately, leaving the committed city in place.

use crate::autocomplete::index_city;
use crate::config::Settings;
use crate::error::{GeoError, Result};
use crate::model::{
    City, CityId, Continent, Country, CountryId, Entity, EntityKind, Region, RegionId,
};
use crate::raw::{CityRow, CountryRow, Dataset, RegionRow};
use crate::text::split_alternate_names;
use crate::traits::GeoStore;
use crate::unique::UniqueKey;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
}

/// A rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub entity: EntityKind,
    /// Position of the row in its list.
    pub row: usize,
    pub name: String,
    pub message: String,
}

/// Totals for one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub prefix_failures: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.failed
    }

    fn record<T>(
        &mut self,
        entity: EntityKind,
        row: usize,
        name: &str,
        result: &Result<(T, RowOutcome)>,
    ) {
        match result {
            Ok((_, RowOutcome::Created)) => self.created += 1,
            Ok((_, RowOutcome::Updated)) => self.updated += 1,
            Err(e) => {
                warn!(%entity, row, row_name = name, error = %e, "row rejected");
                self.failed += 1;
                self.errors.push(RowError {
                    entity,
                    row,
                    name: name.to_owned(),
                    message: e.to_string(),
                });
            }
        }
    }
}

fn upper(code: &Option<String>) -> Option<String> {
    code.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
}

fn parse_coordinate(field: &'static str, value: &Option<String>) -> Result<Option<Decimal>> {
    match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(v) => Decimal::from_str(v)
            .map(Some)
            .map_err(|e| GeoError::invalid(EntityKind::City, field, format!("{v:?}: {e}"))),
    }
}

fn outcome_of<T>(existing: &Option<T>) -> RowOutcome {
    if existing.is_some() {
        RowOutcome::Updated
    } else {
        RowOutcome::Created
    }
}

/// Row-by-row importer over any [`GeoStore`].
pub struct Importer<'a, S: GeoStore> {
    store: &'a mut S,
    settings: &'a Settings,
}

impl<'a, S: GeoStore> Importer<'a, S> {
    pub fn new(store: &'a mut S, settings: &'a Settings) -> Self {
        Importer { store, settings }
    }

    fn find_country(&self, key: UniqueKey) -> Option<Country> {
        match self.store.get_by_unique_key(&key) {
            Some(Entity::Country(c)) => Some(c),
            _ => None,
        }
    }

    fn find_region(&self, key: UniqueKey) -> Option<Region> {
        match self.store.get_by_unique_key(&key) {
            Some(Entity::Region(r)) => Some(r),
            _ => None,
        }
    }

    fn find_city(&self, key: UniqueKey) -> Option<City> {
        match self.store.get_by_unique_key(&key) {
            Some(Entity::City(c)) => Some(c),
            _ => None,
        }
    }

    fn country_by_code(&self, entity: EntityKind, code: &str) -> Result<CountryId> {
        self.find_country(UniqueKey::CountryCode2(code.trim().to_ascii_uppercase()))
            .and_then(|c| c.id)
            .ok_or_else(|| {
                GeoError::invalid(entity, "country_code", format!("unknown country {code:?}"))
            })
    }

    pub fn import_country(&mut self, row: &CountryRow) -> Result<(CountryId, RowOutcome)> {
        let code2 = upper(&row.code2);
        let code3 = upper(&row.code3);
        let continent = Continent::from_str(&row.continent)
            .map_err(|e| GeoError::invalid(EntityKind::Country, "continent", e))?;

        let existing = row
            .geoname_id
            .and_then(|id| self.find_country(UniqueKey::CountryGeonameId(id)))
            .or_else(|| {
                code2
                    .clone()
                    .and_then(|c| self.find_country(UniqueKey::CountryCode2(c)))
            })
            .or_else(|| self.find_country(UniqueKey::CountryName(row.name.clone())));
        let outcome = outcome_of(&existing);

        let mut country = existing.unwrap_or_else(|| Country::new(row.name.clone(), continent));
        country.name = row.name.clone();
        country.continent = continent;
        country.code2 = code2;
        country.code3 = code3;
        country.geoname_id = row.geoname_id.or(country.geoname_id);
        country.tld = row.tld.clone().unwrap_or_default();
        if let Some(alt) = &row.alternate_names {
            country.alternate_names = split_alternate_names(alt);
        }

        let id = self.store.save(country, self.settings)?;
        Ok((id, outcome))
    }

    pub fn import_region(&mut self, row: &RegionRow) -> Result<(RegionId, RowOutcome)> {
        let country = self.country_by_code(EntityKind::Region, &row.country_code)?;

        let existing = row
            .geoname_id
            .and_then(|id| self.find_region(UniqueKey::RegionGeonameId(id)))
            .or_else(|| {
                self.find_region(UniqueKey::RegionName {
                    country,
                    name: row.name.clone(),
                })
            });
        let outcome = outcome_of(&existing);

        let mut region = existing.unwrap_or_else(|| Region::new(row.name.clone(), country));
        region.name = row.name.clone();
        region.country = country;
        region.geoname_id = row.geoname_id.or(region.geoname_id);
        region.geoname_code = row.geoname_code.clone().or(region.geoname_code);
        if let Some(alt) = &row.alternate_names {
            region.alternate_names = split_alternate_names(alt);
        }

        let id = self.store.save(region, self.settings)?;
        Ok((id, outcome))
    }

    fn resolve_region(
        &self,
        row: &CityRow,
        country: Option<CountryId>,
    ) -> Result<Option<Region>> {
        if let Some(gid) = row.region_geoname_id {
            return self
                .find_region(UniqueKey::RegionGeonameId(gid))
                .map(Some)
                .ok_or_else(|| {
                    GeoError::invalid(
                        EntityKind::City,
                        "region_geoname_id",
                        format!("unknown region {gid}"),
                    )
                });
        }
        match (row.region_name.as_deref(), country) {
            (None, _) => Ok(None),
            (Some(name), Some(country)) => self
                .find_region(UniqueKey::RegionName {
                    country,
                    name: name.to_owned(),
                })
                .map(Some)
                .ok_or_else(|| {
                    GeoError::invalid(
                        EntityKind::City,
                        "region_name",
                        format!("unknown region {name:?}"),
                    )
                }),
            (Some(_), None) => Err(GeoError::invalid(
                EntityKind::City,
                "region_name",
                "needs country_code to resolve",
            )),
        }
    }

    pub fn import_city(&mut self, row: &CityRow) -> Result<(CityId, RowOutcome)> {
        let country = match row.country_code.as_deref() {
            Some(code) if !code.trim().is_empty() => {
                Some(self.country_by_code(EntityKind::City, code)?)
            }
            _ => None,
        };
        let region = self.resolve_region(row, country)?;
        let region_id = region.as_ref().and_then(|r| r.id);
        let resolved_country = country.or_else(|| region.as_ref().map(|r| r.country));

        let latitude = parse_coordinate("latitude", &row.latitude)?;
        let longitude = parse_coordinate("longitude", &row.longitude)?;

        let existing = row
            .geoname_id
            .and_then(|id| self.find_city(UniqueKey::CityGeonameId(id)))
            .or_else(|| {
                resolved_country.and_then(|country| {
                    self.find_city(UniqueKey::CityName {
                        country,
                        region: region_id,
                        name: row.name.clone(),
                        feature_class: row.feature_class.clone(),
                        feature_code: row.feature_code.clone(),
                    })
                })
            });
        let outcome = outcome_of(&existing);

        let mut city = existing.unwrap_or_else(|| City::new(row.name.clone()));
        city.name = row.name.clone();
        city.region = region_id;
        // left unset when only the region is known; derivation fills it in
        city.country = country;
        city.latitude = latitude;
        city.longitude = longitude;
        city.population = row.population;
        city.feature_class = row.feature_class.clone();
        city.feature_code = row.feature_code.clone();
        city.geoname_id = row.geoname_id.or(city.geoname_id);
        if let Some(alt) = &row.alternate_names {
            city.alternate_names = split_alternate_names(alt);
        }

        let id = self.store.save(city, self.settings)?;
        Ok((id, outcome))
    }

    /// Applies a whole dataset; never fails as a whole.
    pub fn import_dataset(&mut self, dataset: &Dataset) -> ImportReport {
        let mut report = ImportReport::default();

        for (i, row) in dataset.countries.iter().enumerate() {
            let result = self.import_country(row);
            report.record(EntityKind::Country, i, &row.name, &result);
        }
        for (i, row) in dataset.regions.iter().enumerate() {
            let result = self.import_region(row);
            report.record(EntityKind::Region, i, &row.name, &result);
        }
        for (i, row) in dataset.cities.iter().enumerate() {
            let result = self.import_city(row);
            report.record(EntityKind::City, i, &row.name, &result);

            if let Ok((id, _)) = result {
                if self.settings.index_prefixes {
                    if let Err(e) = index_city(&*self.store, id, self.settings) {
                        warn!(city = %id, error = %e, "prefix indexing failed");
                        report.prefix_failures += 1;
                    }
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            failed = report.failed,
            prefix_failures = report.prefix_failures,
            "import finished"
        );
        report
    }
}
