// crates/cities-light-core/src/unique.rs

//! # Uniqueness Enforcer
//!
//! Every entity type declares its unique constraints as a static list of
//! named column tuples ([`Keyed::CONSTRAINTS`]). The store keeps one hash
//! index per constraint and consults it before every commit.
//!
//! A rule whose tuple contains an unset column is not enforced for that row
//! ([`NullPolicy::Skip`]), the way SQL unique constraints ignore NULLs. Two
//! region-less cities with the same name in one country may both exist.
//! [`NullPolicy::Compare`] is reserved for tuples whose columns are always
//! set (country name, region country + name).

use crate::error::{GeoError, Result};
use crate::model::{City, CityId, Country, CountryId, EntityKind, Region, RegionId};
use std::collections::HashMap;

pub const COUNTRY_NAME: &str = "country_name_key";
pub const COUNTRY_CODE2: &str = "country_code2_key";
pub const COUNTRY_CODE3: &str = "country_code3_key";
pub const COUNTRY_GEONAME_ID: &str = "country_geoname_id_key";
pub const REGION_COUNTRY_NAME: &str = "region_country_name_key";
pub const REGION_GEONAME_ID: &str = "region_geoname_id_key";
pub const CITY_NATURAL_POPULATION: &str =
    "city_country_region_name_feature_class_feature_code_population_key";
pub const CITY_NATURAL: &str = "city_country_region_name_feature_class_feature_code_key";
pub const CITY_GEONAME_ID: &str = "city_geoname_id_key";

/// One column value inside a composite key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Null,
    Id(u32),
    Int(i64),
    Text(String),
}

impl KeyPart {
    fn text(v: Option<&str>) -> KeyPart {
        v.map_or(KeyPart::Null, |s| KeyPart::Text(s.to_owned()))
    }

    fn id(v: Option<u32>) -> KeyPart {
        v.map_or(KeyPart::Null, KeyPart::Id)
    }
}

pub type CompositeKey = Vec<KeyPart>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullPolicy {
    /// Not enforced when any column is unset.
    Skip,
    /// Unset columns compare equal to each other.
    Compare,
}

/// A named unique rule over one or more columns.
#[derive(Clone, Copy, Debug)]
pub struct Constraint {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub nulls: NullPolicy,
}

impl Constraint {
    pub const fn new(
        name: &'static str,
        columns: &'static [&'static str],
        nulls: NullPolicy,
    ) -> Self {
        Constraint {
            name,
            columns,
            nulls,
        }
    }
}

/// Implemented by every table row type.
pub trait Keyed {
    const KIND: EntityKind;
    const CONSTRAINTS: &'static [Constraint];

    /// Value of `column` as used in key tuples. Unknown columns read as
    /// [`KeyPart::Null`].
    fn column(&self, column: &str) -> KeyPart;

    fn row_id(&self) -> Option<u32>;
    fn set_row_id(&mut self, id: u32);

    /// Key tuple of `self` under `constraint`, or `None` when the rule does
    /// not apply to this row.
    fn key_for(&self, constraint: &Constraint) -> Option<CompositeKey> {
        let key: CompositeKey = constraint.columns.iter().map(|c| self.column(c)).collect();
        if constraint.nulls == NullPolicy::Skip && key.contains(&KeyPart::Null) {
            None
        } else {
            Some(key)
        }
    }
}

impl Keyed for Country {
    const KIND: EntityKind = EntityKind::Country;
    const CONSTRAINTS: &'static [Constraint] = &[
        Constraint::new(COUNTRY_NAME, &["name"], NullPolicy::Compare),
        Constraint::new(COUNTRY_CODE2, &["code2"], NullPolicy::Skip),
        Constraint::new(COUNTRY_CODE3, &["code3"], NullPolicy::Skip),
        Constraint::new(COUNTRY_GEONAME_ID, &["geoname_id"], NullPolicy::Skip),
    ];

    fn column(&self, column: &str) -> KeyPart {
        match column {
            "name" => KeyPart::Text(self.name.clone()),
            "code2" => KeyPart::text(self.code2.as_deref()),
            "code3" => KeyPart::text(self.code3.as_deref()),
            "geoname_id" => KeyPart::id(self.geoname_id),
            _ => KeyPart::Null,
        }
    }

    fn row_id(&self) -> Option<u32> {
        self.id.map(CountryId::get)
    }

    fn set_row_id(&mut self, id: u32) {
        self.id = Some(CountryId(id));
    }
}

impl Keyed for Region {
    const KIND: EntityKind = EntityKind::Region;
    const CONSTRAINTS: &'static [Constraint] = &[
        Constraint::new(REGION_COUNTRY_NAME, &["country", "name"], NullPolicy::Compare),
        Constraint::new(REGION_GEONAME_ID, &["geoname_id"], NullPolicy::Skip),
    ];

    fn column(&self, column: &str) -> KeyPart {
        match column {
            "country" => KeyPart::Id(self.country.get()),
            "name" => KeyPart::Text(self.name.clone()),
            "geoname_id" => KeyPart::id(self.geoname_id),
            _ => KeyPart::Null,
        }
    }

    fn row_id(&self) -> Option<u32> {
        self.id.map(RegionId::get)
    }

    fn set_row_id(&mut self, id: u32) {
        self.id = Some(RegionId(id));
    }
}

impl Keyed for City {
    const KIND: EntityKind = EntityKind::City;
    // The population rule is implied by the one after it. Both stay
    // enforced until the owners of the dataset retire one of them.
    const CONSTRAINTS: &'static [Constraint] = &[
        Constraint::new(
            CITY_NATURAL_POPULATION,
            &[
                "country",
                "region",
                "name",
                "feature_class",
                "feature_code",
                "population",
            ],
            NullPolicy::Skip,
        ),
        Constraint::new(
            CITY_NATURAL,
            &["country", "region", "name", "feature_class", "feature_code"],
            NullPolicy::Skip,
        ),
        Constraint::new(CITY_GEONAME_ID, &["geoname_id"], NullPolicy::Skip),
    ];

    fn column(&self, column: &str) -> KeyPart {
        match column {
            "country" => KeyPart::id(self.country.map(CountryId::get)),
            "region" => KeyPart::id(self.region.map(RegionId::get)),
            "name" => KeyPart::Text(self.name.clone()),
            "feature_class" => KeyPart::text(self.feature_class.as_deref()),
            "feature_code" => KeyPart::text(self.feature_code.as_deref()),
            "population" => self.population.map_or(KeyPart::Null, KeyPart::Int),
            "geoname_id" => KeyPart::id(self.geoname_id),
            _ => KeyPart::Null,
        }
    }

    fn row_id(&self) -> Option<u32> {
        self.id.map(CityId::get)
    }

    fn set_row_id(&mut self, id: u32) {
        self.id = Some(CityId(id));
    }
}

/// Hash indexes backing every constraint of one table.
#[derive(Debug, Default)]
pub struct UniqueIndex {
    maps: HashMap<&'static str, HashMap<CompositeKey, u32>>,
}

impl UniqueIndex {
    pub fn find(&self, constraint: &str, key: &CompositeKey) -> Option<u32> {
        self.maps.get(constraint).and_then(|m| m.get(key)).copied()
    }

    /// Verifies `record` against every constraint of its type.
    ///
    /// Returns the keys to insert on success; the row itself (same
    /// `row_id`) never conflicts with its previous version.
    pub fn check<T: Keyed>(&self, record: &T) -> Result<Vec<(&'static str, CompositeKey)>> {
        let own_id = record.row_id();
        let mut keys = Vec::with_capacity(T::CONSTRAINTS.len());
        for constraint in T::CONSTRAINTS {
            let Some(key) = record.key_for(constraint) else {
                continue;
            };
            if let Some(holder) = self.find(constraint.name, &key) {
                if Some(holder) != own_id {
                    return Err(GeoError::DuplicateKey {
                        constraint: constraint.name,
                    });
                }
            }
            keys.push((constraint.name, key));
        }
        Ok(keys)
    }

    pub fn insert(&mut self, id: u32, keys: Vec<(&'static str, CompositeKey)>) {
        for (name, key) in keys {
            self.maps.entry(name).or_default().insert(key, id);
        }
    }

    /// Drops every key currently held by `record` (stored under `id`).
    pub fn remove<T: Keyed>(&mut self, id: u32, record: &T) {
        for constraint in T::CONSTRAINTS {
            let Some(key) = record.key_for(constraint) else {
                continue;
            };
            if let Some(map) = self.maps.get_mut(constraint.name) {
                if map.get(&key) == Some(&id) {
                    map.remove(&key);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }
}

/// A lookup by one of the declared unique constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UniqueKey {
    CountryName(String),
    CountryCode2(String),
    CountryCode3(String),
    CountryGeonameId(u32),
    RegionName {
        country: CountryId,
        name: String,
    },
    RegionGeonameId(u32),
    /// Matches nothing when `region` or either feature field is `None`,
    /// since such rows are not held by the natural key index.
    CityName {
        country: CountryId,
        region: Option<RegionId>,
        name: String,
        feature_class: Option<String>,
        feature_code: Option<String>,
    },
    CityGeonameId(u32),
}

impl UniqueKey {
    pub fn entity(&self) -> EntityKind {
        match self {
            UniqueKey::CountryName(_)
            | UniqueKey::CountryCode2(_)
            | UniqueKey::CountryCode3(_)
            | UniqueKey::CountryGeonameId(_) => EntityKind::Country,
            UniqueKey::RegionName { .. } | UniqueKey::RegionGeonameId(_) => EntityKind::Region,
            UniqueKey::CityName { .. } | UniqueKey::CityGeonameId(_) => EntityKind::City,
        }
    }

    /// Name of the constraint this lookup goes through.
    pub fn constraint(&self) -> &'static str {
        match self {
            UniqueKey::CountryName(_) => COUNTRY_NAME,
            UniqueKey::CountryCode2(_) => COUNTRY_CODE2,
            UniqueKey::CountryCode3(_) => COUNTRY_CODE3,
            UniqueKey::CountryGeonameId(_) => COUNTRY_GEONAME_ID,
            UniqueKey::RegionName { .. } => REGION_COUNTRY_NAME,
            UniqueKey::RegionGeonameId(_) => REGION_GEONAME_ID,
            UniqueKey::CityName { .. } => CITY_NATURAL,
            UniqueKey::CityGeonameId(_) => CITY_GEONAME_ID,
        }
    }

    /// Key tuple in the column order of [`UniqueKey::constraint`].
    pub fn key(&self) -> CompositeKey {
        match self {
            UniqueKey::CountryName(s) | UniqueKey::CountryCode2(s) | UniqueKey::CountryCode3(s) => {
                vec![KeyPart::Text(s.clone())]
            }
            UniqueKey::CountryGeonameId(id)
            | UniqueKey::RegionGeonameId(id)
            | UniqueKey::CityGeonameId(id) => vec![KeyPart::Id(*id)],
            UniqueKey::RegionName { country, name } => {
                vec![KeyPart::Id(country.get()), KeyPart::Text(name.clone())]
            }
            UniqueKey::CityName {
                country,
                region,
                name,
                feature_class,
                feature_code,
            } => vec![
                KeyPart::Id(country.get()),
                KeyPart::id(region.map(RegionId::get)),
                KeyPart::Text(name.clone()),
                KeyPart::text(feature_class.as_deref()),
                KeyPart::text(feature_code.as_deref()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Continent;

    fn city() -> City {
        City::new("Paris")
            .with_country(CountryId(1))
            .with_region(RegionId(2))
            .with_feature("P", "PPL")
            .with_population(25_000)
    }

    #[test]
    fn every_declared_column_resolves() {
        let mut full = city().with_geoname_id(4717560);
        full.id = Some(CityId(1));
        for c in City::CONSTRAINTS {
            for col in c.columns {
                assert_ne!(full.column(col), KeyPart::Null, "{}.{col}", c.name);
            }
        }
        let country = Country::new("France", Continent::Europe)
            .with_codes("FR", "FRA")
            .with_geoname_id(3017382);
        for c in Country::CONSTRAINTS {
            for col in c.columns {
                assert_ne!(country.column(col), KeyPart::Null, "{}.{col}", c.name);
            }
        }
    }

    #[test]
    fn skip_policy_ignores_unset_columns() {
        let c = Country::new("France", Continent::Europe);
        let code2 = &Country::CONSTRAINTS[1];
        assert_eq!(code2.name, COUNTRY_CODE2);
        assert!(c.key_for(code2).is_none());
        assert!(c.key_for(&Country::CONSTRAINTS[0]).is_some());
    }

    #[test]
    fn city_natural_keys_skip_unset_columns() {
        let mut index = UniqueIndex::default();
        let country_only = City::new("Springfield").with_country(CountryId(1));
        for c in City::CONSTRAINTS {
            assert!(country_only.key_for(c).is_none(), "{}", c.name);
        }
        let keys = index.check(&country_only).unwrap();
        assert!(keys.is_empty());
        index.insert(1, keys);
        assert!(index.check(&country_only).is_ok());

        // population alone unset: only the six-column rule is skipped
        let mut no_population = city();
        no_population.population = None;
        let keys = index.check(&no_population).unwrap();
        assert_eq!(
            keys.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec![CITY_NATURAL]
        );
    }

    #[test]
    fn duplicate_six_column_key_detected() {
        let mut index = UniqueIndex::default();
        let first = city();
        let keys = index.check(&first).unwrap();
        index.insert(1, keys);

        let err = index.check(&city()).unwrap_err();
        assert_eq!(err.constraint(), Some(CITY_NATURAL_POPULATION));
    }

    #[test]
    fn five_column_key_catches_population_change() {
        let mut index = UniqueIndex::default();
        let keys = index.check(&city()).unwrap();
        index.insert(1, keys);

        let other = city().with_population(30_000);
        let err = index.check(&other).unwrap_err();
        assert_eq!(err.constraint(), Some(CITY_NATURAL));
    }

    #[test]
    fn same_row_does_not_conflict_with_itself() {
        let mut index = UniqueIndex::default();
        let mut first = city();
        first.id = Some(CityId(1));
        let keys = index.check(&first).unwrap();
        index.insert(1, keys);
        assert!(index.check(&first).is_ok());
    }

    #[test]
    fn remove_releases_keys() {
        let mut index = UniqueIndex::default();
        let first = city();
        let keys = index.check(&first).unwrap();
        index.insert(1, keys);
        index.remove(1, &first);
        assert!(index.check(&city()).is_ok());
    }

    #[test]
    fn unique_key_matches_record_key() {
        let c = city();
        let lookup = UniqueKey::CityName {
            country: CountryId(1),
            region: Some(RegionId(2)),
            name: "Paris".into(),
            feature_class: Some("P".into()),
            feature_code: Some("PPL".into()),
        };
        let constraint = City::CONSTRAINTS
            .iter()
            .find(|k| k.name == lookup.constraint())
            .unwrap();
        assert_eq!(c.key_for(constraint), Some(lookup.key()));
        assert_eq!(lookup.entity(), EntityKind::City);
    }
}
