// crates/cities-light-core/src/traits.rs
use crate::config::Settings;
use crate::derive::Deriver;
use crate::error::Result;
use crate::model::{
    City, CityId, CityNamePrefix, Country, CountryId, Entity, EntityId, PrefixId, Region,
    RegionId,
};
use crate::text::fold_key;
use crate::unique::UniqueKey;
use crate::validate::Validate;
use std::collections::BTreeSet;

/// Read access to already-loaded related entities.
///
/// Derivation only ever dereferences through this trait; it never writes.
pub trait Lookup {
    fn country(&self, id: CountryId) -> Option<&Country>;
    fn region(&self, id: RegionId) -> Option<&Region>;
    fn city(&self, id: CityId) -> Option<&City>;
}

/// The relational store the core writes through.
///
/// Commits are atomic per entity: either every unique index accepts the row
/// or nothing changes. The prefix operations take `&self` and must be safe to
/// call from several threads at once.
pub trait GeoStore: Lookup {
    /// Finds the entity currently holding `key`.
    fn get_by_unique_key(&self, key: &UniqueKey) -> Option<Entity>;

    fn commit_country(&mut self, country: Country) -> Result<CountryId>;
    fn commit_region(&mut self, region: Region) -> Result<RegionId>;
    fn commit_city(&mut self, city: City) -> Result<CityId>;

    /// Returns the prefix entry for `text`, creating it on first use.
    ///
    /// Two concurrent callers asking for the same text get the same entry.
    fn get_or_create_prefix(&self, text: &str) -> Result<CityNamePrefix>;

    /// Links `city` to `prefix`. Returns `false` if the link already existed.
    fn associate(&self, city: CityId, prefix: PrefixId) -> Result<bool>;

    /// Unlinks `city` from every prefix not in `keep` and returns how many
    /// links were dropped. Prefix entries themselves are never removed.
    fn retain_links(&self, city: CityId, keep: &BTreeSet<PrefixId>) -> Result<usize>;

    /// Cities linked to the prefix entry with exactly this text.
    fn prefix_members(&self, text: &str) -> Vec<CityId>;

    fn commit(&mut self, entity: Entity) -> Result<EntityId> {
        Ok(match entity {
            Entity::Country(c) => EntityId::Country(self.commit_country(c)?),
            Entity::Region(r) => EntityId::Region(self.commit_region(r)?),
            Entity::City(c) => EntityId::City(self.commit_city(c)?),
        })
    }

    /// The write path: validate, derive, then commit.
    ///
    /// Nothing is written if any step fails. Prefix indexing is not part of
    /// this call; see [`crate::autocomplete::index_city`].
    fn save<R: Record>(&mut self, mut record: R, settings: &Settings) -> Result<R::Id>
    where
        Self: Sized,
    {
        record.validate(settings)?;
        record.derive(&*self, settings)?;
        record.commit_to(self)
    }
}

/// A geographic entity that can go through [`GeoStore::save`].
pub trait Record: Deriver + Validate + Sized {
    type Id: Copy + std::fmt::Debug;

    fn commit_to<S: GeoStore + ?Sized>(self, store: &mut S) -> Result<Self::Id>;
}

impl Record for Country {
    type Id = CountryId;

    fn commit_to<S: GeoStore + ?Sized>(self, store: &mut S) -> Result<CountryId> {
        store.commit_country(self)
    }
}

impl Record for Region {
    type Id = RegionId;

    fn commit_to<S: GeoStore + ?Sized>(self, store: &mut S) -> Result<RegionId> {
        store.commit_region(self)
    }
}

impl Record for City {
    type Id = CityId;

    fn commit_to<S: GeoStore + ?Sized>(self, store: &mut S) -> Result<CityId> {
        store.commit_city(self)
    }
}

/// Name-based matching helpers for types that expose a canonical name.
///
/// Comparisons go through [`fold_key`], so they ignore case and accents.
///
/// # Examples
/// ```rust
/// use cities_light_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Łódź").is_named("lodz"));
/// assert!(Place("Zürich").name_contains("zuri"));
/// ```
pub trait NameMatch {
    fn name_str(&self) -> &str;

    #[inline]
    fn is_named(&self, q: &str) -> bool {
        fold_key(self.name_str()) == fold_key(q)
    }

    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}

impl NameMatch for Country {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for Region {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for City {
    fn name_str(&self) -> &str {
        &self.name
    }
}
