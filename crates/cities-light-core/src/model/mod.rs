// crates/cities-light-core/src/model/mod.rs

//! # Entity Model
//!
//! Countries, regions and cities as stored rows. References between them are
//! typed ids; a record whose `id` is `None` has not been committed yet.

mod continent;
mod entities;

pub use continent::Continent;
pub use entities::{City, CityNamePrefix, Country, Region};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(raw: u32) -> Self {
                $name(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Primary key of a [`Country`].
    CountryId
);
entity_id!(
    /// Primary key of a [`Region`].
    RegionId
);
entity_id!(
    /// Primary key of a [`City`].
    CityId
);
entity_id!(
    /// Primary key of a [`CityNamePrefix`].
    PrefixId
);

/// Entity type tag, used in errors and unique-key lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Country,
    Region,
    City,
    CityNamePrefix,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Country => "country",
            EntityKind::Region => "region",
            EntityKind::City => "city",
            EntityKind::CityNamePrefix => "city_name_prefix",
        })
    }
}

/// Any committed-or-pending geographic record.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Country(Country),
    Region(Region),
    City(City),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Country(_) => EntityKind::Country,
            Entity::Region(_) => EntityKind::Region,
            Entity::City(_) => EntityKind::City,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Country(c) => &c.name,
            Entity::Region(r) => &r.name,
            Entity::City(c) => &c.name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Entity::Country(c) => &c.display_name,
            Entity::Region(r) => &r.display_name,
            Entity::City(c) => &c.display_name,
        }
    }
}

impl From<Country> for Entity {
    fn from(c: Country) -> Self {
        Entity::Country(c)
    }
}

impl From<Region> for Entity {
    fn from(r: Region) -> Self {
        Entity::Region(r)
    }
}

impl From<City> for Entity {
    fn from(c: City) -> Self {
        Entity::City(c)
    }
}

/// Id returned by a generic [`crate::traits::GeoStore::commit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    Country(CountryId),
    Region(RegionId),
    City(CityId),
}
