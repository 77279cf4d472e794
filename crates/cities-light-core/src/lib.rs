// crates/cities-light-core/src/lib.rs

//! # cities-light-core
//!
//! A normalized reference store of countries, regions and cities with the
//! derived fields needed for search: ASCII names, slugs, display names and
//! autocomplete prefixes.
//!
//! The write path is explicit: [`traits::GeoStore::save`] validates a record,
//! runs its [`derive::Deriver`] and commits it through the unique indexes.
//! Prefix indexing ([`autocomplete::index_city`]) is a separate, optional
//! step after the commit.
//!
//! ```rust
//! use cities_light_core::prelude::*;
//!
//! let settings = Settings::default();
//! let mut store = MemoryStore::new();
//!
//! let us = store.save(Country::new("United States", Continent::NorthAmerica), &settings)?;
//! let tx = store.save(Region::new("Texas", us), &settings)?;
//! let paris = store.save(City::new("Paris").with_region(tx).with_population(25_171), &settings)?;
//!
//! assert_eq!(store.city(paris).unwrap().display_name, "Paris, Texas, United States");
//!
//! index_city(&store, paris, &settings)?;
//! let hits = autocomplete(&store, "Paris Tex", 10, &settings);
//! assert_eq!(hits[0].id, Some(paris));
//! # Ok::<(), cities_light_core::GeoError>(())
//! ```

pub mod autocomplete;
pub mod common;
pub mod config;
pub mod derive;
pub mod error;
pub mod import;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod raw;
pub mod snapshot;
pub mod store;
pub mod text;
pub mod traits;
pub mod unique;
pub mod validate;

// Re-exports
pub use crate::common::DbStats;
pub use crate::config::Settings;
pub use crate::error::{GeoError, Result};
pub use crate::model::{
    City, CityId, CityNamePrefix, Continent, Country, CountryId, Entity, EntityKind, PrefixId,
    Region, RegionId,
};
pub use crate::store::MemoryStore;
pub use crate::traits::{GeoStore, Lookup};
