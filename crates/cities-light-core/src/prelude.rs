//! cities-light prelude: bring common types and traits into scope.

pub use crate::autocomplete::{autocomplete, index_cities, index_city};
pub use crate::common::DbStats;
pub use crate::config::Settings;
pub use crate::derive::Deriver;
pub use crate::error::{GeoError, Result};
pub use crate::import::{ImportReport, Importer};
pub use crate::model::{
    City, CityId, CityNamePrefix, Continent, Country, CountryId, Entity, EntityKind, PrefixId,
    Region, RegionId,
};
pub use crate::raw::{CityRow, CountryRow, Dataset, RegionRow};
pub use crate::snapshot::CompressionMode;
pub use crate::store::MemoryStore;
pub use crate::text::{to_ascii, to_search_key};
pub use crate::traits::{GeoStore, Lookup, NameMatch};
pub use crate::unique::UniqueKey;
pub use crate::validate::Validate;
