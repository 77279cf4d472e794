// crates/cities-light-core/src/store/mod.rs

//! # Store
//!
//! In-memory implementation of [`crate::traits::GeoStore`]: one [`Table`]
//! per entity type with its unique indexes, plus the shared
//! [`PrefixDictionary`].

mod memory;
mod prefix;
mod table;

pub use memory::MemoryStore;
pub use prefix::PrefixDictionary;
pub use table::Table;
