// crates/cities-light-core/src/snapshot.rs

//! # Snapshots
//!
//! Persists a whole [`MemoryStore`] as bincode, optionally gzip-wrapped.
//! Loading re-runs every unique and reference check, so a tampered or
//! truncated file is rejected instead of yielding a corrupt store.

use crate::error::{GeoError, Result};
use crate::model::{City, CityId, CityNamePrefix, Country, PrefixId, Region};
use crate::store::MemoryStore;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Refuse to decode anything bigger than this.
const DECODE_LIMIT: u64 = 256 * 1024 * 1024;

/// Serializable image of a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub countries: Vec<Country>,
    pub regions: Vec<Region>,
    pub cities: Vec<City>,
    pub prefixes: Vec<CityNamePrefix>,
    pub links: Vec<(CityId, PrefixId)>,
}

impl StoreSnapshot {
    pub const VERSION: u32 = 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl Default for CompressionMode {
    fn default() -> Self {
        #[cfg(feature = "compact")]
        {
            CompressionMode::Gzip
        }
        #[cfg(not(feature = "compact"))]
        {
            CompressionMode::None
        }
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(DECODE_LIMIT)
        .allow_trailing_bytes()
}

/// Encodes `store` into bytes (never compressed).
pub fn to_bytes(store: &MemoryStore) -> Result<Vec<u8>> {
    Ok(options().serialize(&store.to_snapshot())?)
}

/// Decodes and validates a store from [`to_bytes`] output.
pub fn from_bytes(data: &[u8]) -> Result<MemoryStore> {
    let snapshot: StoreSnapshot = options().deserialize(data)?;
    MemoryStore::from_snapshot(snapshot)
}

/// Writes `store` to `path`.
pub fn save(
    store: &MemoryStore,
    path: impl AsRef<Path>,
    compression: CompressionMode,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder: Box<dyn Write> = match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                Box::new(GzEncoder::new(writer, Compression::default()))
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(GeoError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ));
            }
        }
        CompressionMode::None => Box::new(writer),
    };

    options().serialize_into(&mut encoder, &store.to_snapshot())?;
    encoder.flush()?;
    drop(encoder);

    let stats = store.stats();
    info!(
        path = %path.display(),
        countries = stats.countries,
        regions = stats.regions,
        cities = stats.cities,
        prefixes = stats.prefixes,
        "snapshot saved"
    );
    Ok(())
}

/// Reads a store written by [`save`] with the same `compression`.
pub fn load(path: impl AsRef<Path>, compression: CompressionMode) -> Result<MemoryStore> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Snapshot not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    let mut stream: Box<dyn Read> = match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                Box::new(GzDecoder::new(reader))
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(GeoError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ));
            }
        }
        CompressionMode::None => Box::new(reader),
    };

    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    let store = from_bytes(&data)?;
    info!(path = %path.display(), cities = store.stats().cities, "snapshot loaded");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::model::Continent;
    use crate::traits::GeoStore;

    #[test]
    fn bytes_round_trip_keeps_indexes() {
        let s = Settings::default();
        let mut store = MemoryStore::new();
        let fr = store
            .save(Country::new("France", Continent::Europe).with_codes("FR", "FRA"), &s)
            .unwrap();
        let city = store.save(City::new("Lyon").with_country(fr), &s).unwrap();
        let p = store.get_or_create_prefix("lyo").unwrap();
        store.associate(city, p.id).unwrap();

        let mut restored = from_bytes(&to_bytes(&store).unwrap()).unwrap();
        assert_eq!(restored.stats(), store.stats());
        assert_eq!(restored.prefix_members("lyo"), vec![city]);

        // unique index was rebuilt
        let err = restored
            .save(Country::new("France", Continent::Europe), &s)
            .unwrap_err();
        assert!(err.constraint().is_some());
        // ids keep counting from the restored maximum
        let de = restored
            .save(Country::new("Germany", Continent::Europe), &s)
            .unwrap();
        assert_eq!(de.get(), fr.get() + 1);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(from_bytes(b"not a snapshot").is_err());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut snap = MemoryStore::new().to_snapshot();
        snap.version = 99;
        assert!(MemoryStore::from_snapshot(snap).is_err());
    }
}
