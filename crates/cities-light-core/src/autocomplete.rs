// crates/cities-light-core/src/autocomplete.rs

//! # Autocomplete Prefix Indexer
//!
//! For a committed city, two query strings are indexed:
//! `key(name)` and `key(name) + key(region.name)`, where `key` is
//! [`to_search_key`]. Every prefix of at least `min_prefix_len` characters of
//! either string is linked to the city through the shared prefix dictionary.
//! The country name is never part of an indexed string.
//!
//! Indexing runs after the city commit and is allowed to fail on its own:
//! an indexing error never undoes the commit.

use crate::config::Settings;
use crate::error::{GeoError, Result};
use crate::model::{City, CityId, EntityKind};
use crate::text::to_search_key;
use crate::traits::GeoStore;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The two strings indexed for a city.
pub fn prefix_queries(city_name: &str, region_name: Option<&str>) -> [String; 2] {
    let city_key = to_search_key(city_name);
    let region_key = region_name.map(to_search_key).unwrap_or_default();
    let combined = format!("{city_key}{region_key}");
    [city_key, combined]
}

/// Prefixes of `query` from `min_len` up to its full length.
///
/// Search keys are pure ASCII, so byte slicing is character slicing here.
pub fn prefixes(query: &str, min_len: usize) -> impl Iterator<Item = &str> {
    let start = min_len.max(1);
    (start..=query.len())
        .filter(move |&i| query.is_char_boundary(i))
        .map(move |i| &query[..i])
}

/// Distinct prefix texts for a city, sorted.
pub fn city_prefixes(
    city_name: &str,
    region_name: Option<&str>,
    min_len: usize,
) -> BTreeSet<String> {
    prefix_queries(city_name, region_name)
        .iter()
        .flat_map(|q| prefixes(q, min_len).map(str::to_owned).collect::<Vec<_>>())
        .collect()
}

/// What one [`index_city`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOutcome {
    /// Distinct prefixes the city is linked to.
    pub prefixes: usize,
    /// Links created by this call (0 when re-indexing an indexed city).
    pub new_links: usize,
    /// Links dropped because the city no longer matches them.
    pub stale_links: usize,
}

/// Links `city` to all of its prefixes and drops links left over from a
/// previous name or region.
///
/// The city must already be committed with its country resolved.
pub fn index_city<S: GeoStore + ?Sized>(
    store: &S,
    city: CityId,
    settings: &Settings,
) -> Result<IndexOutcome> {
    let record = store
        .city(city)
        .ok_or_else(|| GeoError::NotFound(format!("city #{city}")))?;

    let country = record.country.ok_or_else(|| {
        GeoError::invalid(EntityKind::City, "country", "not resolved before indexing")
    })?;
    if store.country(country).is_none() {
        return Err(GeoError::dangling(
            EntityKind::City,
            "country",
            EntityKind::Country,
            country.get(),
        ));
    }

    let region_name = match record.region {
        Some(id) => Some(
            store
                .region(id)
                .ok_or_else(|| {
                    GeoError::dangling(EntityKind::City, "region", EntityKind::Region, id.get())
                })?
                .name
                .as_str(),
        ),
        None => None,
    };

    let texts = city_prefixes(&record.name, region_name, settings.min_prefix_len);
    let mut outcome = IndexOutcome {
        prefixes: texts.len(),
        ..IndexOutcome::default()
    };
    let mut keep = BTreeSet::new();
    for text in &texts {
        let entry = store.get_or_create_prefix(text)?;
        if store.associate(city, entry.id)? {
            outcome.new_links += 1;
        }
        keep.insert(entry.id);
    }
    outcome.stale_links = store.retain_links(city, &keep)?;
    debug!(
        %city,
        prefixes = outcome.prefixes,
        new = outcome.new_links,
        stale = outcome.stale_links,
        "city indexed"
    );
    Ok(outcome)
}

/// Totals over a batch of [`index_city`] calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    pub new_links: usize,
    pub stale_links: usize,
    pub failed: Vec<(CityId, String)>,
}

impl IndexReport {
    fn record(mut self, city: CityId, result: Result<IndexOutcome>) -> Self {
        match result {
            Ok(outcome) => {
                self.indexed += 1;
                self.new_links += outcome.new_links;
                self.stale_links += outcome.stale_links;
            }
            Err(e) => {
                warn!(%city, error = %e, "prefix indexing failed");
                self.failed.push((city, e.to_string()));
            }
        }
        self
    }

    fn merge(mut self, other: IndexReport) -> Self {
        self.indexed += other.indexed;
        self.new_links += other.new_links;
        self.stale_links += other.stale_links;
        self.failed.extend(other.failed);
        self
    }
}

/// Indexes `cities` in parallel on the rayon thread pool.
///
/// A failing city is reported and skipped; the others still get indexed.
/// Failures are listed in the order of `cities`.
pub fn index_cities<S: GeoStore + Sync + ?Sized>(
    store: &S,
    cities: &[CityId],
    settings: &Settings,
) -> IndexReport {
    cities
        .par_iter()
        .map(|&city| (city, index_city(store, city, settings)))
        .fold(IndexReport::default, |report, (city, result)| {
            report.record(city, result)
        })
        .reduce(IndexReport::default, IndexReport::merge)
}

/// Autocomplete lookup: cities whose indexed strings start with `query`.
///
/// Results are ordered by population (largest first, unknown last), then by
/// display name. Queries shorter than `min_prefix_len` return nothing.
pub fn autocomplete<'a, S: GeoStore + ?Sized>(
    store: &'a S,
    query: &str,
    limit: usize,
    settings: &Settings,
) -> Vec<&'a City> {
    let key = to_search_key(query);
    if key.len() < settings.min_prefix_len.max(1) {
        return Vec::new();
    }

    let mut hits: Vec<&City> = store
        .prefix_members(&key)
        .into_iter()
        .filter_map(|id| store.city(id))
        .collect();
    hits.sort_by(|a, b| {
        b.population
            .unwrap_or(-1)
            .cmp(&a.population.unwrap_or(-1))
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    hits.truncate(limit);
    hits
}
