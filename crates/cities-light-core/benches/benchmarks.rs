//! Text normalization and prefix indexing throughput.
//!
//! Run with: cargo bench -p cities-light-core

use cities_light_core::autocomplete::{autocomplete, city_prefixes, index_city};
use cities_light_core::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const NAMES: &[&str] = &[
    "Paris",
    "Saint-Étienne-du-Rouvray",
    "Zürich",
    "Kraków",
    "Ḩawallī",
    "San José del Cabo",
    "Llanfairpwllgwyngyll",
    "Ōsaka",
];

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    group.throughput(Throughput::Elements(NAMES.len() as u64));

    group.bench_function("to_ascii", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(to_ascii(black_box(name)));
            }
        })
    });
    group.bench_function("to_search_key", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(to_search_key(black_box(name)));
            }
        })
    });
    group.bench_function("city_prefixes", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(city_prefixes(black_box(name), Some("Provence-Alpes-Côte d'Azur"), 3));
            }
        })
    });
    group.finish();
}

fn populated(cities: usize, settings: &Settings) -> (MemoryStore, Vec<CityId>) {
    let mut store = MemoryStore::new();
    let country = store
        .save(Country::new("France", Continent::Europe), settings)
        .expect("country");
    let region = store
        .save(Region::new("Auvergne-Rhône-Alpes", country), settings)
        .expect("region");

    let ids = (0..cities)
        .map(|i| {
            let name = format!("{} {i}", NAMES[i % NAMES.len()]);
            store
                .save(City::new(name).with_region(region), settings)
                .expect("city")
        })
        .collect();
    (store, ids)
}

fn bench_indexing(c: &mut Criterion) {
    let settings = Settings::default();
    let mut group = c.benchmark_group("indexing");

    for size in [100usize, 1_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("index_city", size), &size, |b, &size| {
            b.iter_with_setup(
                || populated(size, &settings),
                |(store, ids)| {
                    for id in ids {
                        index_city(&store, id, &settings).expect("index");
                    }
                    store
                },
            )
        });
        group.bench_with_input(BenchmarkId::new("index_cities", size), &size, |b, &size| {
            b.iter_with_setup(
                || populated(size, &settings),
                |(store, ids)| {
                    black_box(index_cities(&store, &ids, &settings));
                    store
                },
            )
        });
    }
    group.finish();

    let (store, ids) = populated(1_000, &settings);
    index_cities(&store, &ids, &settings);
    c.bench_function("autocomplete", |b| {
        b.iter(|| black_box(autocomplete(&store, black_box("saint"), 10, &settings).len()))
    });
}

criterion_group!(benches, bench_text, bench_indexing);
criterion_main!(benches);
