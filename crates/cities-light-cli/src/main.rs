//! cities-light: command-line interface for cities-light-core
//!
//! Every command works against a snapshot file. `import` creates it when it
//! is missing; the other commands expect it to exist.
//!
//! Usage examples
//! --------------
//!
//! - Import a dataset, then show what landed
//!   $ cities-light import data/cities.json.gz
//!   $ cities-light stats
//!
//! - Regions of a country (ISO2 or ISO3, case-insensitive)
//!   $ cities-light regions fra
//!
//! - Autocomplete and substring search
//!   $ cities-light search "saint et"
//!   $ cities-light cities zurich
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use cities_light_core::prelude::*;
use cities_light_core::snapshot;
use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn compression_for(path: &Path) -> CompressionMode {
    if path.extension().is_some_and(|e| e == "gz") {
        CompressionMode::Gzip
    } else {
        CompressionMode::None
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("reading settings {path}"))?,
        None => Settings::default(),
    };

    let path = Path::new(&args.snapshot);
    let compression = compression_for(path);
    let open = || {
        snapshot::load(path, compression)
            .with_context(|| format!("opening snapshot {}", path.display()))
    };

    match args.command {
        Commands::Import { input, no_prefixes } => {
            let mut store = if path.exists() {
                open()?
            } else {
                info!(path = %path.display(), "starting a new snapshot");
                MemoryStore::new()
            };
            let settings = Settings {
                index_prefixes: settings.index_prefixes && !no_prefixes,
                ..settings
            };

            let dataset =
                Dataset::from_path(&input).with_context(|| format!("reading dataset {input}"))?;
            let report = Importer::new(&mut store, &settings).import_dataset(&dataset);
            snapshot::save(&store, path, compression)?;

            println!(
                "Imported {} rows: {} created, {} updated, {} failed",
                report.processed(),
                report.created,
                report.updated,
                report.failed
            );
            if report.prefix_failures > 0 {
                println!("  Prefix indexing failed for {} cities", report.prefix_failures);
            }
            for e in &report.errors {
                eprintln!("  {} #{} {:?}: {}", e.entity, e.row, e.name, e.message);
            }
        }

        Commands::Stats => {
            let stats = open()?.stats();
            println!("Snapshot statistics:");
            println!("  Countries: {}", stats.countries);
            println!("  Regions: {}", stats.regions);
            println!("  Cities: {}", stats.cities);
            println!("  Prefixes: {}", stats.prefixes);
            println!("  Prefix links: {}", stats.prefix_links);
        }

        Commands::Countries => {
            let store = open()?;
            for c in store.countries() {
                println!(
                    "{} ({}) {}",
                    c.name,
                    c.code2.as_deref().unwrap_or("--"),
                    c.continent
                );
            }
        }

        Commands::Regions { code } => {
            let store = open()?;
            match store.find_country_by_code(&code).and_then(|c| c.id) {
                Some(id) => {
                    for r in store.regions_of(id) {
                        println!("- {}", r.display_name);
                    }
                }
                None => eprintln!("Country {code} not found"),
            }
        }

        Commands::Cities { query } => {
            let store = open()?;
            let matches = store.find_cities_by_substring(&query);
            if matches.is_empty() {
                println!("No cities found matching: {query}");
            }
            for city in matches {
                println!("{}", city.display_name);
            }
        }

        Commands::Search { query, limit } => {
            let store = open()?;
            let limit = limit.unwrap_or(settings.autocomplete_limit);
            let hits = autocomplete(&store, &query, limit, &settings);
            if hits.is_empty() {
                println!("No cities start with: {query}");
            }
            for city in hits {
                match city.population {
                    Some(p) => println!("{} (pop. {p})", city.display_name),
                    None => println!("{}", city.display_name),
                }
            }
        }

        Commands::Reindex { workers } => {
            if let Some(n) = workers {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build_global()
                    .context("configuring worker threads")?;
            }
            let store = open()?;
            let ids = store.city_ids();
            let report = index_cities(&store, &ids, &settings);
            snapshot::save(&store, path, compression)?;

            println!(
                "Indexed {} cities ({} new links, {} stale links dropped, {} failed)",
                report.indexed,
                report.new_links,
                report.stale_links,
                report.failed.len()
            );
            for (id, error) in &report.failed {
                eprintln!("  city #{id}: {error}");
            }
        }
    }

    Ok(())
}
