//! Basic usage example for cities-light-core
//!
//! This example demonstrates how to:
//! - Save countries, regions and cities through the write path
//! - Read the derived fields (ascii name, slug, display name)
//! - Import a raw dataset with per-row error reporting
//! - Index and query autocomplete prefixes

use cities_light_core::prelude::*;

const DATASET: &str = r#"{
  "countries": [
    { "geoname_id": 2921044, "name": "Germany", "code2": "DE", "code3": "DEU", "continent": "EU", "tld": ".de" }
  ],
  "regions": [
    { "geoname_id": 2951839, "name": "Bavaria", "geoname_code": "DE.02", "country_code": "DE" }
  ],
  "cities": [
    { "geoname_id": 2867714, "name": "München", "region_geoname_id": 2951839,
      "latitude": "48.13743", "longitude": "11.57549", "population": 1260391,
      "feature_class": "P", "feature_code": "PPLA" },
    { "geoname_id": 2861650, "name": "Nürnberg", "country_code": "DE", "region_name": "Bavaria",
      "population": 518365, "feature_class": "P", "feature_code": "PPLA2" },
    { "name": "Nowhere", "country_code": "XX" }
  ]
}"#;

fn main() -> Result<()> {
    println!("=== cities-light Basic Usage Example ===\n");
    let settings = Settings::default();
    let mut store = MemoryStore::new();

    // Example 1: Save records; derived fields are filled on the way in
    println!("--- Example 1: Write path ---");
    let fr = store.save(
        Country::new("France", Continent::Europe).with_codes("FR", "FRA"),
        &settings,
    )?;
    let idf = store.save(Region::new("Île-de-France", fr), &settings)?;
    let paris = store.save(
        City::new("Paris").with_region(idf).with_population(2_138_551),
        &settings,
    )?;
    if let Some(city) = store.city(paris) {
        println!("name:         {}", city.name);
        println!("name_ascii:   {}", city.name_ascii);
        println!("slug:         {}", city.slug);
        println!("display_name: {}", city.display_name);
        println!("country:      {:?}", city.country);
    }
    println!();

    // Example 2: Unique rules reject duplicates
    println!("--- Example 2: Duplicate detection ---");
    match store.save(Country::new("France", Continent::Europe), &settings) {
        Ok(_) => println!("unexpectedly saved a duplicate"),
        Err(e) => println!("rejected: {e}"),
    }
    println!();

    // Example 3: Bulk import keeps going past bad rows
    println!("--- Example 3: Import ---");
    let dataset = Dataset::from_reader(DATASET.as_bytes())?;
    let report = Importer::new(&mut store, &settings).import_dataset(&dataset);
    println!(
        "created {}, updated {}, failed {}",
        report.created, report.updated, report.failed
    );
    for error in &report.errors {
        println!("- {} row {} ({}): {}", error.entity, error.row, error.name, error.message);
    }
    println!();

    // Example 4: Autocomplete
    println!("--- Example 4: Autocomplete ---");
    index_city(&store, paris, &settings)?;
    for query in ["mun", "par", "nurnb", "parisile"] {
        let hits: Vec<_> = autocomplete(&store, query, settings.autocomplete_limit, &settings)
            .into_iter()
            .map(|c| c.display_name.as_str())
            .collect();
        println!("{query:>10} -> {hits:?}");
    }
    println!();

    println!("{:?}", store.stats());
    Ok(())
}
