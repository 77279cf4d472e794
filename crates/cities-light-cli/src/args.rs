use clap::{Parser, Subcommand};

/// CLI arguments for cities-light
#[derive(Debug, Parser)]
#[command(
    name = "cities-light",
    version,
    about = "CLI for importing and querying a cities-light snapshot"
)]
pub struct CliArgs {
    /// Snapshot file to read and update (gzip-compressed when it ends in .gz)
    #[arg(short = 's', long = "snapshot", global = true, default_value = "cities.bin")]
    pub snapshot: String,

    /// Optional JSON settings file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a dataset (.json or .json.gz) into the snapshot
    Import {
        /// Path to the dataset
        input: String,

        /// Skip autocomplete prefix indexing
        #[arg(long = "no-prefixes")]
        no_prefixes: bool,
    },

    /// Show a summary of the snapshot contents
    Stats,

    /// List all countries
    Countries,

    /// List the regions of a country
    Regions {
        /// ISO2 or ISO3 code (e.g. FR, USA)
        code: String,
    },

    /// Search for cities containing a substring
    Cities {
        /// Substring to search (accent- and case-insensitive)
        query: String,
    },

    /// Autocomplete a city name
    Search {
        /// Query text (e.g. "paris", "paristex")
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,
    },

    /// Rebuild prefix links for every city
    Reindex {
        /// Number of worker threads (default: one per CPU)
        #[arg(short = 'w', long = "workers")]
        workers: Option<usize>,
    },
}
