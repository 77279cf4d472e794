//! cities-light-cli
//! ================
//!
//! Command-line interface for the `cities-light-core` store.
//!
//! This crate primarily provides a binary (`cities-light`). The library
//! target only exists so that docs.rs renders this overview.
//!
//! Basic usage:
//!
//! ```text
//! cities-light --help
//! cities-light import cities.json.gz
//! cities-light stats
//! cities-light regions FR
//! cities-light search paristex
//! cities-light --snapshot other.bin.gz reindex --workers 8
//! ```
//!
//! For programmatic access use the `cities-light-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
