//! ziptools-cli
//! ============
//!
//! Command-line importer and search tool for the `ziptools-core` index.
//!
//! This crate primarily provides a binary (`ziptools`). The library target
//! exists so that docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! ziptools import --zips zip_code_database.csv.gz --locodes us_locode_database.csv.gz
//! ziptools search --exact --city Richardson
//! ziptools search --exact 10106
//! ziptools search --city english
//! ziptools search 1337
//! ```
//!
//! For programmatic access use the `ziptools-core` crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
