// crates/ziptools-core/src/config.rs

use crate::error::Result;
use crate::store::Store;
use std::path::Path;

// -----------------------------------------------------------------------------
// CONFIGURATION
// -----------------------------------------------------------------------------

/// How the store file is written to disk.
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

/// Names of the namespaces inside one store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    /// zip -> city name
    pub zips: String,
    /// locode -> encoded [`crate::Location`]
    pub locations: String,
    /// exact city name -> zips
    pub cities: String,
    /// exact city name -> locodes
    pub locodes: String,
    /// zip prefix/suffix -> zips
    pub subzips: String,
    /// lowercased city prefix/suffix -> zips
    pub subcities: String,
    /// lowercased city prefix/suffix -> locodes
    pub sublocodes: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            zips: "zips".into(),
            locations: "locations".into(),
            cities: "cities".into(),
            locodes: "locodes".into(),
            subzips: "subzips".into(),
            subcities: "subcities".into(),
            sublocodes: "sublocodes".into(),
        }
    }
}

/// Settings of one index build.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub namespaces: Namespaces,
    /// Capacity of the queue between the namespace reader and the postings writer.
    pub queue_capacity: usize,
    pub compression: CompressionMode,
    /// Zip rows whose category is listed here are not imported.
    pub skip_zip_categories: Vec<String>,
    /// Location rows whose change flag is listed here are not imported.
    pub skip_location_flags: Vec<String>,
    /// Separates the primary name from an alternate one, e.g. `Sault Ste Marie/Soo`.
    pub alt_name_delimiter: char,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::default(),
            queue_capacity: 100,
            compression: CompressionMode::default(),
            skip_zip_categories: vec!["MILITARY".into()],
            skip_location_flags: vec!["X".into()],
            alt_name_delimiter: '/',
        }
    }
}

impl IndexConfig {
    /// Creates the empty store file a build writes into, with this config's
    /// [`CompressionMode`].
    pub fn create_store(&self, path: impl AsRef<Path>) -> Result<Store> {
        Store::create(path, self.compression)
    }

    pub fn skips_zip_category(&self, category: &str) -> bool {
        self.skip_zip_categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category.trim()))
    }

    pub fn skips_location_flag(&self, flag: &str) -> bool {
        let flag = flag.trim();
        !flag.is_empty() && self.skip_location_flags.iter().any(|f| f == flag)
    }

    /// Keeps only the primary part of a `name/alt-name` pair.
    pub fn primary_name<'a>(&self, name: &'a str) -> &'a str {
        name.split(self.alt_name_delimiter)
            .next()
            .unwrap_or(name)
            .trim()
    }
}
