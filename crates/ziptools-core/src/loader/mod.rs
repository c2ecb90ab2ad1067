// crates/ziptools-core/src/loader/mod.rs

//! # Index Loader
//!
//! Turns the two source feeds (US zip codes, UN/LOCODE locations) into a
//! store file:
//!
//! 1. **Import**: rows are filtered and written to the primary namespaces
//!    (`zips`, `locations`).
//! 2. **Derive**: each primary namespace is streamed into its exact-name and
//!    prefix/suffix postings namespaces.
//!
//! Reading the CSV files lives in `source`; the pipeline in `builder`.

mod builder;
mod common_io;
mod source;

pub use builder::{BuildStats, DeriveStats, ImportStats, IndexBuilder};
pub use common_io::open_stream;
pub use source::{location_rows, zip_rows};

/// One row of the zip code feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZipRow {
    pub code: String,
    /// `STANDARD`, `PO BOX`, `UNIQUE`, `MILITARY`, ...
    pub category: String,
    pub city: String,
}

/// One row of the UN/LOCODE feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRow {
    pub code: String,
    /// Change indicator; `X` marks an entry withdrawn from the code list.
    pub flag: String,
    /// Possibly `Primary/Alternate`.
    pub name: String,
    pub state: String,
}
