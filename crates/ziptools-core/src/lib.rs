// crates/ziptools-core/src/lib.rs

//! # ziptools-core
//!
//! Fast exact and substring lookup over US zip codes, their cities, and
//! UN/LOCODE transport locations.
//!
//! A build step ([`loader::IndexBuilder`], feature `builder`) imports the
//! source rows once and derives postings namespaces from them; [`ZipDb`]
//! then answers queries from the finished store file:
//!
//! ```no_run
//! use ziptools_core::{Zip, ZipDb};
//!
//! let db = ZipDb::open("zipcodes.db")?;
//! println!("{}", db.get_city(&Zip::new("10106"))?);
//! println!("{}", db.get_zips("Richardson")?);
//! println!("{:?}", db.find_cities("english")?.range(0, 10));
//! # Ok::<(), ziptools_core::ZipError>(())
//! ```
//!
//! Substring lookups match prefixes and suffixes only: `"atl"` and `"lanta"`
//! find Atlanta, `"tlan"` does not.

pub mod code;
pub mod common;
pub mod config;
pub mod error;
pub mod list;
#[cfg(feature = "builder")]
pub mod loader;
pub mod search;
pub mod store;
pub mod text;

// Re-exports
pub use crate::code::{FixedCode, Location, Locode, Zip, LOCODE_LEN, ZIP_LEN};
pub use crate::common::DbStats;
pub use crate::config::{CompressionMode, IndexConfig, Namespaces};
pub use crate::error::{Result, ZipError};
pub use crate::list::{CityList, CodeList, LocodeList, ZipList, MAX_LIST_LEN};
pub use crate::search::ZipDb;
pub use crate::store::Store;
