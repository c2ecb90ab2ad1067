// crates/ziptools-core/src/common.rs

use serde::{Deserialize, Serialize};

/// Key counts per namespace of a built store.
///
/// Returned by [`crate::ZipDb::stats`]; a namespace that was never built
/// counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub zips: usize,
    pub locations: usize,
    /// Distinct exact city names with zip codes.
    pub cities: usize,
    /// Distinct exact city names with locodes.
    pub locode_cities: usize,
    pub zip_affixes: usize,
    pub city_affixes: usize,
    pub locode_affixes: usize,
}
