// crates/ziptools-core/src/search.rs

//! # Query layer
//!
//! Read-only lookups against a built store. Every call runs in its own read
//! transaction, so queries never block each other and always see one
//! consistent snapshot.
//!
//! Exact name lookups are case-sensitive (`"Atlantic Beach"`), substring
//! lookups are case-insensitive (the query is lowercased first).

use crate::code::{Location, Locode, Zip};
use crate::common::DbStats;
use crate::config::Namespaces;
use crate::error::{Result, ZipError};
use crate::list::{CityList, CodeList, LocodeList, ZipList};
use crate::store::{Bucket, ReadTxn, Store};
use crate::text::fold_name;
use std::path::Path;

/// A built zip code / UN/LOCODE index opened for queries.
#[derive(Debug)]
pub struct ZipDb {
    store: Store,
    ns: Namespaces,
}

impl ZipDb {
    /// Opens a store built with the default namespace names.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, Namespaces::default())
    }

    pub fn open_with(path: impl AsRef<Path>, ns: Namespaces) -> Result<Self> {
        Ok(Self {
            store: Store::open(path)?,
            ns,
        })
    }

    /// Wraps an already open store, e.g. right after a build.
    pub fn from_store(store: Store, ns: Namespaces) -> Self {
        Self { store, ns }
    }

    pub fn close(self) {
        self.store.close();
    }

    /// The city a zip code belongs to.
    ///
    /// A missing zip and a zip stored with an empty name are both
    /// [`ZipError::NotFound`].
    pub fn get_city(&self, zip: &Zip) -> Result<String> {
        self.store
            .view(|tx| city_of(tx.require(&self.ns.zips)?, zip))
    }

    /// The location registered under a locode.
    pub fn get_location(&self, locode: &Locode) -> Result<Location> {
        self.store.view(|tx| {
            let raw = tx
                .require(&self.ns.locations)?
                .get(locode.as_bytes())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ZipError::NotFound(format!("location {locode}")))?;
            Location::from_bytes(raw)
        })
    }

    /// All zip codes of a city, by exact (case-sensitive) name.
    pub fn get_zips(&self, city: &str) -> Result<ZipList> {
        self.store
            .view(|tx| list_at(tx, &self.ns.cities, city.as_bytes()))
    }

    /// All locodes of a city, by exact (case-sensitive) name.
    pub fn get_locodes(&self, city: &str) -> Result<LocodeList> {
        self.store
            .view(|tx| list_at(tx, &self.ns.locodes, city.as_bytes()))
    }

    /// Names of the cities that start or end with `part`, ignoring case.
    ///
    /// One entry per postings code, in postings order; a name can repeat.
    pub fn find_cities(&self, part: &str) -> Result<CityList> {
        self.store.view(|tx| {
            let part = fold_name(part);
            let zips: ZipList = list_at(tx, &self.ns.subcities, part.as_bytes())?;
            let bucket = tx.require(&self.ns.zips)?;
            zips.iter().map(|zip| city_of(bucket, zip)).collect()
        })
    }

    /// Zip codes that start or end with `part`.
    pub fn find_zips(&self, part: &str) -> Result<ZipList> {
        self.store
            .view(|tx| list_at(tx, &self.ns.subzips, part.as_bytes()))
    }

    /// Locodes of the cities that start or end with `part`, ignoring case.
    pub fn find_locodes(&self, part: &str) -> Result<LocodeList> {
        self.store.view(|tx| {
            let part = fold_name(part);
            list_at(tx, &self.ns.sublocodes, part.as_bytes())
        })
    }

    /// Key counts of every namespace; absent namespaces count as zero.
    pub fn stats(&self) -> DbStats {
        let tx = self.store.begin_read();
        let count = |name: &str| tx.bucket(name).map_or(0, |b| b.len());
        DbStats {
            zips: count(&self.ns.zips),
            locations: count(&self.ns.locations),
            cities: count(&self.ns.cities),
            locode_cities: count(&self.ns.locodes),
            zip_affixes: count(&self.ns.subzips),
            city_affixes: count(&self.ns.subcities),
            locode_affixes: count(&self.ns.sublocodes),
        }
    }
}

fn city_of(zips: Bucket<'_>, zip: &Zip) -> Result<String> {
    match zips.get(zip.as_bytes()) {
        Some(city) if !city.is_empty() => Ok(String::from_utf8_lossy(city).into_owned()),
        _ => Err(ZipError::NotFound(format!("city for zip {zip}"))),
    }
}

/// Decodes the postings list at `key`; a missing key is an empty list.
fn list_at<const N: usize>(tx: &ReadTxn, ns: &str, key: &[u8]) -> Result<CodeList<N>> {
    let bucket = tx.require(ns)?;
    CodeList::<N>::from_bytes(bucket.get(key).unwrap_or_default())
}
