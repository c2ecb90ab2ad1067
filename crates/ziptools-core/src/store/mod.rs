// crates/ziptools-core/src/store/mod.rs

//! # Store
//!
//! A small ordered, transactional key-value store with named namespaces,
//! persisted as a single file.
//!
//! - Readers take an immutable snapshot and never block.
//! - One writer at a time works on a private copy; `commit` persists it to
//!   disk and publishes it to new readers. Dropping an uncommitted
//!   [`WriteTxn`] rolls it back.

use crate::config::CompressionMode;
use crate::error::{Result, ZipError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};
use tracing::debug;

mod persist;

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// Everything a store holds at one point in time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    namespaces: BTreeMap<String, Entries>,
}

/// Handle to an open store file.
pub struct Store {
    path: PathBuf,
    compression: CompressionMode,
    current: RwLock<Arc<Snapshot>>,
    writer_active: Mutex<bool>,
    writer_done: Condvar,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("compression", &self.compression)
            .finish()
    }
}

impl Store {
    /// Creates a fresh, empty store at `path`, replacing any existing file.
    pub fn create(path: impl AsRef<Path>, compression: CompressionMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Snapshot::default();
        persist::write_snapshot(&path, &snapshot, compression)?;
        debug!(path = %path.display(), ?compression, "created store");
        Ok(Self::with_snapshot(path, compression, snapshot))
    }

    /// Opens an existing store. A missing file is [`ZipError::NotFound`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (snapshot, compression) = persist::read_snapshot(&path)?;
        debug!(
            path = %path.display(),
            namespaces = snapshot.namespaces.len(),
            "opened store"
        );
        Ok(Self::with_snapshot(path, compression, snapshot))
    }

    fn with_snapshot(path: PathBuf, compression: CompressionMode, snapshot: Snapshot) -> Self {
        Self {
            path,
            compression,
            current: RwLock::new(Arc::new(snapshot)),
            writer_active: Mutex::new(false),
            writer_done: Condvar::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts a read transaction on the latest committed snapshot.
    pub fn begin_read(&self) -> ReadTxn {
        let snapshot = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        ReadTxn { snapshot }
    }

    /// Starts the write transaction, waiting for a running one to finish.
    pub fn begin_write(&self) -> WriteTxn<'_> {
        let mut active = self
            .writer_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *active {
            active = self
                .writer_done
                .wait(active)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *active = true;
        drop(active);

        let working = self.begin_read().snapshot.as_ref().clone();
        WriteTxn {
            store: self,
            working,
        }
    }

    /// Runs `f` inside a read transaction.
    pub fn view<T>(&self, f: impl FnOnce(&ReadTxn) -> Result<T>) -> Result<T> {
        f(&self.begin_read())
    }

    /// Runs `f` inside a write transaction, committing when it returns `Ok`.
    pub fn update<T>(&self, f: impl FnOnce(&mut WriteTxn<'_>) -> Result<T>) -> Result<T> {
        let mut tx = self.begin_write();
        let out = f(&mut tx)?;
        tx.commit()?;
        Ok(out)
    }

    pub fn close(self) {
        debug!(path = %self.path.display(), "closed store");
    }

    fn publish(&self, snapshot: Snapshot) -> Result<()> {
        persist::write_snapshot(&self.path, &snapshot, self.compression)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
        Ok(())
    }

    fn release_writer(&self) {
        *self
            .writer_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = false;
        self.writer_done.notify_one();
    }
}

/// Read-only view of one namespace.
#[derive(Clone, Copy)]
pub struct Bucket<'a> {
    entries: &'a Entries,
}

impl<'a> Bucket<'a> {
    pub fn get(&self, key: &[u8]) -> Option<&'a [u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// All pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A consistent, immutable snapshot of the store.
pub struct ReadTxn {
    snapshot: Arc<Snapshot>,
}

impl ReadTxn {
    pub fn bucket(&self, name: &str) -> Option<Bucket<'_>> {
        self.snapshot
            .namespaces
            .get(name)
            .map(|entries| Bucket { entries })
    }

    /// Like [`ReadTxn::bucket`], but a missing namespace is an error.
    pub fn require(&self, name: &str) -> Result<Bucket<'_>> {
        self.bucket(name)
            .ok_or_else(|| ZipError::NamespaceMissing(name.to_string()))
    }
}

/// The single writer. Changes become visible only through [`WriteTxn::commit`].
pub struct WriteTxn<'s> {
    store: &'s Store,
    working: Snapshot,
}

impl WriteTxn<'_> {
    pub fn create_bucket_if_not_exists(&mut self, name: &str) {
        self.working
            .namespaces
            .entry(name.to_string())
            .or_default();
    }

    pub fn bucket(&self, name: &str) -> Option<Bucket<'_>> {
        self.working
            .namespaces
            .get(name)
            .map(|entries| Bucket { entries })
    }

    pub fn get(&self, name: &str, key: &[u8]) -> Result<Option<&[u8]>> {
        let entries = self
            .working
            .namespaces
            .get(name)
            .ok_or_else(|| ZipError::NamespaceMissing(name.to_string()))?;
        Ok(entries.get(key).map(Vec::as_slice))
    }

    /// Inserts or replaces `key`. The namespace must exist.
    pub fn put(&mut self, name: &str, key: &[u8], value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(ZipError::Decode(format!("empty key in namespace {name}")));
        }
        let entries = self
            .working
            .namespaces
            .get_mut(name)
            .ok_or_else(|| ZipError::NamespaceMissing(name.to_string()))?;
        entries.insert(key.to_vec(), value);
        Ok(())
    }

    /// Persists the changes and makes them visible to new readers.
    pub fn commit(mut self) -> Result<()> {
        let snapshot = std::mem::take(&mut self.working);
        self.store.publish(snapshot)
    }
}

impl Drop for WriteTxn<'_> {
    fn drop(&mut self) {
        self.store.release_writer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fresh(dir: &TempDir, mode: CompressionMode) -> Store {
        Store::create(dir.path().join("test.db"), mode).unwrap()
    }

    #[test]
    fn committed_writes_are_visible_and_durable() {
        let dir = TempDir::new().unwrap();
        let store = fresh(&dir, CompressionMode::None);
        store
            .update(|tx| {
                tx.create_bucket_if_not_exists("zips");
                tx.put("zips", b"13252", b"Syracuse".to_vec())
            })
            .unwrap();

        let tx = store.begin_read();
        assert_eq!(tx.require("zips").unwrap().get(b"13252"), Some(&b"Syracuse"[..]));
        store.close();

        let reopened = Store::open(dir.path().join("test.db")).unwrap();
        let tx = reopened.begin_read();
        assert_eq!(tx.bucket("zips").unwrap().len(), 1);
    }

    #[test]
    fn gzip_store_reopens() {
        let dir = TempDir::new().unwrap();
        let store = fresh(&dir, CompressionMode::Gzip);
        store
            .update(|tx| {
                tx.create_bucket_if_not_exists("cities");
                tx.put("cities", b"Atlanta", vec![0])
            })
            .unwrap();
        drop(store);

        let reopened = Store::open(dir.path().join("test.db")).unwrap();
        assert!(reopened.begin_read().bucket("cities").is_some());
    }

    #[test]
    fn dropped_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        let store = fresh(&dir, CompressionMode::None);
        {
            let mut tx = store.begin_write();
            tx.create_bucket_if_not_exists("zips");
            tx.put("zips", b"1", b"x".to_vec()).unwrap();
        }
        assert!(store.begin_read().bucket("zips").is_none());
        // writer slot was released
        let tx = store.begin_write();
        drop(tx);
    }

    #[test]
    fn reader_keeps_its_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = fresh(&dir, CompressionMode::None);
        let before = store.begin_read();
        store
            .update(|tx| {
                tx.create_bucket_if_not_exists("zips");
                Ok(())
            })
            .unwrap();
        assert!(before.bucket("zips").is_none());
        assert!(store.begin_read().bucket("zips").is_some());
    }

    #[test]
    fn put_into_missing_namespace_fails() {
        let dir = TempDir::new().unwrap();
        let store = fresh(&dir, CompressionMode::None);
        let mut tx = store.begin_write();
        let err = tx.put("nope", b"k", vec![]).unwrap_err();
        assert!(matches!(err, ZipError::NamespaceMissing(_)));
    }

    #[test]
    fn iteration_is_in_key_order() {
        let dir = TempDir::new().unwrap();
        let store = fresh(&dir, CompressionMode::None);
        store
            .update(|tx| {
                tx.create_bucket_if_not_exists("zips");
                for k in ["30301", "01337", "13252"] {
                    tx.put("zips", k.as_bytes(), vec![])?;
                }
                Ok(())
            })
            .unwrap();
        let tx = store.begin_read();
        let keys: Vec<_> = tx.require("zips").unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&b"01337"[..], b"13252", b"30301"]);
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Store::open(dir.path().join("absent.db")).unwrap_err();
        assert!(err.is_not_found());
    }
}
