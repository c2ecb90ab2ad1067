// crates/ziptools-core/src/list.rs

//! # Code lists
//!
//! Wire format of a postings list:
//!
//! ```text
//! [N][code 1][code 2]...[code N]
//! ```
//!
//! `N` is a single byte, every code occupies its full padded width. Single
//! codes used as store keys are zero-trimmed instead; lists keep a fixed
//! stride so no per-element length is needed.

use crate::code::{FixedCode, LOCODE_LEN, ZIP_LEN};
use crate::error::{Result, ZipError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Largest list the one-byte length prefix can describe.
pub const MAX_LIST_LEN: usize = u8::MAX as usize;

/// An ordered list of fixed-width codes, in insertion order.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeList<const N: usize>(Vec<FixedCode<N>>);

/// Zip codes, e.g. all zips of one city.
pub type ZipList = CodeList<ZIP_LEN>;
/// Location codes, e.g. all locodes of one city.
pub type LocodeList = CodeList<LOCODE_LEN>;

/// City names resolved from a postings list. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityList(Vec<String>);

/// Clips `items` to `[offset, offset + limit)`; empty when `offset` is
/// negative or past the end.
fn page<T>(items: &[T], offset: isize, limit: usize) -> &[T] {
    let Ok(start) = usize::try_from(offset) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}

impl<const N: usize> CodeList<N> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a code. Returns `false` and leaves the list untouched when it
    /// already holds [`MAX_LIST_LEN`] codes.
    pub fn try_push(&mut self, code: FixedCode<N>) -> bool {
        if self.0.len() >= MAX_LIST_LEN {
            return false;
        }
        self.0.push(code);
        true
    }

    /// A sliced copy of the list. Never fails on an out-of-range `limit`.
    pub fn range(&self, offset: isize, limit: usize) -> Self {
        Self(page(&self.0, offset, limit).to_vec())
    }

    /// Serializes the list: length byte followed by the padded codes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let len = u8::try_from(self.0.len()).map_err(|_| ZipError::ListOverflow(self.0.len()))?;
        let mut buf = Vec::with_capacity(1 + self.0.len() * N);
        buf.push(len);
        for code in &self.0 {
            buf.extend_from_slice(code.raw());
        }
        Ok(buf)
    }

    /// Parses a list written by [`CodeList::to_bytes`].
    ///
    /// Empty input is an empty list, so a missing key and an empty list look
    /// the same to callers. A payload shorter than the length byte promises
    /// is a [`ZipError::Decode`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let Some((&len, body)) = data.split_first() else {
            return Ok(Self::new());
        };
        let len = len as usize;
        let need = len * N;
        if body.len() < need {
            return Err(ZipError::Decode(format!(
                "code list of {len} x {N} bytes needs {need} bytes, found {}",
                body.len()
            )));
        }
        let codes = body[..need]
            .chunks_exact(N)
            .map(FixedCode::from_slice)
            .collect();
        Ok(Self(codes))
    }

    pub fn into_inner(self) -> Vec<FixedCode<N>> {
        self.0
    }
}

impl<const N: usize> Deref for CodeList<N> {
    type Target = [FixedCode<N>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> From<Vec<FixedCode<N>>> for CodeList<N> {
    fn from(codes: Vec<FixedCode<N>>) -> Self {
        Self(codes)
    }
}

impl<const N: usize> FromIterator<FixedCode<N>> for CodeList<N> {
    fn from_iter<I: IntoIterator<Item = FixedCode<N>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, const N: usize> IntoIterator for &'a CodeList<N> {
    type Item = &'a FixedCode<N>;
    type IntoIter = std::slice::Iter<'a, FixedCode<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<const N: usize> fmt::Debug for CodeList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Space separated, bracketed: `[01337 61337 91337]`.
impl<const N: usize> fmt::Display for CodeList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{code}")?;
        }
        f.write_str("]")
    }
}

impl CityList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, city: String) {
        self.0.push(city);
    }

    pub fn range(&self, offset: isize, limit: usize) -> Self {
        Self(page(&self.0, offset, limit).to_vec())
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for CityList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for CityList {
    fn from(cities: Vec<String>) -> Self {
        Self(cities)
    }
}

impl FromIterator<String> for CityList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
