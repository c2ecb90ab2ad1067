// crates/ziptools-core/src/code.rs

//! # Fixed-width codes
//!
//! Postal codes and UN/LOCODE location codes are stored as fixed-width byte
//! arrays. Short input is zero padded on the right, long input is truncated.
//! The store key of a code is its zero-trimmed form (see [`FixedCode::as_bytes`]),
//! while code lists keep the full padded width of every element.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Width of a US zip code.
pub const ZIP_LEN: usize = 5;
/// Width of the location part of a UN/LOCODE (the country prefix is dropped).
pub const LOCODE_LEN: usize = 3;

/// A code of exactly `N` bytes, zero padded.
///
/// Equality, ordering and hashing work on the whole padded array.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedCode<const N: usize>([u8; N]);

/// A US zip code.
pub type Zip = FixedCode<ZIP_LEN>;
/// A UN/LOCODE location code.
pub type Locode = FixedCode<LOCODE_LEN>;

impl<const N: usize> FixedCode<N> {
    /// Width of the code in bytes.
    pub const WIDTH: usize = N;

    /// Encodes a string, dropping bytes past `N` and padding with zeros.
    pub fn new(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }

    /// Same as [`FixedCode::new`] for raw bytes (store keys, list strides).
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut raw = [0u8; N];
        let n = bytes.len().min(N);
        raw[..n].copy_from_slice(&bytes[..n]);
        Self(raw)
    }

    /// The canonical store key: every byte before the first zero.
    ///
    /// Two codes that decode to the same string always produce the same key.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        &self.0[..end]
    }

    /// The full padded array, as written into code lists.
    #[inline]
    pub fn raw(&self) -> &[u8; N] {
        &self.0
    }

    /// True for the all-zero code, which decodes to `""`.
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl<const N: usize> Default for FixedCode<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Display for FixedCode<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<const N: usize> fmt::Debug for FixedCode<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

impl<const N: usize> FromStr for FixedCode<N> {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl<const N: usize> From<&str> for FixedCode<N> {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<const N: usize> Serialize for FixedCode<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedCode<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

/// A UN/LOCODE location entry.
///
/// One location per code; several locations may share a city name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub state: String,
    pub locode: Locode,
}

impl Location {
    /// Encodes the record for the `locations` namespace.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a record written by [`Location::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> crate::Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pads_and_displays_trimmed() {
        let zip = Zip::new("12345");
        let short = Zip::new("123");
        assert_eq!(zip.to_string(), "12345");
        assert_eq!(short.to_string(), "123");
        assert_eq!(short.raw(), b"123\0\0");
    }

    #[test]
    fn new_truncates_long_input() {
        let zip = Zip::new("1234567");
        assert_eq!(zip.to_string(), "12345");
        assert_eq!(Locode::new("ATLX").as_bytes(), b"ATL");
    }

    #[test]
    fn empty_code_decodes_to_empty_string() {
        let zip = Zip::new("");
        assert!(zip.is_empty());
        assert_eq!(zip.to_string(), "");
        assert!(zip.as_bytes().is_empty());
    }

    #[test]
    fn key_form_ignores_padding_after_first_zero() {
        let a = Zip::from_slice(b"12\0\0\0");
        let b = Zip::from_slice(b"12\09\0");
        assert_ne!(a, b);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn serde_uses_decoded_string() {
        let json = serde_json::to_string(&Zip::new("02222")).unwrap();
        assert_eq!(json, "\"02222\"");
        let back: Zip = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(back, Zip::new("3"));
    }

    #[test]
    fn location_record_survives_encoding() {
        let loc = Location {
            name: "Atlanta".into(),
            state: "TX".into(),
            locode: Locode::new("TAT"),
        };
        let bytes = loc.to_bytes().unwrap();
        assert_eq!(Location::from_bytes(&bytes).unwrap(), loc);
    }

    #[test]
    fn truncated_location_record_is_an_error() {
        let loc = Location {
            name: "Artesia".into(),
            state: "NM".into(),
            locode: Locode::new("ATS"),
        };
        let bytes = loc.to_bytes().unwrap();
        assert!(Location::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}
