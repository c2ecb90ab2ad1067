// crates/ziptools-core/src/store/persist.rs

use super::Snapshot;
use crate::config::CompressionMode;
use crate::error::{Result, ZipError};
use bincode::Options;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Upper bound for a decoded store file, guards against garbage input.
const SIZE_LIMIT: u64 = 1024 * 1024 * 1024;

/// Writes the snapshot next to `path` and renames it into place, so readers
/// of the file never see a half-written store.
pub(super) fn write_snapshot(
    path: &Path,
    snapshot: &Snapshot,
    compression: CompressionMode,
) -> Result<()> {
    let tmp = tmp_path(path);
    let written = write_file(&tmp, snapshot, compression)
        .and_then(|()| fs::rename(&tmp, path).map_err(ZipError::from));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_file(tmp: &Path, snapshot: &Snapshot, compression: CompressionMode) -> Result<()> {
    let mut writer = BufWriter::new(File::create(tmp)?);

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode::serialize_into(&mut encoder, snapshot)?;
                writer = encoder.finish()?;
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(ZipError::Decode(
                    "Gzip requested but 'compact' disabled".into(),
                ));
            }
        }
        CompressionMode::None => bincode::serialize_into(&mut writer, snapshot)?,
    }

    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Reads a snapshot, detecting gzip by its magic bytes.
pub(super) fn read_snapshot(path: &Path) -> Result<(Snapshot, CompressionMode)> {
    let file = File::open(path).map_err(|e| {
        ZipError::NotFound(format!("store not found at {}: {}", path.display(), e))
    })?;
    let mut data = Vec::new();
    BufReader::new(file).read_to_end(&mut data)?;

    let (plain, mode) = if data.starts_with(&GZIP_MAGIC) {
        (gunzip(&data)?, CompressionMode::Gzip)
    } else {
        (data, CompressionMode::None)
    };

    let snapshot = bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(SIZE_LIMIT)
        .allow_trailing_bytes()
        .deserialize(&plain)?;
    Ok((snapshot, mode))
}

#[cfg(feature = "compact")]
fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(not(feature = "compact"))]
fn gunzip(_data: &[u8]) -> Result<Vec<u8>> {
    Err(ZipError::Decode(
        "store file is gzip compressed but 'compact' disabled".into(),
    ))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
