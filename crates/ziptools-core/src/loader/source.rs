// crates/ziptools-core/src/loader/source.rs

use super::{LocationRow, ZipRow};
use crate::error::{Result, ZipError};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

// Column positions of the headerless feeds.
const ZIP_CODE: usize = 0;
const ZIP_TYPE: usize = 1;
const ZIP_CITY: usize = 2;

const LOC_CHANGE: usize = 0;
const LOC_LOCATION: usize = 2;
const LOC_NAME: usize = 3;
const LOC_SUBDIVISION: usize = 5;

/// Rows of the zip code database (`zip,type,primary_city,...`, no header).
pub fn zip_rows<R: Read>(reader: R) -> impl Iterator<Item = Result<ZipRow>> {
    records(reader).map(|record| {
        let (line, rec) = record?;
        Ok(ZipRow {
            code: field(&rec, line, ZIP_CODE)?,
            category: field(&rec, line, ZIP_TYPE)?,
            city: field(&rec, line, ZIP_CITY)?,
        })
    })
}

/// Rows of a UN/LOCODE code list
/// (`change,country,location,name,name_wo_diacritics,subdivision,...`, no header).
pub fn location_rows<R: Read>(reader: R) -> impl Iterator<Item = Result<LocationRow>> {
    records(reader).map(|record| {
        let (line, rec) = record?;
        Ok(LocationRow {
            flag: field(&rec, line, LOC_CHANGE)?,
            code: field(&rec, line, LOC_LOCATION)?,
            name: field(&rec, line, LOC_NAME)?,
            state: field(&rec, line, LOC_SUBDIVISION)?,
        })
    })
}

fn records<R: Read>(reader: R) -> impl Iterator<Item = Result<(u64, StringRecord)>> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .map(|record| match record {
            Ok(rec) => {
                let line = rec.position().map(|p| p.line()).unwrap_or_default();
                Ok((line, rec))
            }
            Err(e) => Err(ZipError::InputRow {
                line: e.position().map(|p| p.line()).unwrap_or_default(),
                reason: e.to_string(),
            }),
        })
}

fn field(rec: &StringRecord, line: u64, idx: usize) -> Result<String> {
    rec.get(idx)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ZipError::InputRow {
            line,
            reason: format!("expected at least {} columns, found {}", idx + 1, rec.len()),
        })
}
