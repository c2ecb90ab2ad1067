// crates/ziptools-core/tests/lookup.rs
//
// Builds a small store from CSV feeds and exercises every query.
#![cfg(all(feature = "builder", feature = "compact"))]

use std::path::Path;
use tempfile::TempDir;
use ziptools_core::loader::{location_rows, open_stream, zip_rows, IndexBuilder};
use ziptools_core::{
    CompressionMode, IndexConfig, Locode, LocodeList, Location, Store, Zip, ZipDb, ZipError,
    ZipList,
};

const ZIPS_CSV: &str = "\
01337,STANDARD,Leyden,MA
10106,UNIQUE,New York,NY
11509,STANDARD,Atlantic Beach,NY
13252,PO BOX,Syracuse,NY
28512,STANDARD,Atlantic Beach,NC
30301,PO BOX,Atlanta,GA
30302,PO BOX,Atlanta,GA
32233,STANDARD,Atlantic Beach,FL
61337,STANDARD,Sparland,IL
75080,STANDARD,Richardson,TX
75081,STANDARD,Richardson,TX
91337,PO BOX,Los Angeles,CA
09002,MILITARY,APO,AE
07726,STANDARD,Englishtown,NJ
52221,STANDARD,English,IA
broken
";

const LOCODES_CSV: &str = "\
,US,TAT,Atlanta,Atlanta,TX,--3-----,RL,0701,,,
,US,ATL,Atlanta,Atlanta,GA,1-345---,AI,0307,,,
,US,ATS,Artesia,Artesia,NM,--3-----,RL,0701,,,
,US,A2R,Artesia,Artesia,CA,--3-----,RL,0701,,,
,US,SSM,Sault Ste Marie/Soo,Sault Ste Marie,MI,1-3-----,AI,0701,,,
X,US,ZZZ,Withdrawn Town,Withdrawn Town,NM,--3-----,XX,0701,,,
";

fn build(dir: &Path, compression: CompressionMode) -> ZipDb {
    let path = dir.join("zipcodes.db");
    let config = IndexConfig {
        compression,
        ..IndexConfig::default()
    };
    let store = config.create_store(&path).unwrap();
    let builder = IndexBuilder::new(&store, config);
    let stats = builder
        .build(zip_rows(ZIPS_CSV.as_bytes()), location_rows(LOCODES_CSV.as_bytes()))
        .unwrap();
    assert_eq!(stats.zips.imported, 14);
    assert_eq!(stats.zips.skipped, 1);
    assert_eq!(stats.zips.malformed, 1);
    assert_eq!(stats.locations.imported, 5);
    assert_eq!(stats.locations.skipped, 1);
    store.close();

    ZipDb::open(&path).unwrap()
}

fn zips(codes: &[&str]) -> ZipList {
    codes.iter().map(|c| Zip::new(c)).collect()
}

#[test]
fn get_city_by_zip() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    assert_eq!(db.get_city(&Zip::new("13252")).unwrap(), "Syracuse");
    assert_eq!(db.get_city(&Zip::new("10106")).unwrap(), "New York");
}

#[test]
fn military_and_unknown_zips_are_not_found() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    assert!(db.get_city(&Zip::new("09002")).unwrap_err().is_not_found());
    assert!(db.get_city(&Zip::new("00000")).unwrap_err().is_not_found());
}

#[test]
fn get_zips_is_exact_and_case_sensitive() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    assert_eq!(
        db.get_zips("Atlantic Beach").unwrap(),
        zips(&["11509", "28512", "32233"])
    );
    assert_eq!(db.get_zips("Richardson").unwrap(), zips(&["75080", "75081"]));
    assert!(db.get_zips("atlantic beach").unwrap().is_empty());
    assert!(db.get_zips("Atlantic").unwrap().is_empty());
}

#[test]
fn find_zips_by_prefix_or_suffix() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    assert_eq!(
        db.find_zips("1337").unwrap(),
        zips(&["01337", "61337", "91337"])
    );
    assert_eq!(db.find_zips("7508").unwrap(), zips(&["75080", "75081"]));
    // interior
    assert!(db.find_zips("133").unwrap().is_empty());
}

#[test]
fn find_cities_prefix_and_suffix_only() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    for part in ["atl", "lanta", "atlanta", "ATL"] {
        let cities = db.find_cities(part).unwrap();
        assert!(cities.contains(&"Atlanta".to_string()), "{part} should match");
    }
    assert!(!db.find_cities("tlan").unwrap().contains(&"Atlanta".to_string()));
}

#[test]
fn find_cities_keeps_postings_order() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    let cities = db.find_cities("english").unwrap();
    assert_eq!(cities.to_vec(), vec!["Englishtown".to_string(), "English".to_string()]);
    assert_eq!(cities.range(1, 10).to_vec(), vec!["English".to_string()]);
    assert!(cities.range(2, 1).is_empty());
}

#[test]
fn locations_and_locodes() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::Gzip);

    assert_eq!(
        db.get_location(&Locode::new("TAT")).unwrap(),
        Location {
            name: "Atlanta".into(),
            state: "TX".into(),
            locode: Locode::new("TAT"),
        }
    );
    assert_eq!(
        db.get_location(&Locode::new("SSM")).unwrap().name,
        "Sault Ste Marie"
    );
    assert!(db
        .get_location(&Locode::new("ZZZ"))
        .unwrap_err()
        .is_not_found());

    let artesia: LocodeList = ["A2R", "ATS"].iter().map(|c| Locode::new(c)).collect();
    assert_eq!(db.get_locodes("Artesia").unwrap(), artesia);
    // affixes are indexed for the first locode of a name only
    let first: LocodeList = vec![Locode::new("A2R")].into();
    assert_eq!(db.find_locodes("ARTES").unwrap(), first);
    assert_eq!(db.find_locodes("sia").unwrap(), first);
    assert_eq!(db.find_locodes("atlanta").unwrap().len(), 1);
}

#[test]
fn empty_and_unknown_queries_return_nothing() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    assert!(db.find_zips("").unwrap().is_empty());
    assert!(db.find_cities("").unwrap().is_empty());
    assert!(db.find_cities("zzzz").unwrap().is_empty());
    assert!(db.find_locodes("zzzz").unwrap().is_empty());
}

#[test]
fn repeated_queries_are_identical() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    let first = db.find_zips("3").unwrap().to_bytes().unwrap();
    let second = db.find_zips("3").unwrap().to_bytes().unwrap();
    assert_eq!(first, second);
    assert_eq!(db.find_cities("a").unwrap(), db.find_cities("a").unwrap());
}

#[test]
fn stats_cover_every_namespace() {
    let dir = TempDir::new().unwrap();
    let db = build(dir.path(), CompressionMode::None);
    let stats = db.stats();
    assert_eq!(stats.zips, 14);
    assert_eq!(stats.locations, 5);
    assert_eq!(stats.cities, 10);
    assert_eq!(stats.locode_cities, 3);
    assert!(stats.zip_affixes > 0);
    assert!(stats.city_affixes > 0);
    assert!(stats.locode_affixes > 0);
}

#[test]
fn unbuilt_store_reports_missing_namespaces() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.db");
    Store::create(&path, CompressionMode::None).unwrap().close();
    let db = ZipDb::open(&path).unwrap();
    assert!(matches!(
        db.find_cities("a"),
        Err(ZipError::NamespaceMissing(_))
    ));
    assert!(matches!(
        db.get_zips("Atlanta"),
        Err(ZipError::NamespaceMissing(_))
    ));
}

#[test]
fn gzipped_feed_is_read_transparently() {
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    let dir = TempDir::new().unwrap();
    let feed = dir.path().join("zips.csv.gz");
    let mut gz = GzEncoder::new(std::fs::File::create(&feed).unwrap(), Compression::default());
    gz.write_all(b"13252,STANDARD,Syracuse,NY\n").unwrap();
    gz.finish().unwrap();

    let rows: Vec<_> = zip_rows(open_stream(&feed).unwrap())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city, "Syracuse");
}
