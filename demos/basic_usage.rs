//! Basic usage example for ziptools-rs
//!
//! Builds a throwaway index from a handful of rows and runs every kind of
//! lookup against it.

use ziptools_core::loader::{IndexBuilder, LocationRow, ZipRow};
use ziptools_core::{IndexConfig, Locode, Result, Zip, ZipDb};

fn main() -> Result<()> {
    println!("=== ziptools-rs Basic Usage ===\n");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("zipcodes.db");

    // 1. Build
    let zips = [
        ("13252", "Syracuse"),
        ("30301", "Atlanta"),
        ("75080", "Richardson"),
        ("75081", "Richardson"),
        ("01337", "Leyden"),
        ("61337", "Sparland"),
    ]
    .into_iter()
    .map(|(code, city)| {
        Ok(ZipRow {
            code: code.into(),
            category: "STANDARD".into(),
            city: city.into(),
        })
    });
    let locations = [("TAT", "Atlanta", "TX"), ("ATS", "Artesia", "NM")]
        .into_iter()
        .map(|(code, name, state)| {
            Ok(LocationRow {
                code: code.into(),
                flag: String::new(),
                name: name.into(),
                state: state.into(),
            })
        });

    let config = IndexConfig::default();
    let store = config.create_store(&path)?;
    let stats = IndexBuilder::new(&store, config).build(zips, locations)?;
    println!("Imported {} zips, {} locations\n", stats.zips.imported, stats.locations.imported);
    store.close();

    // 2. Query
    let db = ZipDb::open(&path)?;

    println!("--- Exact lookups ---");
    println!("Zip 13252 belongs to {}.", db.get_city(&Zip::new("13252"))?);
    println!("Zip codes in Richardson: {}", db.get_zips("Richardson")?);
    let loc = db.get_location(&Locode::new("TAT"))?;
    println!("Locode TAT is {}, {}.", loc.name, loc.state);
    println!();

    println!("--- Prefix / suffix lookups ---");
    println!("Zip codes that match 1337: {}", db.find_zips("1337")?);
    println!("Cities that match 'lanta': {:?}", db.find_cities("lanta")?.to_vec());
    println!("Locodes that match 'art': {}", db.find_locodes("art")?);
    println!();

    println!("--- Pagination ---");
    let all = db.find_zips("7508")?;
    println!("All: {all}, first: {}, past the end: {}", all.range(0, 1), all.range(5, 1));

    db.close();
    Ok(())
}
