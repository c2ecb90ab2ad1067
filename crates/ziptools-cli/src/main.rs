//! ziptools: command-line importer and search tool for ziptools-core
//!
//! Usage examples
//! --------------
//!
//! - Create the database from the gzipped CSV feeds
//!   $ ziptools import --zips zip_code_database.csv.gz --locodes us_locode_database.csv.gz
//!
//! - List all zip codes of a city
//!   $ ziptools search --exact --city Richardson
//!   Zip codes in Richardson: [75080 75081 75082 75083 75085]
//!
//! - Get the city of a zip code
//!   $ ziptools search --exact 10106
//!   Zip 10106 belongs to New York.
//!
//! - List all cities that match a part of a name
//!   $ ziptools search --city english
//!
//! - List all zip codes that match a part of a code
//!   $ ziptools search 1337
//!   Zip codes that match 1337: [01337 61337 91337]
//!
//! - The same for UN/LOCODEs: add `--locode`
//!   $ ziptools search --locode --exact TAT
//!   $ ziptools search --locode --exact --city Artesia
//!   $ ziptools search --locode artes
//!
//! Logs go to stderr (`-v` for debug output), results to stdout.
mod args;

use crate::args::{CliArgs, Commands, SearchArgs};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::fmt::Display;
use tracing::Level;
use ziptools_core::{Locode, Zip, ZipDb, ZipError};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Import {
            zips,
            locodes,
            uncompressed,
        } => import(&args.db, &zips, locodes.as_deref(), uncompressed),

        Commands::Search(search) => {
            let db = ZipDb::open(&args.db)
                .with_context(|| format!("opening {}", args.db.display()))?;
            let out = run_search(&db, &search);
            db.close();
            out
        }

        Commands::Stats => {
            let db = ZipDb::open(&args.db)
                .with_context(|| format!("opening {}", args.db.display()))?;
            let stats = db.stats();
            println!("Database statistics:");
            println!("  Zip codes: {}", stats.zips);
            println!("  Locations: {}", stats.locations);
            println!("  Cities (zip): {}", stats.cities);
            println!("  Cities (locode): {}", stats.locode_cities);
            println!("  Zip affixes: {}", stats.zip_affixes);
            println!("  City affixes: {}", stats.city_affixes);
            println!("  Locode affixes: {}", stats.locode_affixes);
            db.close();
            Ok(())
        }
    }
}

#[cfg(feature = "builder")]
fn import(
    db: &std::path::Path,
    zips: &std::path::Path,
    locodes: Option<&std::path::Path>,
    uncompressed: bool,
) -> anyhow::Result<()> {
    use ziptools_core::loader::{location_rows, open_stream, zip_rows, IndexBuilder};
    use ziptools_core::{CompressionMode, IndexConfig};

    let mut config = IndexConfig::default();
    if uncompressed {
        config.compression = CompressionMode::None;
    }

    let zip_feed = open_stream(zips).with_context(|| format!("opening {}", zips.display()))?;
    let locode_feed = locodes
        .map(|path| open_stream(path).with_context(|| format!("opening {}", path.display())))
        .transpose()?;

    let store = config
        .create_store(db)
        .with_context(|| format!("creating {}", db.display()))?;
    let builder = IndexBuilder::new(&store, config);

    let stats = match locode_feed {
        Some(feed) => builder.build(zip_rows(zip_feed), location_rows(feed))?,
        None => builder.build(zip_rows(zip_feed), std::iter::empty())?,
    };
    tracing::info!(
        zips = stats.zips.imported,
        locations = stats.locations.imported,
        db = %db.display(),
        "done indexing"
    );
    store.close();
    Ok(())
}

#[cfg(not(feature = "builder"))]
fn import(
    _db: &std::path::Path,
    _zips: &std::path::Path,
    _locodes: Option<&std::path::Path>,
    _uncompressed: bool,
) -> anyhow::Result<()> {
    anyhow::bail!("ziptools was built without the 'builder' feature")
}

fn run_search(db: &ZipDb, args: &SearchArgs) -> anyhow::Result<()> {
    let name = args.query.join(" ");
    let (offset, limit) = (args.offset, args.limit);

    match (args.locode, args.exact, args.city) {
        // zip codes
        (false, true, true) => {
            let list = db.get_zips(&name)?.range(offset, limit);
            let line = if list.is_empty() {
                format!("No zip codes found for {name}.")
            } else {
                format!("Zip codes in {name}: {list}")
            };
            emit(args.json, &list, line)
        }
        (false, false, true) => {
            let list = db.find_cities(&name)?.range(offset, limit);
            let line = if list.is_empty() {
                format!("No cities matched {name}.")
            } else {
                format!("Cities that match {name}: {:?}", list.to_vec())
            };
            emit(args.json, &list, line)
        }
        (false, true, false) => {
            let zip = Zip::new(&args.query[0]);
            match db.get_city(&zip) {
                Ok(city) => {
                    let line = format!("Zip {zip} belongs to {city}.");
                    emit(args.json, &city, line)
                }
                Err(e) => not_found(e, format!("No city found for {zip}.")),
            }
        }
        (false, false, false) => {
            let part = &args.query[0];
            let list = db.find_zips(part)?.range(offset, limit);
            let line = if list.is_empty() {
                format!("No zips matched {part}.")
            } else {
                format!("Zip codes that match {part}: {list}")
            };
            emit(args.json, &list, line)
        }

        // locodes
        (true, true, true) => {
            let list = db.get_locodes(&name)?.range(offset, limit);
            let line = if list.is_empty() {
                format!("No locodes found for {name}.")
            } else {
                format!("Locodes in {name}: {list}")
            };
            emit(args.json, &list, line)
        }
        (true, true, false) => {
            let locode = Locode::new(&args.query[0]);
            match db.get_location(&locode) {
                Ok(loc) => {
                    let line = format!("Locode {locode} is {}, {}.", loc.name, loc.state);
                    emit(args.json, &loc, line)
                }
                Err(e) => not_found(e, format!("No location found for {locode}.")),
            }
        }
        (true, false, _) => {
            let list = db.find_locodes(&name)?.range(offset, limit);
            let line = if list.is_empty() {
                format!("No locodes matched {name}.")
            } else {
                format!("Locodes that match {name}: {list}")
            };
            emit(args.json, &list, line)
        }
    }
}

/// Prints `value` as JSON, or the human-readable `line`.
fn emit<T: Serialize>(json: bool, value: &T, line: String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{line}");
    }
    Ok(())
}

/// "Nothing matched" is an answer, every other error is a failure.
fn not_found(err: ZipError, message: impl Display) -> anyhow::Result<()> {
    if err.is_not_found() {
        println!("{message}");
        Ok(())
    } else {
        Err(err.into())
    }
}
