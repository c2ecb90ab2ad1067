use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for ziptools
#[derive(Debug, Parser)]
#[command(
    name = "ziptools",
    version,
    about = "Build and query a zip code / UN/LOCODE lookup index"
)]
pub struct CliArgs {
    /// Zip codes database file
    #[arg(long = "db", global = true, default_value = "zipcodes.db")]
    pub db: PathBuf,

    /// Log debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new database from the CSV feeds (may take a few minutes)
    Import {
        /// Gzipped .csv file with zip codes
        #[arg(long = "zips", default_value = "zip_code_database.csv.gz")]
        zips: PathBuf,

        /// Gzipped .csv file with UN/LOCODEs
        #[arg(long = "locodes")]
        locodes: Option<PathBuf>,

        /// Write the database without gzip compression
        #[arg(long = "uncompressed")]
        uncompressed: bool,
    },

    /// Look up zip codes, cities and locodes
    Search(SearchArgs),

    /// Show a summary of the database contents
    Stats,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Look for an exact match
    #[arg(long)]
    pub exact: bool,

    /// The given string is a city name or its part
    #[arg(long)]
    pub city: bool,

    /// Search UN/LOCODEs instead of zip codes
    #[arg(long)]
    pub locode: bool,

    /// Skip this many results
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: isize,

    /// Show at most this many results
    #[arg(long, default_value_t = usize::MAX, hide_default_value = true)]
    pub limit: usize,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Zip code, locode, or (part of) a city name
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}
