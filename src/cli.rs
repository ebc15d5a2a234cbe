use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NGR Finder - UK postcode to National Grid Reference
#[derive(Parser, Debug)]
#[command(name = "ngr-finder")]
#[command(about = "Find the Ordnance Survey National Grid Reference for a UK postcode")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the postcode lookup service base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Write logs to this file (the terminal UI logs nowhere otherwise)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Skip the connectivity probe and treat every failure as a connection error
    #[arg(long, global = true)]
    pub assume_online: bool,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive search form (default)
    Tui,
    /// Look up a postcode and convert it to a grid reference
    Lookup {
        /// Postcode, e.g. "SW1A 1AA" (quoting is optional)
        #[arg(required = true, num_args = 1..)]
        postcode: Vec<String>,
    },
    /// Convert an easting/northing pair
    Convert {
        /// Easting in metres
        #[arg(allow_negative_numbers = true)]
        easting: f64,
        /// Northing in metres
        #[arg(allow_negative_numbers = true)]
        northing: f64,
        /// Digits in the grid reference (even, 0 to 10)
        #[arg(short, long)]
        digits: Option<u8>,
    },
    /// Decode a grid reference such as "TQ 30047 80339"
    Parse {
        #[arg(required = true, num_args = 1..)]
        gridref: Vec<String>,
    },
    /// Convert a WGS84 latitude/longitude to a grid reference
    ToGrid {
        /// Latitude in decimal degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Digits in the grid reference (even, 0 to 10)
        #[arg(short, long)]
        digits: Option<u8>,
    },
    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Validate the configuration given with --config
    Validate,
    /// Write a configuration file with default values
    Init {
        /// Destination path
        path: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
