use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sgli-point-processor")]
#[command(about = "Point extraction and ingestion of GCOM-C/SGLI LST and NDVI rasters")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: sgli.toml if present]")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Acquire rasters for a point and date and write an observation record
    Collect {
        #[arg(long, allow_hyphen_values = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(long, allow_hyphen_values = true, help = "Longitude in decimal degrees")]
        lon: f64,

        #[arg(short, long, help = "Observation date (YYYY-MM-DD) [default: today]")]
        date: Option<String>,

        #[arg(
            short,
            long,
            help = "Output record path [default: observation_{lat}_{lon}_{YYYYMMDD}.json]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "auto", help = "Acquisition mode: real, mock or auto")]
        mode: String,

        #[arg(long, default_value = "false", help = "Shorthand for --mode mock")]
        mock: bool,

        #[arg(short, long, help = "Location name stored in the record")]
        name: Option<String>,
    },

    /// Ingest an observation record into the store (or the CSV backup)
    Upload {
        #[arg(short, long, help = "Observation record JSON file")]
        input: PathBuf,

        #[arg(short, long)]
        location_id: i64,

        #[arg(long, default_value = "false", help = "Write the CSV backup only")]
        backup_only: bool,

        #[arg(long, help = "Backup directory [default: data/backup]")]
        backup_dir: Option<PathBuf>,
    },

    /// Create the store tables and optionally register a location
    InitStore {
        #[arg(long, requires_all = ["lat", "lon"])]
        location_name: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Report which capabilities this build and configuration provide
    Probe,
}
