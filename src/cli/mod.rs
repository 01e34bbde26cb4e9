//! Command-line parsing for the weekly price grid tool.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! grid construction and reporting.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PriceType;

pub const DEFAULT_DATA_DIR: &str = "market_csvs";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wpg", version, about = "Weekly agricultural price grids per market and crop")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the year x week price grid for one market and crop.
    Grid(GridArgs),
    /// List markets found in the data directory, with their crops.
    Markets(DataArgs),
    /// Print summary metrics and sampling frequency for one market and crop.
    Summary(SelectArgs),
}

/// Where market CSVs are read from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Directory holding one `<market>_market_data.csv` per market.
    #[arg(long, env = "WPG_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

/// A market/crop selection.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Market name (case-insensitive).
    #[arg(short = 'm', long)]
    pub market: String,

    /// Crop / commodity name (case-insensitive).
    #[arg(short = 'c', long)]
    pub crop: String,
}

#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Price field to aggregate.
    #[arg(short = 'p', long, value_enum, default_value_t = PriceType::Modal)]
    pub price_type: PriceType,

    /// Seed for the interpolation jitter (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep only observed weeks; unobserved cells stay 0.
    #[arg(long)]
    pub no_interpolate: bool,

    /// Export the grid to CSV at this path.
    #[arg(long, value_name = "CSV", conflicts_with = "export_default")]
    pub export: Option<PathBuf>,

    /// Export the grid to `{market}_{crop}_{price_type}_weekly.csv` in the working directory.
    #[arg(long)]
    pub export_default: bool,

    /// Export grid, buckets and thresholds to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}
