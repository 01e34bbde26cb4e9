//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the market directory
//! - runs the grid pipeline or the summary report
//! - writes optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Cli, Command, DataArgs, GridArgs, SelectArgs};
use crate::data::MarketStore;
use crate::domain::GridConfig;
use crate::error::AppError;
use crate::grid::GridOutcome;
use crate::io::{GridFile, default_export_name, write_grid_csv, write_grid_json};

pub mod pipeline;

use pipeline::GridRequest;

/// Entry point for the `wpg` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; real env vars and flags still apply.
    dotenvy::dotenv().ok();
    crate::logging::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Grid(args) => handle_grid(args),
        Command::Markets(args) => handle_markets(args),
        Command::Summary(args) => handle_summary(args),
    }
}

fn handle_grid(args: GridArgs) -> Result<(), AppError> {
    let store = load_store(&args.select.data)?;
    let request = GridRequest {
        market: args.select.market.clone(),
        crop: args.select.crop.clone(),
        config: grid_config_from_args(&args),
    };
    let run = pipeline::run_grid(&store, &request)?;

    let out = match &run.outcome {
        GridOutcome::NoData => {
            println!(
                "No {} data available for {} in {}.",
                request.config.price_type.display_name(),
                run.crop,
                run.market
            );
            return Ok(());
        }
        GridOutcome::Ready(out) => out,
    };

    println!(
        "{}",
        crate::report::format_grid_header(&run.market, &run.crop, request.config.price_type, out)
    );
    println!("{}", crate::report::format_grid(out));
    println!("{}", crate::report::format_legend(out.thresholds.as_ref()));

    if let Some(path) = export_path(&args, &run.market, &run.crop) {
        write_grid_csv(&path, &out.grid)?;
        tracing::info!(path = %path.display(), "Grid CSV written");
    }
    if let Some(path) = &args.export_json {
        let file = GridFile::from_output(
            &run.market,
            &run.crop,
            request.config.price_type,
            request.config.interpolate,
            out,
        );
        write_grid_json(path, &file)?;
        tracing::info!(path = %path.display(), "Grid JSON written");
    }

    Ok(())
}

fn handle_markets(args: DataArgs) -> Result<(), AppError> {
    let store = load_store(&args)?;
    if store.is_empty() {
        return Err(AppError::no_data(format!(
            "No market CSV files found in '{}'",
            args.data_dir.display()
        )));
    }
    print!("{}", crate::report::format_market_list(&store));
    Ok(())
}

fn handle_summary(args: SelectArgs) -> Result<(), AppError> {
    let store = load_store(&args.data)?;
    let (data, crop, records) = pipeline::select_records(&store, &args.market, &args.crop)?;

    let summary = crate::report::summarize_crop(&records)
        .ok_or_else(|| AppError::no_data(format!("No records for {crop} in {}", data.name)))?;

    println!("=== {crop} - {} Market ===", data.name);
    println!("{}", crate::report::format_summary(&crop, &summary));
    if let Some(info) = crate::report::analyze_frequency(&records) {
        print!("{}", crate::report::format_frequency(&info));
    }
    Ok(())
}

fn load_store(args: &DataArgs) -> Result<MarketStore, AppError> {
    MarketStore::load_dir(&args.data_dir)
}

pub fn grid_config_from_args(args: &GridArgs) -> GridConfig {
    GridConfig {
        price_type: args.price_type,
        interpolate: !args.no_interpolate,
        seed: args.seed,
    }
}

/// `--export PATH` wins; `--export-default` names the file after the selection.
fn export_path(args: &GridArgs, market: &str, crop: &str) -> Option<PathBuf> {
    match (&args.export, args.export_default) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(Path::new(".").join(default_export_name(market, crop, args.price_type))),
        (None, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceType;

    fn args(flags: &[&str]) -> GridArgs {
        let mut argv = vec!["wpg", "grid", "-m", "Navi Mumbai", "-c", "Onion"];
        argv.extend_from_slice(flags);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Grid(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_follows_flags() {
        let config = grid_config_from_args(&args(&["--no-interpolate", "--seed", "3", "-p", "min"]));
        assert_eq!(
            config,
            GridConfig {
                price_type: PriceType::Min,
                interpolate: false,
                seed: Some(3),
            }
        );
        assert!(grid_config_from_args(&args(&[])).interpolate);
    }

    #[test]
    fn export_path_resolution() {
        assert_eq!(export_path(&args(&[]), "Navi Mumbai", "Onion"), None);
        assert_eq!(
            export_path(&args(&["--export", "x.csv"]), "Navi Mumbai", "Onion"),
            Some(PathBuf::from("x.csv"))
        );
        let default = export_path(&args(&["--export-default"]), "Navi Mumbai", "Onion").unwrap();
        assert_eq!(
            default.file_name().and_then(|n| n.to_str()),
            Some(default_export_name("Navi Mumbai", "Onion", PriceType::Modal).as_str())
        );
    }
}
