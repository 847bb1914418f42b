//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments into a `RunConfig`
//! - runs the pipeline for the chosen subcommand
//! - prints reports and writes optional exports

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use crate::cli::{Command, CommonArgs, IncidenceArgs, SeriesArgs, SummaryArgs};
use crate::data::DEFAULT_BASE_URL;
use crate::domain::{DataSourceConfig, RunConfig};
use crate::error::AppError;
use crate::report::SeriesOptions;

pub mod pipeline;

/// Entry point for the `belcovid` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Series(args) => handle_series(args),
        Command::Incidence(args) => handle_incidence(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let mut config = run_config_from_args(&args.common);
    config.all_regions = args.all_regions;
    config.export_json = args.export.clone();

    let summary = pipeline::run_summary(&config)?;
    println!("{}", crate::report::format_summary(&summary));

    if let Some(path) = &config.export_json {
        crate::io::write_summary_json(path, &summary)?;
        info!(path = %path.display(), "summary exported");
    }
    Ok(())
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let options = series_options_from_args(&args)?;
    let config = run_config_from_args(&args.common);

    let report = pipeline::run_series(&config, args.measure, options)?;
    println!("{}", crate::report::format_series(&report, args.rows));

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &report.rows)?;
        info!(path = %path.display(), "series exported");
    }
    Ok(())
}

fn handle_incidence(args: IncidenceArgs) -> Result<(), AppError> {
    validate_incidence_args(&args)?;
    let config = run_config_from_args(&args.common);
    let report = pipeline::run_incidence(&config, args.weeks, args.denominator)?;
    println!("{}", crate::report::format_incidence(&report));
    Ok(())
}

/// Highest polynomial degree accepted for `--trend-degree`.
pub const MAX_TREND_DEGREE: usize = 10;

/// Longest incidence window accepted for `--weeks`.
pub const MAX_INCIDENCE_WEEKS: usize = 52;

fn series_options_from_args(args: &SeriesArgs) -> Result<SeriesOptions, AppError> {
    if !(1..=MAX_TREND_DEGREE).contains(&args.trend_degree) {
        return Err(AppError::invalid_input(format!(
            "--trend-degree must be between 1 and {MAX_TREND_DEGREE}."
        )));
    }
    Ok(SeriesOptions {
        window: args.window,
        trend_degree: args.trend_degree,
        trend_days: args.trend_days,
    })
}

fn validate_incidence_args(args: &IncidenceArgs) -> Result<(), AppError> {
    if !(1..=MAX_INCIDENCE_WEEKS).contains(&args.weeks) {
        return Err(AppError::invalid_input(format!(
            "--weeks must be between 1 and {MAX_INCIDENCE_WEEKS}."
        )));
    }
    if !(args.denominator.is_finite() && args.denominator > 0.0) {
        return Err(AppError::invalid_input("--denominator must be a positive number."));
    }
    Ok(())
}

/// Resolve flags plus environment defaults into a run configuration.
///
/// "Today" is read from the clock here and nowhere else.
pub fn run_config_from_args(args: &CommonArgs) -> RunConfig {
    let source = match &args.data_dir {
        Some(dir) => DataSourceConfig::Local(dir.clone()),
        None => DataSourceConfig::Remote {
            base_url: env_or("BELCOVID_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache_dir: args.cache_dir.clone().or_else(|| env_or("BELCOVID_CACHE_DIR").map(PathBuf::from)),
            max_age: Duration::from_secs(args.max_age_hours.saturating_mul(60 * 60)),
        },
    };

    RunConfig {
        source,
        region: args.region,
        all_regions: false,
        today: args.reference_date.unwrap_or_else(|| Utc::now().date_naive()),
        population_path: args
            .population
            .clone()
            .or_else(|| env_or("BELCOVID_POPULATION").map(PathBuf::from)),
        export_json: None,
    }
}

fn env_or(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
