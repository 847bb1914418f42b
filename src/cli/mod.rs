//! Command-line parsing for the Belgian COVID-19 figures tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the derivation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{Measure, Region};
use crate::series::{DEFAULT_DENOMINATOR, DEFAULT_INCIDENCE_WEEKS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "belcovid", version, about = "Belgian COVID-19 figures from Sciensano open data")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Headline table: weekly averages, change, incidence, positivity and care load.
    Summary(SummaryArgs),
    /// One measure as a daily series with moving average and trend.
    Series(SeriesArgs),
    /// Per-age-group incidence for one region.
    Incidence(IncidenceArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Region key (be, ant, ovl, vbr, lim, wvl, hnt, lge, lux, nam, brw, bxl).
    #[arg(short, long, value_enum, default_value_t = Region::Be)]
    pub region: Region,

    /// Read feed JSON files from this directory instead of downloading them.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Cache downloaded feeds here (defaults to BELCOVID_CACHE_DIR).
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Re-download cached feeds older than this.
    #[arg(long, default_value_t = 12)]
    pub max_age_hours: u64,

    /// Day treated as today (YYYY-MM-DD). Defaults to the current UTC day.
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub reference_date: Option<NaiveDate>,

    /// Population CSV (`region,age_group,population`), defaults to BELCOVID_POPULATION.
    #[arg(long, value_name = "CSV")]
    pub population: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Summarize every region, not just `--region`.
    #[arg(long)]
    pub all_regions: bool,

    /// Export the summary to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(short, long, value_enum, default_value_t = Measure::Cases)]
    pub measure: Measure,

    /// Moving average window (days).
    #[arg(long, default_value_t = 7)]
    pub window: usize,

    /// Degree of the polynomial trend.
    #[arg(long, default_value_t = 3)]
    pub trend_degree: usize,

    /// Number of consolidated days the trend is fitted on.
    #[arg(long, default_value_t = 28)]
    pub trend_days: usize,

    /// Show only the last N days (0 for all).
    #[arg(long, default_value_t = 21)]
    pub rows: usize,

    /// Export `date,raw,average,trend` to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct IncidenceArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Trailing window in weeks.
    #[arg(long, default_value_t = DEFAULT_INCIDENCE_WEEKS)]
    pub weeks: usize,

    /// Population denominator.
    #[arg(long, default_value_t = DEFAULT_DENOMINATOR)]
    pub denominator: f64,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
