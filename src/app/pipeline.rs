//! Shared load-and-derive logic behind every subcommand.
//!
//! feed load -> ingest -> aggregate -> derive
//!
//! The commands in `app` only pick what to derive and how to print it.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};

use crate::data::{PopulationReference, load_feed};
use crate::dates::last_consolidated_day;
use crate::domain::{DataSourceConfig, Dataset, Feed, Measure, Region, RunConfig};
use crate::error::AppError;
use crate::io::records_from_json;
use crate::report::{
    IncidenceReport, SUMMARY_MEASURES, SeriesOptions, SeriesReport, Summary, build_incidence_report,
    build_series_report, summarize_region,
};
use crate::series::ingest;

/// Load each needed feed once and aggregate every requested measure.
pub fn load_dataset(source: &DataSourceConfig, measures: &[Measure]) -> Result<Dataset, AppError> {
    let mut feeds: BTreeMap<Feed, Value> = BTreeMap::new();
    for measure in measures {
        let feed = measure.feed();
        if !feeds.contains_key(&feed) {
            feeds.insert(feed, load_feed(feed, source)?);
        }
    }

    let mut dataset = Dataset::default();
    for &measure in measures {
        let Some(payload) = feeds.get(&measure.feed()) else {
            continue;
        };
        let ingested = records_from_json(payload, measure)?;
        if ingested.rows_without_date > 0 {
            warn!(
                measure = ?measure,
                dropped = ingested.rows_without_date,
                rows = ingested.rows_read,
                "rows without a date were dropped"
            );
        }
        info!(measure = ?measure, rows = ingested.rows_read, "measure ingested");
        dataset.insert(measure, ingest(&ingested.records, measure.age_groups()));
    }

    if dataset.is_empty() {
        return Err(AppError::no_data("No usable records in the loaded feeds."));
    }
    Ok(dataset)
}

fn load_population(config: &RunConfig) -> Result<Option<PopulationReference>, AppError> {
    config
        .population_path
        .as_deref()
        .map(PopulationReference::from_csv)
        .transpose()
}

fn regions(config: &RunConfig) -> Vec<Region> {
    if config.all_regions {
        Region::ALL.to_vec()
    } else {
        vec![config.region]
    }
}

/// Build the headline summary for the configured region(s).
pub fn run_summary(config: &RunConfig) -> Result<Summary, AppError> {
    let dataset = load_dataset(&config.source, &SUMMARY_MEASURES)?;
    run_summary_with_dataset(config, &dataset)
}

/// Summary over an already loaded dataset. Regions are summarized in parallel.
pub fn run_summary_with_dataset(config: &RunConfig, dataset: &Dataset) -> Result<Summary, AppError> {
    let population = load_population(config)?;
    let reference_day = last_consolidated_day(config.today);

    let regions: Vec<_> = regions(config)
        .par_iter()
        .map(|&region| summarize_region(dataset, region, population.as_ref(), reference_day, config.today))
        .collect();

    Ok(Summary {
        today: config.today,
        reference_day,
        regions,
    })
}

/// Derive one measure for one region.
pub fn run_series(config: &RunConfig, measure: Measure, options: SeriesOptions) -> Result<SeriesReport, AppError> {
    let dataset = load_dataset(&config.source, &[measure])?;
    let series = dataset.series(measure, config.region).ok_or_else(|| {
        AppError::no_data(
            format!("No {} data for {}.", measure.display_name(), config.region.display_name()),
        )
    })?;
    Ok(build_series_report(
        series,
        measure,
        config.region,
        last_consolidated_day(config.today),
        options,
    ))
}

/// Per-age-group incidence for one region.
pub fn run_incidence(config: &RunConfig, weeks: usize, denominator: f64) -> Result<IncidenceReport, AppError> {
    let population = load_population(config)?
        .ok_or_else(|| AppError::invalid_input("Incidence needs a population file (--population or BELCOVID_POPULATION)."))?;
    let dataset = load_dataset(&config.source, &[Measure::Cases])?;
    let cases = dataset
        .series(Measure::Cases, config.region)
        .ok_or_else(|| AppError::no_data(format!("No case data for {}.", config.region.display_name())))?;

    build_incidence_report(
        cases,
        config.region,
        &population,
        weeks,
        denominator,
        last_consolidated_day(config.today),
    )
    .ok_or_else(|| {
        AppError::no_data(
            format!(
                "No incidence for {}: missing population or too little case history.",
                config.region.display_name()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{add_days, iso_date};
    use crate::series::ProjectionLabel;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Three weeks of feeds ending on 2020-04-01, growing in the last week.
    fn write_feeds(dir: &Path) {
        let start = day("2020-03-12");
        let mut cases = Vec::new();
        let mut hosp = Vec::new();
        let mut tests = Vec::new();
        let mut deaths = Vec::new();
        for i in 0..21 {
            let date = iso_date(add_days(start, i));
            let scale = if i < 14 { 1.0 } else { 2.0 };
            for (province, n) in [("Namur", 10.0), ("Limburg", 30.0)] {
                cases.push(json!({"DATE": date, "PROVINCE": province, "AGEGROUP": "20-29", "CASES": n * scale}));
                hosp.push(json!({
                    "DATE": date, "PROVINCE": province,
                    "TOTAL_IN": 100.0 * scale, "TOTAL_IN_ICU": 20.0 * scale, "NEW_IN": 5
                }));
                tests.push(json!({"DATE": date, "PROVINCE": province, "TESTS_ALL": 400, "TESTS_ALL_POS": n}));
            }
            deaths.push(json!({"DATE": date, "REGION": "Flanders", "AGEGROUP": "85+", "DEATHS": 2}));
        }
        cases.push(json!({"PROVINCE": "Namur", "CASES": 999}));

        for (feed, rows) in [
            (Feed::Cases, cases),
            (Feed::Hospitalizations, hosp),
            (Feed::Tests, tests),
            (Feed::Mortality, deaths),
        ] {
            fs::write(dir.join(feed.file_name()), Value::Array(rows).to_string()).unwrap();
        }
        fs::write(dir.join("population.csv"), "region,age_group,population\nnam,20-29,50000\nlim,20-29,100000\n")
            .unwrap();
    }

    fn config(dir: &Path, region: Region, all_regions: bool) -> RunConfig {
        RunConfig {
            source: DataSourceConfig::Local(dir.to_path_buf()),
            region,
            all_regions,
            // Reference day is four days earlier: 2020-04-01.
            today: day("2020-04-05"),
            population_path: Some(dir.join("population.csv")),
            export_json: None,
        }
    }

    #[test]
    fn summary_over_local_feeds() {
        let dir = tempfile::tempdir().unwrap();
        write_feeds(dir.path());

        let summary = run_summary(&config(dir.path(), Region::Be, true)).unwrap();
        assert_eq!(summary.reference_day, day("2020-04-01"));
        assert_eq!(summary.regions.len(), Region::ALL.len());

        let be = &summary.regions[0];
        assert_eq!(be.region, Region::Be);
        assert_eq!(be.cases_week_average, Some(80.0));
        assert_eq!(be.cases_week_change, Some(100.0));
        assert_eq!(be.hospitalized, Some(400.0));
        assert_eq!(be.icu, Some(80.0));
        assert_eq!(be.deaths_week_average, Some(2.0));
        assert_eq!(be.positivity_week, Some(5.0));
        assert!(be.incidence.is_some());
        assert!(matches!(be.icu_saturation, Some(ProjectionLabel::Date(_))));

        let nam = summary.regions.iter().find(|r| r.region == Region::Nam).unwrap();
        assert_eq!(nam.cases_week_average, Some(20.0));
        assert_eq!(nam.icu_saturation, None);
        assert_eq!(nam.deaths_week_average, None);

        let ant = summary.regions.iter().find(|r| r.region == Region::Ant).unwrap();
        assert_eq!(ant.cases_week_average, None);
    }

    #[test]
    fn series_and_incidence_over_local_feeds() {
        let dir = tempfile::tempdir().unwrap();
        write_feeds(dir.path());

        let report = run_series(&config(dir.path(), Region::Lim, false), Measure::Cases, SeriesOptions::default())
            .unwrap();
        assert_eq!(report.rows.len(), 21);
        assert_eq!(report.rows[0].raw, 30.0);
        assert_eq!(report.week_change, Some(100.0));

        let incidence = run_incidence(&config(dir.path(), Region::Nam, false), 2, 100_000.0).unwrap();
        assert_eq!(incidence.date, day("2020-04-01"));
        // 7 days at 10 and 7 days at 20 over 50k people.
        assert_eq!(incidence.groups.get("20-29"), Some(100_000.0 * 210.0 / 50_000.0));
    }

    #[test]
    fn missing_region_data_is_a_no_data_error() {
        let dir = tempfile::tempdir().unwrap();
        write_feeds(dir.path());

        let err = run_series(&config(dir.path(), Region::Ant, false), Measure::Icu, SeriesOptions::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let mut no_population = config(dir.path(), Region::Nam, false);
        no_population.population_path = None;
        assert_eq!(run_incidence(&no_population, 2, 100_000.0).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn empty_feeds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(Feed::Cases.file_name()), "[]").unwrap();
        let err = load_dataset(&DataSourceConfig::Local(dir.path().to_path_buf()), &[Measure::Cases]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
