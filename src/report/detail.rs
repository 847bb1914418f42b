//! Per-measure views behind the `series` and `incidence` commands.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::PopulationReference;
use crate::dates::add_days;
use crate::domain::{AgeGroupBucket, DailySeries, Measure, PeakRecord, Point, Region};
use crate::io::SeriesRow;
use crate::series::{
    average_over, change_ratio_points, incidence, incidence_total, moving_average, peak, polynomial_trend,
    region_points, week_over_week_change,
};

/// Settings for a derived series view.
#[derive(Debug, Clone, Copy)]
pub struct SeriesOptions {
    pub window: usize,
    pub trend_degree: usize,
    /// Number of most recent consolidated days the trend is fitted on.
    pub trend_days: usize,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            window: 7,
            trend_degree: 3,
            trend_days: 28,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesReport {
    pub measure: Measure,
    pub region: Region,
    pub reference_day: NaiveDate,
    pub rows: Vec<SeriesRow>,
    /// Week-over-week change of the moving average, per day.
    pub changes: Vec<Point>,
    pub week_change: Option<f64>,
    pub peak: Option<PeakRecord>,
}

pub fn build_series_report(
    series: &DailySeries,
    measure: Measure,
    region: Region,
    reference_day: NaiveDate,
    options: SeriesOptions,
) -> SeriesReport {
    let raw = region_points(series);
    let average = moving_average(&raw, options.window);

    let consolidated: Vec<Point> = raw.iter().copied().filter(|p| p.x <= reference_day).collect();
    let fit_from = consolidated.len().saturating_sub(options.trend_days);
    let trend = polynomial_trend(&consolidated[fit_from..], options.trend_degree).unwrap_or_default();

    let rows = raw
        .iter()
        .zip(&average)
        .map(|(r, a)| SeriesRow {
            date: r.x,
            raw: r.y,
            average: a.y,
            trend: trend.iter().find(|t| t.x == r.x).map(|t| t.y),
        })
        .collect();

    let this_week = average_over(series, add_days(reference_day, -6), reference_day);
    let last_week = average_over(series, add_days(reference_day, -13), add_days(reference_day, -7));

    SeriesReport {
        measure,
        region,
        reference_day,
        rows,
        changes: change_ratio_points(&average, 7),
        week_change: week_over_week_change(this_week, Some(last_week)),
        peak: peak(series),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidenceReport {
    pub region: Region,
    pub weeks: usize,
    pub denominator: f64,
    /// Last date with an incidence figure, at or before the reference day.
    pub date: NaiveDate,
    pub groups: AgeGroupBucket,
    pub total: Option<f64>,
}

/// `None` when the region has no population or no case data up to the reference day.
pub fn build_incidence_report(
    cases: &DailySeries,
    region: Region,
    population: &PopulationReference,
    weeks: usize,
    denominator: f64,
    reference_day: NaiveDate,
) -> Option<IncidenceReport> {
    let by_group = incidence(cases, region, population, weeks, denominator)?;
    let (date, value) = by_group.range(..=reference_day).next_back()?;
    let total = incidence_total(cases, region, population, weeks, denominator)
        .and_then(|points| points.into_iter().find(|p| p.x == *date))
        .map(|p| p.y);

    Some(IncidenceReport {
        region,
        weeks,
        denominator,
        date: *date,
        groups: value.as_bucket().cloned().unwrap_or_default(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AGE_UNKNOWN, DailyValue};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn linear(days: i64) -> DailySeries {
        (0..days)
            .map(|i| (add_days(day("2020-03-01"), i), DailyValue::Scalar(10.0 + i as f64)))
            .collect()
    }

    #[test]
    fn series_report_fits_trend_on_consolidated_days() {
        let series = linear(40);
        let reference = day("2020-04-05"); // index 35
        let report = build_series_report(&series, Measure::Cases, Region::Be, reference, SeriesOptions::default());

        assert_eq!(report.rows.len(), 40);
        assert_eq!(report.rows[0].average, 10.0);
        assert!(report.rows.iter().filter(|r| r.trend.is_some()).count() == 28);
        let last_fitted = report.rows.iter().rev().find(|r| r.trend.is_some()).unwrap();
        assert_eq!(last_fitted.date, reference);
        assert!((last_fitted.trend.unwrap() - 45.0).abs() < 1e-6);
        assert!(report.rows[39].trend.is_none());

        // Weekly means 42 and 35.
        assert_eq!(report.week_change, Some(20.0));
        assert_eq!(report.peak.map(|p| p.date), Some(day("2020-04-09")));
        assert_eq!(report.changes.len(), 33);
    }

    #[test]
    fn series_report_without_enough_points_has_no_trend() {
        let report = build_series_report(
            &linear(3),
            Measure::Icu,
            Region::Be,
            day("2020-03-03"),
            SeriesOptions::default(),
        );
        assert!(report.rows.iter().all(|r| r.trend.is_none()));
        assert_eq!(report.week_change, None);
    }

    #[test]
    fn incidence_report_picks_latest_consolidated_date() {
        let cases: DailySeries = (0..20)
            .map(|i| {
                let bucket: AgeGroupBucket = [("0-9", 1.0), (AGE_UNKNOWN, 3.0)].into_iter().collect();
                (add_days(day("2020-03-01"), i), DailyValue::Bucket(bucket))
            })
            .collect();
        let population = PopulationReference::from_rows([(Region::Lim, "0-9", 1_000.0)]);

        let report = build_incidence_report(&cases, Region::Lim, &population, 1, 1_000.0, day("2020-03-15")).unwrap();
        assert_eq!(report.date, day("2020-03-15"));
        assert_eq!(report.groups.get("0-9"), Some(7.0));
        assert_eq!(report.groups.get(AGE_UNKNOWN), Some(0.0));
        assert_eq!(report.total, Some(28.0));

        assert!(build_incidence_report(&cases, Region::Lim, &population, 1, 1_000.0, day("2020-03-02")).is_none());
        assert!(build_incidence_report(&cases, Region::Ant, &population, 1, 1_000.0, day("2020-03-15")).is_none());
    }
}
