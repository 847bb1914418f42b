//! Case counts normalized by population.

use crate::data::PopulationReference;
use crate::domain::{AGE_UNKNOWN, AgeGroupBucket, DailySeries, DailyValue, Point, Region};

use super::rolling::weekly_sums;

pub const DEFAULT_INCIDENCE_WEEKS: usize = 2;
pub const DEFAULT_DENOMINATOR: f64 = 100_000.0;

/// Per-age-group incidence over the trailing `weeks`.
///
/// The unknown-age bucket is always 0, as is any group without a population.
/// `None` when the region has no population or there are no cases.
pub fn incidence(
    daily_cases: &DailySeries,
    region: Region,
    population: &PopulationReference,
    weeks: usize,
    denominator: f64,
) -> Option<DailySeries> {
    if daily_cases.is_empty() || !population.contains(region) {
        return None;
    }
    let total = population.total(region);

    let out = weekly_sums(daily_cases, weeks)
        .into_iter()
        .map(|(date, value)| {
            let value = match value {
                DailyValue::Bucket(bucket) => DailyValue::Bucket(
                    bucket
                        .iter()
                        .map(|(label, cases)| {
                            let rate = if label == AGE_UNKNOWN {
                                0.0
                            } else {
                                rate(denominator, cases, population.get(region, label))
                            };
                            (label, rate)
                        })
                        .collect::<AgeGroupBucket>(),
                ),
                DailyValue::Scalar(cases) => DailyValue::Scalar(rate(denominator, cases, total)),
            };
            (date, value)
        })
        .collect();
    Some(out)
}

/// Incidence of the whole region against its total population.
pub fn incidence_total(
    daily_cases: &DailySeries,
    region: Region,
    population: &PopulationReference,
    weeks: usize,
    denominator: f64,
) -> Option<Vec<Point>> {
    if daily_cases.is_empty() {
        return None;
    }
    let total = population.total(region)?;
    Some(
        weekly_sums(daily_cases, weeks)
            .iter()
            .map(|(date, value)| Point::new(*date, rate(denominator, value.total(), Some(total))))
            .collect(),
    )
}

fn rate(denominator: f64, cases: f64, population: Option<f64>) -> f64 {
    match population {
        Some(p) if p > 0.0 && p.is_finite() => denominator * cases / p,
        _ => 0.0,
    }
}
