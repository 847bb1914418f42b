//! Raw records to per-region daily series.

use crate::domain::{
    AgeGroupBucket, DailySeries, DailyValue, Point, RawRecord, Region, RegionalSeries, resolve_age_group,
};

/// Group records by region and date, rolling every record up into the national series.
///
/// Records without a date are dropped. With `age_groups` every value lands in a
/// bucket (unrecognized labels go to the unknown-age bucket); without it values
/// are summed as scalars.
pub fn ingest(records: &[RawRecord], age_groups: Option<&[&'static str]>) -> RegionalSeries {
    records.iter().fold(RegionalSeries::new(), |mut out, record| {
        let Some(date) = record.date else {
            return out;
        };

        let value = match age_groups {
            Some(groups) => {
                let label = resolve_age_group(record.age_group.as_deref(), groups);
                let mut bucket = AgeGroupBucket::new();
                bucket.add(label, record.value);
                DailyValue::Bucket(bucket)
            }
            None => DailyValue::Scalar(record.value),
        };

        let region = Region::resolve(record.region.as_deref());
        if !region.is_national() {
            accumulate_into(out.entry(region).or_default(), date, &value);
        }
        accumulate_into(out.entry(Region::Be).or_default(), date, &value);
        out
    })
}

fn accumulate_into(series: &mut DailySeries, date: chrono::NaiveDate, value: &DailyValue) {
    match series.get_mut(&date) {
        Some(existing) => existing.accumulate(value),
        None => {
            series.insert(date, value.clone());
        }
    }
}

/// Totals of a series as date-ordered points.
pub fn region_points(series: &DailySeries) -> Vec<Point> {
    series.iter().map(|(date, value)| Point::new(*date, value.total())).collect()
}

/// One age group's values as points. A bucketed date lacking the label counts as 0.
pub fn age_group_points(series: &DailySeries, label: &str) -> Vec<Point> {
    series
        .iter()
        .map(|(date, value)| {
            let y = match value {
                DailyValue::Bucket(bucket) => bucket.get(label).unwrap_or(0.0),
                DailyValue::Scalar(v) => *v,
            };
            Point::new(*date, y)
        })
        .collect()
}
