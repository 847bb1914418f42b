//! Naive compound-growth extrapolation toward a target level.
//!
//! These are illustrations of the current growth rate, not forecasts. The
//! only guard is that the series must be growing week over week.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Serialize, Serializer};

use crate::dates::add_days;
use crate::domain::{Capacity, DailySeries};

use super::rolling::average_over;

/// Length of the compounding period, in days.
pub const GROWTH_PERIOD_DAYS: i64 = 7;

/// Projections further out than this, in either direction, are dropped.
pub const MAX_PROJECTION_DAYS: i64 = 3_650;

/// Day on which the series reaches `target` if the last week's growth rate holds.
///
/// Compares the 7-day average ending at `reference_day` with the one ending a
/// week earlier. `None` unless the series is growing, or when the target is
/// more than [`MAX_PROJECTION_DAYS`] away.
pub fn days_to_value(series: &DailySeries, target: f64, reference_day: NaiveDate) -> Option<NaiveDate> {
    let day1 = average_over(
        series,
        add_days(reference_day, -(2 * GROWTH_PERIOD_DAYS - 1)),
        add_days(reference_day, -GROWTH_PERIOD_DAYS),
    );
    let day2 = average_over(series, add_days(reference_day, -(GROWTH_PERIOD_DAYS - 1)), reference_day);
    if day2 <= 0.0 || day1 <= 0.0 || day1 >= day2 {
        return None;
    }

    let pc_change = (day2 - day1) / day1;
    let n = 1.0 / GROWTH_PERIOD_DAYS as f64;
    let days = (target / day2).ln() / (n * (1.0 + pc_change / n).ln());
    let days = days.round();
    if !days.is_finite() || days.abs() > MAX_PROJECTION_DAYS as f64 {
        return None;
    }
    Duration::try_days(days as i64).and_then(|delta| reference_day.checked_add_signed(delta))
}

/// What to show for a projected date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionLabel {
    NotAvailable,
    Today,
    Exceeded,
    Date(NaiveDate),
}

impl fmt::Display for ProjectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionLabel::NotAvailable => write!(f, "N.A."),
            ProjectionLabel::Today => write!(f, "Today"),
            ProjectionLabel::Exceeded => write!(f, "Exceeded"),
            ProjectionLabel::Date(date) => write!(f, "{}", date.format("%a %b %d %Y")),
        }
    }
}

impl Serialize for ProjectionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProjectionLabel::Date(date) => date.serialize(serializer),
            other => serializer.collect_str(other),
        }
    }
}

/// [`days_to_value`] turned into a label relative to `today`.
pub fn days_to_value_label(
    series: &DailySeries,
    target: f64,
    reference_day: NaiveDate,
    today: NaiveDate,
) -> ProjectionLabel {
    projection_label(days_to_value(series, target, reference_day), reference_day, today)
}

/// Label for an already computed projection.
pub fn projection_label(projected: Option<NaiveDate>, reference_day: NaiveDate, today: NaiveDate) -> ProjectionLabel {
    match projected {
        None => ProjectionLabel::NotAvailable,
        Some(date) if date == reference_day => ProjectionLabel::Today,
        Some(date) if date < today => ProjectionLabel::Exceeded,
        Some(date) => ProjectionLabel::Date(date),
    }
}

/// Projected day the occupancy series fills the national capacity.
pub fn saturation_day(series: &DailySeries, capacity: Capacity, reference_day: NaiveDate) -> Option<NaiveDate> {
    days_to_value(series, capacity.beds(), reference_day)
}

/// [`saturation_day`] as a label relative to `today`.
pub fn saturation_label(
    series: &DailySeries,
    capacity: Capacity,
    reference_day: NaiveDate,
    today: NaiveDate,
) -> ProjectionLabel {
    projection_label(saturation_day(series, capacity, reference_day), reference_day, today)
}
