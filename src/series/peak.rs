use crate::domain::{DailySeries, PeakRecord};

use super::aggregate::region_points;
use super::rolling::moving_average;

pub const PEAK_SMOOTHING_WINDOW: usize = 7;

/// Highest point of the 7-day average of the series totals.
///
/// Ties go to the earliest date.
pub fn peak(series: &DailySeries) -> Option<PeakRecord> {
    moving_average(&region_points(series), PEAK_SMOOTHING_WINDOW)
        .into_iter()
        .fold(None, |best: Option<PeakRecord>, p| match best {
            Some(b) if b.total >= p.y => Some(b),
            _ => Some(PeakRecord { date: p.x, total: p.y }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyValue;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn peak_is_taken_from_the_smoothed_series() {
        let series: DailySeries = [
            (day("2020-03-01"), DailyValue::Scalar(1.0)),
            (day("2020-03-02"), DailyValue::Scalar(5.0)),
            (day("2020-03-03"), DailyValue::Scalar(3.0)),
        ]
        .into_iter()
        .collect();
        // Averages are [1, 3, 3]; the first 3 wins.
        assert_eq!(
            peak(&series),
            Some(PeakRecord {
                date: day("2020-03-02"),
                total: 3.0
            })
        );
    }

    #[test]
    fn empty_series_has_no_peak() {
        assert_eq!(peak(&DailySeries::new()), None);
    }
}
