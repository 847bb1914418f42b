use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Number of most recent days whose figures are still expected to be revised upward.
pub const CONSOLIDATION_LAG_DAYS: i64 = 4;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Offset `date` by `n` calendar days (negative moves backward).
///
/// Saturates at the representable date range instead of panicking.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    Duration::try_days(n)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if n < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Like [`add_days`], truncating a fractional offset toward zero.
pub fn add_days_f64(date: NaiveDate, n: f64) -> NaiveDate {
    if !n.is_finite() {
        return date;
    }
    add_days(date, n.trunc() as i64)
}

/// `YYYY-MM-DD` representation of a calendar day.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD` representation of an instant, in UTC, dropping the time of day.
pub fn iso_date_utc(instant: DateTime<Utc>) -> String {
    iso_date(instant.date_naive())
}

/// Absolute difference between two instants, in (possibly fractional) days.
pub fn days_between_instants(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds().abs() as f64 / MS_PER_DAY
}

/// Absolute difference between two calendar days, measured midnight to midnight UTC.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> f64 {
    days_between_instants(midnight(a), midnight(b))
}

/// Truncate an instant to 00:00 of its UTC calendar day.
pub fn normalize_to_midnight(instant: DateTime<Utc>) -> DateTime<Utc> {
    midnight(instant.date_naive())
}

/// The most recent day considered complete.
pub fn last_consolidated_day(reference_now: NaiveDate) -> NaiveDate {
    add_days(reference_now, -CONSOLIDATION_LAG_DAYS)
}

/// Milliseconds since the Unix epoch at midnight UTC of `date`.
pub fn epoch_millis(date: NaiveDate) -> i64 {
    midnight(date).timestamp_millis()
}

/// Parse the date part of a feed timestamp (`2020-03-01` or `2020-03-01T00:00:00`).
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Inclusive iterator over calendar days between two dates, in ascending order.
///
/// The endpoints may be given in either order.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn add_days_moves_both_directions() {
        let date = day("2020-05-07");
        assert_eq!(add_days(date, -5), day("2020-05-02"));
        assert_eq!(add_days(date, 0), date);
        assert_eq!(add_days(date, 5), day("2020-05-12"));
        // The input is a value; calling twice gives the same answer.
        assert_eq!(add_days(date, 5), day("2020-05-12"));
    }

    #[test]
    fn add_days_handles_leap_and_year_rollover() {
        assert_eq!(iso_date(add_days(day("2020-02-28"), 1)), "2020-02-29");
        assert_eq!(iso_date(add_days(day("2019-02-28"), 1)), "2019-03-01");
        assert_eq!(iso_date(add_days(day("2020-12-31"), 1)), "2021-01-01");
        assert_eq!(iso_date(add_days(day("2021-01-01"), -1)), "2020-12-31");
    }

    #[test]
    fn add_days_f64_truncates() {
        assert_eq!(add_days_f64(day("2020-05-07"), 2.9), day("2020-05-09"));
        assert_eq!(add_days_f64(day("2020-05-07"), -2.9), day("2020-05-05"));
        assert_eq!(add_days_f64(day("2020-05-07"), f64::NAN), day("2020-05-07"));
    }

    #[test]
    fn add_days_saturates() {
        assert_eq!(add_days(day("2020-05-07"), i64::MAX), NaiveDate::MAX);
        assert_eq!(add_days(day("2020-05-07"), i64::MIN), NaiveDate::MIN);
    }

    #[test]
    fn iso_date_drops_time_of_day() {
        let instant = day("2020-05-07").and_hms_opt(23, 59, 59).unwrap().and_utc();
        assert_eq!(iso_date_utc(instant), "2020-05-07");
    }

    #[test]
    fn days_between_is_symmetric_and_leap_aware() {
        let a = day("2019-05-07");
        let b = day("2020-05-07");
        assert_eq!(days_between(a, a), 0.0);
        assert_eq!(days_between(a, b), 366.0);
        assert_eq!(days_between(b, a), 366.0);
        assert_eq!(days_between(day("2018-05-07"), a), 365.0);
    }

    #[test]
    fn days_between_instants_keeps_fractions() {
        let a = day("2020-05-07").and_hms_opt(0, 0, 0).unwrap().and_utc();
        let b = day("2020-05-07").and_hms_opt(12, 0, 0).unwrap().and_utc();
        assert!((days_between_instants(a, b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn normalize_to_midnight_truncates() {
        let instant = day("2020-05-07").and_hms_opt(17, 3, 1).unwrap().and_utc();
        let normalized = normalize_to_midnight(instant);
        assert_eq!(normalized, day("2020-05-07").and_hms_opt(0, 0, 0).unwrap().and_utc());
    }

    #[test]
    fn last_consolidated_day_is_four_days_back() {
        for now in ["2020-03-02", "2021-01-01", "2020-05-07"] {
            let now = day(now);
            assert_eq!(last_consolidated_day(now), add_days(now, -4));
            assert_eq!(days_between(now, last_consolidated_day(now)), 4.0);
        }
    }

    #[test]
    fn parse_iso_date_accepts_timestamps() {
        assert_eq!(parse_iso_date("2020-03-01"), Some(day("2020-03-01")));
        assert_eq!(parse_iso_date("2020-03-01T00:00:00"), Some(day("2020-03-01")));
        assert_eq!(parse_iso_date(" 2020-03-01 "), Some(day("2020-03-01")));
        assert_eq!(parse_iso_date("03/01/2020"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn date_range_is_inclusive_and_orientation_free() {
        let forward: Vec<_> = DateRange::new(day("2020-02-27"), day("2020-03-01")).collect();
        let backward: Vec<_> = DateRange::new(day("2020-03-01"), day("2020-02-27")).collect();
        assert_eq!(forward.len(), 4);
        assert_eq!(forward, backward);
        assert_eq!(forward[2], day("2020-02-29"));
        assert_eq!(DateRange::new(day("2020-03-01"), day("2020-03-01")).count(), 1);
    }
}
