//! Rolling averages, trend fits and week-over-week comparisons.

use chrono::NaiveDate;

use crate::dates::{DateRange, add_days, epoch_millis};
use crate::domain::{DailySeries, Point};
use crate::math::fit_polynomial;

/// Trailing moving average. The window shrinks at the start of the series, so
/// the first point keeps its raw value.
pub fn moving_average(points: &[Point], window: usize) -> Vec<Point> {
    if window <= 1 {
        return points.to_vec();
    }
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &points[start..=i];
            let mean = slice.iter().map(|q| q.y).sum::<f64>() / slice.len() as f64;
            Point::new(p.x, mean)
        })
        .collect()
}

/// Least-squares polynomial through the points, evaluated at each input date.
///
/// The abscissa is milliseconds since the epoch. Returns `None` for degree 0,
/// too few points, or an unsolvable system.
pub fn polynomial_trend(points: &[Point], degree: usize) -> Option<Vec<Point>> {
    let xs: Vec<f64> = points.iter().map(|p| epoch_millis(p.x) as f64).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let poly = fit_polynomial(&xs, &ys, degree)?;
    Some(
        points
            .iter()
            .zip(&xs)
            .map(|(p, x)| Point::new(p.x, poly.eval(*x)))
            .collect(),
    )
}

/// Round half away from zero to two decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Percent change from `old` to `new`, rounded to two decimals.
///
/// `None` when there is no usable baseline.
pub fn week_over_week_change(new: f64, old: Option<f64>) -> Option<f64> {
    let old = old?;
    if old == 0.0 || !old.is_finite() || !new.is_finite() {
        return None;
    }
    Some(round2(100.0 * (new - old) / old))
}

/// Trailing `weeks * 7` day sums, one per date from the seventh entry onward.
///
/// Missing calendar days contribute nothing. Buckets are summed group by group.
/// Empty when `weeks` is 0 or the span does not fit in a day count.
pub fn weekly_sums(series: &DailySeries, weeks: usize) -> DailySeries {
    let mut out = DailySeries::new();
    let Some(span) = weeks.checked_mul(7).and_then(|days| i64::try_from(days).ok()) else {
        return out;
    };
    if span == 0 {
        return out;
    }
    for date in series.keys().skip(6) {
        let start = add_days(*date, -(span - 1));
        let mut window = series.range(start..=*date).map(|(_, v)| v);
        let Some(first) = window.next() else {
            continue;
        };
        let sum = window.fold(first.clone(), |mut acc, v| {
            acc.accumulate(v);
            acc
        });
        out.insert(*date, sum);
    }
    out
}

/// Mean total over the days in `[start, end]` that have data (either order).
///
/// `0.0` when no day in range has data.
pub fn average_over(series: &DailySeries, start: NaiveDate, end: NaiveDate) -> f64 {
    let (sum, count) = DateRange::new(start, end)
        .filter_map(|d| series.get(&d))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v.total(), count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Week-over-week change of each point against the point `lag` positions back.
///
/// Points without a usable baseline are left out.
pub fn change_ratio_points(points: &[Point], lag: usize) -> Vec<Point> {
    points
        .iter()
        .enumerate()
        .skip(lag)
        .filter_map(|(i, p)| {
            let old = points[i - lag].y;
            week_over_week_change(p.y, Some(old)).map(|change| Point::new(p.x, change))
        })
        .collect()
}
