use crate::domain::{DailySeries, Point};

/// Percentage of tests that came back positive, per date with at least one test.
pub fn positivity(cases: &DailySeries, tests: &DailySeries) -> Vec<Point> {
    cases
        .iter()
        .filter_map(|(date, positive)| {
            let tested = tests.get(date)?.total();
            (tested > 0.0).then(|| Point::new(*date, 100.0 * positive.total() / tested))
        })
        .collect()
}
