//! Headline figures per region, as shown in the summary table.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::PopulationReference;
use crate::dates::add_days;
use crate::domain::{Capacity, Dataset, DailySeries, Measure, PeakRecord, Region};
use crate::series::{
    DEFAULT_DENOMINATOR, DEFAULT_INCIDENCE_WEEKS, ProjectionLabel, average_over, days_to_value_label, incidence_total, peak, positivity,
    saturation_label, week_over_week_change,
};

/// Measures the summary needs loaded.
pub const SUMMARY_MEASURES: [Measure; 6] = [
    Measure::Cases,
    Measure::Hospitalized,
    Measure::Icu,
    Measure::Deaths,
    Measure::Tests,
    Measure::PositiveTests,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: Region,
    pub name: &'static str,
    /// Mean daily cases over the week ending at the reference day.
    pub cases_week_average: Option<f64>,
    /// Change of that mean against the week before, in percent.
    pub cases_week_change: Option<f64>,
    /// Cases per 100k over the trailing two weeks.
    pub incidence: Option<f64>,
    /// Mean daily test positivity over the week, in percent.
    pub positivity_week: Option<f64>,
    pub hospitalized: Option<f64>,
    pub icu: Option<f64>,
    pub hospitalized_peak: Option<PeakRecord>,
    /// Day hospitalizations climb back to that peak at the current rate.
    pub hospitalized_peak_day: Option<ProjectionLabel>,
    pub deaths_week_average: Option<f64>,
    /// National only.
    pub hospital_saturation: Option<ProjectionLabel>,
    /// National only.
    pub icu_saturation: Option<ProjectionLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub today: NaiveDate,
    pub reference_day: NaiveDate,
    pub regions: Vec<RegionSummary>,
}

/// Last week and the week before it, both ending at `reference_day`.
fn week_windows(reference_day: NaiveDate) -> ((NaiveDate, NaiveDate), (NaiveDate, NaiveDate)) {
    (
        (add_days(reference_day, -6), reference_day),
        (add_days(reference_day, -13), add_days(reference_day, -7)),
    )
}

fn week_average(series: &DailySeries, reference_day: NaiveDate) -> f64 {
    let ((start, end), _) = week_windows(reference_day);
    average_over(series, start, end)
}

pub fn summarize_region(
    dataset: &Dataset,
    region: Region,
    population: Option<&PopulationReference>,
    reference_day: NaiveDate,
    today: NaiveDate,
) -> RegionSummary {
    let ((this_start, this_end), (prev_start, prev_end)) = week_windows(reference_day);

    let cases = dataset.series(Measure::Cases, region);
    let cases_week_average = cases.map(|s| average_over(s, this_start, this_end));
    let cases_week_change = cases.and_then(|s| {
        week_over_week_change(
            average_over(s, this_start, this_end),
            Some(average_over(s, prev_start, prev_end)),
        )
    });

    let incidence = cases.zip(population).and_then(|(s, population)| {
        incidence_total(s, region, population, DEFAULT_INCIDENCE_WEEKS, DEFAULT_DENOMINATOR)?
            .into_iter()
            .rev()
            .find(|p| p.x <= reference_day)
            .map(|p| p.y)
    });

    let positivity_week = dataset
        .series(Measure::PositiveTests, region)
        .zip(dataset.series(Measure::Tests, region))
        .and_then(|(positive, tests)| {
            let week: Vec<f64> = positivity(positive, tests)
                .into_iter()
                .filter(|p| p.x >= this_start && p.x <= this_end)
                .map(|p| p.y)
                .collect();
            (!week.is_empty()).then(|| week.iter().sum::<f64>() / week.len() as f64)
        });

    let hospitalized_series = dataset.series(Measure::Hospitalized, region);
    let icu_series = dataset.series(Measure::Icu, region);
    let level = |series: Option<&DailySeries>| {
        series.and_then(|s| s.range(..=reference_day).next_back().map(|(_, v)| v.total()))
    };

    let national = region.is_national();
    let saturation = |series: Option<&DailySeries>, capacity: Capacity| {
        series
            .filter(|_| national)
            .map(|s| saturation_label(s, capacity, reference_day, today))
    };

    let hospitalized_peak = hospitalized_series.and_then(peak);
    let hospitalized_peak_day = hospitalized_series
        .zip(hospitalized_peak)
        .map(|(s, p)| days_to_value_label(s, p.total, reference_day, today));

    RegionSummary {
        region,
        name: region.display_name(),
        cases_week_average,
        cases_week_change,
        incidence,
        positivity_week,
        hospitalized: level(hospitalized_series),
        icu: level(icu_series),
        hospitalized_peak,
        hospitalized_peak_day,
        deaths_week_average: dataset
            .series(Measure::Deaths, region)
            .map(|s| week_average(s, reference_day)),
        hospital_saturation: saturation(hospitalized_series, Capacity::HospitalBeds),
        icu_saturation: saturation(icu_series, Capacity::IcuBeds),
    }
}
