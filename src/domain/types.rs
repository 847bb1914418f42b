//! Shared domain types.
//!
//! Series are plain ordered maps so every transform can build a fresh one and
//! hand it to the next stage (or to serde for export) without ceremony.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::reference::{AGE_GROUPS_CASES, AGE_GROUPS_MORTALITY, AGE_UNKNOWN, Region};

/// One observation from a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: Option<NaiveDate>,
    pub region: Option<String>,
    pub age_group: Option<String>,
    pub value: f64,
}

/// Per-age-group values at one date.
///
/// There is no stored total: [`AgeGroupBucket::total`] always sums the parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeGroupBucket {
    groups: BTreeMap<String, f64>,
}

impl AgeGroupBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str, value: f64) {
        *self.groups.entry(label.to_string()).or_insert(0.0) += value;
    }

    pub fn set(&mut self, label: &str, value: f64) {
        self.groups.insert(label.to_string(), value);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.groups.get(label).copied()
    }

    pub fn total(&self) -> f64 {
        self.groups.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for AgeGroupBucket {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut bucket = AgeGroupBucket::new();
        for (label, value) in iter {
            bucket.add(label, value);
        }
        bucket
    }
}

impl Serialize for AgeGroupBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        for (label, value) in &self.groups {
            map.serialize_entry(label, value)?;
        }
        map.serialize_entry("total", &self.total())?;
        map.end()
    }
}

/// The value of a series at one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DailyValue {
    Scalar(f64),
    Bucket(AgeGroupBucket),
}

impl DailyValue {
    pub fn total(&self) -> f64 {
        match self {
            DailyValue::Scalar(v) => *v,
            DailyValue::Bucket(bucket) => bucket.total(),
        }
    }

    pub fn as_bucket(&self) -> Option<&AgeGroupBucket> {
        match self {
            DailyValue::Bucket(bucket) => Some(bucket),
            DailyValue::Scalar(_) => None,
        }
    }

    /// Add `other` into `self`, group by group for buckets.
    ///
    /// A scalar merged into a bucket lands in the unknown-age bucket.
    pub fn accumulate(&mut self, other: &DailyValue) {
        match (self, other) {
            (DailyValue::Scalar(a), b) => *a += b.total(),
            (DailyValue::Bucket(a), DailyValue::Bucket(b)) => {
                for (label, value) in b.iter() {
                    a.add(label, value);
                }
            }
            (DailyValue::Bucket(a), DailyValue::Scalar(b)) => a.add(AGE_UNKNOWN, *b),
        }
    }
}

/// Date-ordered values for one region. Missing dates mean "no data", not zero.
pub type DailySeries = BTreeMap<NaiveDate, DailyValue>;

/// One series per region, including the national aggregate.
pub type RegionalSeries = BTreeMap<Region, DailySeries>;

/// An `(x, y)` pair, the currency between smoothing, trend fitting and output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: NaiveDate,
    pub y: f64,
}

impl Point {
    pub fn new(x: NaiveDate, y: f64) -> Self {
        Self { x, y }
    }
}

/// Date and value of the maximum of a smoothed series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakRecord {
    pub date: NaiveDate,
    pub total: f64,
}

/// A published upstream JSON feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    Cases,
    Hospitalizations,
    Mortality,
    Tests,
}

impl Feed {
    pub fn file_name(self) -> &'static str {
        match self {
            Feed::Cases => "COVID19BE_CASES_AGESEX.json",
            Feed::Hospitalizations => "COVID19BE_HOSP.json",
            Feed::Mortality => "COVID19BE_MORT.json",
            Feed::Tests => "COVID19BE_tests.json",
        }
    }

    /// Key under which the raw payload is cached.
    pub fn cache_key(self) -> &'static str {
        match self {
            Feed::Cases => "cases",
            Feed::Hospitalizations => "hospitalizations",
            Feed::Mortality => "mortality",
            Feed::Tests => "tests",
        }
    }

    pub fn date_key(self) -> &'static str {
        "DATE"
    }

    /// Column carrying the province. Mortality is only published by region,
    /// which does not map onto provinces, so it is treated as national only.
    pub fn region_key(self) -> Option<&'static str> {
        match self {
            Feed::Cases | Feed::Hospitalizations | Feed::Tests => Some("PROVINCE"),
            Feed::Mortality => None,
        }
    }

    pub fn age_key(self) -> Option<&'static str> {
        match self {
            Feed::Cases | Feed::Mortality => Some("AGEGROUP"),
            Feed::Hospitalizations | Feed::Tests => None,
        }
    }
}

/// A numeric column of one feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Measure {
    Cases,
    Hospitalized,
    Icu,
    NewHospitalizations,
    Deaths,
    Tests,
    PositiveTests,
}

impl Measure {
    pub fn feed(self) -> Feed {
        match self {
            Measure::Cases => Feed::Cases,
            Measure::Hospitalized | Measure::Icu | Measure::NewHospitalizations => Feed::Hospitalizations,
            Measure::Deaths => Feed::Mortality,
            Measure::Tests | Measure::PositiveTests => Feed::Tests,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Measure::Cases => "CASES",
            Measure::Hospitalized => "TOTAL_IN",
            Measure::Icu => "TOTAL_IN_ICU",
            Measure::NewHospitalizations => "NEW_IN",
            Measure::Deaths => "DEATHS",
            Measure::Tests => "TESTS_ALL",
            Measure::PositiveTests => "TESTS_ALL_POS",
        }
    }

    /// Age enumeration for stratified measures.
    pub fn age_groups(self) -> Option<&'static [&'static str]> {
        match self {
            Measure::Cases => Some(AGE_GROUPS_CASES),
            Measure::Deaths => Some(AGE_GROUPS_MORTALITY),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Measure::Cases => "New cases",
            Measure::Hospitalized => "Patients in hospital",
            Measure::Icu => "Patients in ICU",
            Measure::NewHospitalizations => "New hospitalizations",
            Measure::Deaths => "Deaths",
            Measure::Tests => "Tests",
            Measure::PositiveTests => "Positive tests",
        }
    }
}

/// Aggregated series for every loaded measure.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    measures: BTreeMap<Measure, RegionalSeries>,
}

impl Dataset {
    pub fn insert(&mut self, measure: Measure, series: RegionalSeries) {
        self.measures.insert(measure, series);
    }

    pub fn regional(&self, measure: Measure) -> Option<&RegionalSeries> {
        self.measures.get(&measure)
    }

    /// Series of one measure for one region; `None` when either is absent.
    pub fn series(&self, measure: Measure, region: Region) -> Option<&DailySeries> {
        self.regional(measure)?.get(&region)
    }

    pub fn measures(&self) -> impl Iterator<Item = Measure> + '_ {
        self.measures.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.values().all(|regional| regional.values().all(|s| s.is_empty()))
    }
}

/// Where feed payloads come from.
#[derive(Debug, Clone)]
pub enum DataSourceConfig {
    /// Read `<dir>/<feed file name>` from disk.
    Local(PathBuf),
    /// Fetch from the remote base URL, optionally through a file cache.
    Remote {
        base_url: String,
        cache_dir: Option<PathBuf>,
        max_age: Duration,
    },
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags plus environment defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: DataSourceConfig,
    pub region: Region,
    pub all_regions: bool,
    /// The day treated as "now"; every derived date is relative to it.
    pub today: NaiveDate,
    pub population_path: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_total_tracks_its_parts() {
        let mut bucket = AgeGroupBucket::new();
        bucket.add("0-9", 2.0);
        bucket.add("10-19", 3.5);
        bucket.add("0-9", 1.0);
        assert_eq!(bucket.get("0-9"), Some(3.0));
        assert_eq!(bucket.total(), 6.5);

        bucket.set("10-19", 0.5);
        assert_eq!(bucket.total(), 3.5);
    }

    #[test]
    fn bucket_serializes_with_total() {
        let bucket: AgeGroupBucket = [("0-9", 1.0), ("90+", 2.0)].into_iter().collect();
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["0-9"], 1.0);
        assert_eq!(json["90+"], 2.0);
        assert_eq!(json["total"], 3.0);
    }

    #[test]
    fn accumulate_merges_groups() {
        let mut a = DailyValue::Bucket([("0-9", 1.0)].into_iter().collect());
        a.accumulate(&DailyValue::Bucket([("0-9", 2.0), ("10-19", 4.0)].into_iter().collect()));
        a.accumulate(&DailyValue::Scalar(0.5));
        let bucket = a.as_bucket().unwrap();
        assert_eq!(bucket.get("0-9"), Some(3.0));
        assert_eq!(bucket.get("10-19"), Some(4.0));
        assert_eq!(bucket.get(AGE_UNKNOWN), Some(0.5));

        let mut s = DailyValue::Scalar(1.0);
        s.accumulate(&DailyValue::Bucket([("0-9", 2.0)].into_iter().collect()));
        assert_eq!(s, DailyValue::Scalar(3.0));
    }

    #[test]
    fn measures_point_at_their_feed() {
        assert_eq!(Measure::Icu.feed(), Feed::Hospitalizations);
        assert_eq!(Measure::PositiveTests.column(), "TESTS_ALL_POS");
        assert!(Measure::Cases.age_groups().is_some());
        assert!(Measure::Hospitalized.age_groups().is_none());
        assert_eq!(Feed::Mortality.region_key(), None);
    }

    #[test]
    fn dataset_lookups() {
        let mut dataset = Dataset::default();
        assert!(dataset.is_empty());

        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let series: DailySeries = [(date, DailyValue::Scalar(2.0))].into_iter().collect();
        dataset.insert(Measure::Icu, [(Region::Be, series)].into_iter().collect());

        assert!(!dataset.is_empty());
        assert_eq!(dataset.series(Measure::Icu, Region::Be).map(|s| s.len()), Some(1));
        assert!(dataset.series(Measure::Icu, Region::Nam).is_none());
        assert!(dataset.series(Measure::Cases, Region::Be).is_none());
        assert_eq!(dataset.measures().collect::<Vec<_>>(), vec![Measure::Icu]);
    }
}
