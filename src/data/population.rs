//! Population by region and age group.
//!
//! Loaded once from a CSV with columns `region,age_group,population`, where
//! `region` is a short key (`be`, `ant`, ...). When the file has no national
//! rows they are derived by summing the provinces.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::domain::Region;
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationReference {
    regions: BTreeMap<Region, BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct PopulationRow {
    region: String,
    age_group: String,
    population: f64,
}

impl PopulationReference {
    /// Build from `(region, age group, population)` rows. Repeated rows add up.
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = (Region, S, f64)>) -> Self {
        let mut regions: BTreeMap<Region, BTreeMap<String, f64>> = BTreeMap::new();
        for (region, label, population) in rows {
            *regions.entry(region).or_default().entry(label.into()).or_insert(0.0) += population;
        }

        if !regions.contains_key(&Region::Be) {
            let mut national: BTreeMap<String, f64> = BTreeMap::new();
            for groups in regions.values() {
                for (label, population) in groups {
                    *national.entry(label.clone()).or_insert(0.0) += population;
                }
            }
            if !national.is_empty() {
                regions.insert(Region::Be, national);
            }
        }

        Self { regions }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut rows = Vec::new();
        for (idx, result) in reader.deserialize::<PopulationRow>().enumerate() {
            let line = idx + 2;
            let row = result.map_err(|e| AppError::invalid_input(format!("Population CSV line {line}: {e}")))?;
            let region = Region::parse(&row.region).ok_or_else(|| {
                AppError::invalid_input(format!("Population CSV line {line}: unknown region '{}'.", row.region))
            })?;
            if !(row.population.is_finite() && row.population >= 0.0) {
                return Err(AppError::invalid_input(
                    format!("Population CSV line {line}: invalid population {}.", row.population),
                ));
            }
            rows.push((region, row.age_group, row.population));
        }

        if rows.is_empty() {
            return Err(AppError::invalid_input("Population CSV has no rows."));
        }
        Ok(Self::from_rows(rows))
    }

    pub fn from_csv(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::invalid_input(format!("Failed to open population CSV '{}': {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn contains(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    pub fn get(&self, region: Region, label: &str) -> Option<f64> {
        self.regions.get(&region)?.get(label).copied()
    }

    pub fn groups(&self, region: Region) -> Option<&BTreeMap<String, f64>> {
        self.regions.get(&region)
    }

    /// Sum over every age group of the region.
    pub fn total(&self, region: Region) -> Option<f64> {
        self.groups(region).map(|groups| groups.values().sum())
    }
}
