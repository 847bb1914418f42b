//! Static reference data: regions, age groups and care capacity.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Label of the bucket that collects records without a recognized age group.
pub const AGE_UNKNOWN: &str = "Age unknown";

/// Age groups used by the case (and incidence) feeds.
pub const AGE_GROUPS_CASES: &[&str] = &[
    "0-9",
    "10-19",
    "20-29",
    "30-39",
    "40-49",
    "50-59",
    "60-69",
    "70-79",
    "80-89",
    "90+",
    AGE_UNKNOWN,
];

/// Age groups used by the mortality feed.
pub const AGE_GROUPS_MORTALITY: &[&str] = &["0-24", "25-44", "45-64", "65-74", "75-84", "85+", AGE_UNKNOWN];

/// A reporting subdivision, or the national aggregate (`Be`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Be,
    Ant,
    Ovl,
    Vbr,
    Lim,
    Wvl,
    Hnt,
    Lge,
    Lux,
    Nam,
    Brw,
    Bxl,
}

impl Region {
    pub const ALL: [Region; 12] = [
        Region::Be,
        Region::Ant,
        Region::Ovl,
        Region::Vbr,
        Region::Lim,
        Region::Wvl,
        Region::Hnt,
        Region::Lge,
        Region::Lux,
        Region::Nam,
        Region::Brw,
        Region::Bxl,
    ];

    pub const PROVINCES: [Region; 11] = [
        Region::Ant,
        Region::Ovl,
        Region::Vbr,
        Region::Lim,
        Region::Wvl,
        Region::Hnt,
        Region::Lge,
        Region::Lux,
        Region::Nam,
        Region::Brw,
        Region::Bxl,
    ];

    pub fn is_national(self) -> bool {
        self == Region::Be
    }

    /// Short key used on the command line and in population files.
    pub fn key(self) -> &'static str {
        match self {
            Region::Be => "be",
            Region::Ant => "ant",
            Region::Ovl => "ovl",
            Region::Vbr => "vbr",
            Region::Lim => "lim",
            Region::Wvl => "wvl",
            Region::Hnt => "hnt",
            Region::Lge => "lge",
            Region::Lux => "lux",
            Region::Nam => "nam",
            Region::Brw => "brw",
            Region::Bxl => "bxl",
        }
    }

    /// Spelling used by the Sciensano `PROVINCE` column.
    pub fn feed_name(self) -> &'static str {
        match self {
            Region::Be => "Belgium",
            Region::Ant => "Antwerpen",
            Region::Ovl => "OostVlaanderen",
            Region::Vbr => "VlaamsBrabant",
            Region::Lim => "Limburg",
            Region::Wvl => "WestVlaanderen",
            Region::Hnt => "Hainaut",
            Region::Lge => "Liège",
            Region::Lux => "Luxembourg",
            Region::Nam => "Namur",
            Region::Brw => "BrabantWallon",
            Region::Bxl => "Brussels",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Region::Be => "Belgium",
            Region::Ant => "Antwerpen",
            Region::Ovl => "Oost Vlaanderen",
            Region::Vbr => "Vlaams Brabant",
            Region::Lim => "Limburg",
            Region::Wvl => "West Vlaanderen",
            Region::Hnt => "Hainaut",
            Region::Lge => "Liège",
            Region::Lux => "Luxembourg",
            Region::Nam => "Namur",
            Region::Brw => "Brabant Wallon",
            Region::Bxl => "Brussels",
        }
    }

    /// Look a region up by short key or feed spelling (case-insensitive).
    pub fn parse(raw: &str) -> Option<Region> {
        let raw = raw.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.key().eq_ignore_ascii_case(raw) || r.feed_name().to_lowercase() == raw.to_lowercase())
    }

    /// Region a feed record belongs to; anything unrecognized counts as national only.
    pub fn resolve(raw: Option<&str>) -> Region {
        raw.and_then(Region::parse).unwrap_or(Region::Be)
    }
}

/// Finite care capacity a growing occupancy series can saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capacity {
    HospitalBeds,
    IcuBeds,
}

impl Capacity {
    /// Total number of beds nationally.
    pub fn beds(self) -> f64 {
        match self {
            Capacity::HospitalBeds => 61_600.0,
            Capacity::IcuBeds => 2_650.0,
        }
    }
}

/// Resolve a feed age label against a fixed enumeration.
pub fn resolve_age_group(raw: Option<&str>, groups: &[&'static str]) -> &'static str {
    let Some(raw) = raw.map(str::trim) else {
        return AGE_UNKNOWN;
    };
    groups.iter().copied().find(|g| *g == raw).unwrap_or(AGE_UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parse_accepts_keys_and_feed_names() {
        assert_eq!(Region::parse("ovl"), Some(Region::Ovl));
        assert_eq!(Region::parse("OostVlaanderen"), Some(Region::Ovl));
        assert_eq!(Region::parse("liège"), Some(Region::Lge));
        assert_eq!(Region::parse("BXL"), Some(Region::Bxl));
        assert_eq!(Region::parse("Flanders"), None);
    }

    #[test]
    fn region_resolve_falls_back_to_national() {
        assert_eq!(Region::resolve(None), Region::Be);
        assert_eq!(Region::resolve(Some("Atlantis")), Region::Be);
        assert_eq!(Region::resolve(Some("Namur")), Region::Nam);
    }

    #[test]
    fn provinces_exclude_the_national_region() {
        assert!(Region::PROVINCES.iter().all(|r| !r.is_national()));
        assert_eq!(Region::PROVINCES.len() + 1, Region::ALL.len());
    }

    #[test]
    fn age_groups_resolve_to_unknown_bucket() {
        assert_eq!(resolve_age_group(Some("20-29"), AGE_GROUPS_CASES), "20-29");
        assert_eq!(resolve_age_group(Some("25-44"), AGE_GROUPS_CASES), AGE_UNKNOWN);
        assert_eq!(resolve_age_group(None, AGE_GROUPS_MORTALITY), AGE_UNKNOWN);
    }
}
