//! Formatted terminal output.
//!
//! Formatting lives here so the derivations stay free of presentation and
//! output changes stay local.

use crate::dates::iso_date;
use super::detail::{IncidenceReport, SeriesReport};
use super::summary::Summary;

/// Shown under any projected date.
pub const PROJECTION_DISCLAIMER: &str = "Note: projections are naive estimates of the current rate of growth, \
not predictions. Take them with a healthy dose of skepticism.";

pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str("=== belcovid - Belgian COVID-19 figures ===\n");
    out.push_str(&format!(
        "Today: {} | Last consolidated day: {}\n\n",
        iso_date(summary.today),
        iso_date(summary.reference_day)
    ));

    out.push_str(&header(&[
        ("region", 16),
        ("cases/day", 10),
        ("wow %", 8),
        ("inc 14d", 9),
        ("pos %", 7),
        ("hosp", 7),
        ("icu", 6),
        ("deaths/day", 10),
    ]));

    for r in &summary.regions {
        out.push_str(
            format!(
                "{:<16} {:>10} {:>8} {:>9} {:>7} {:>7} {:>6} {:>10}",
                truncate(r.name, 16),
                fmt_opt(r.cases_week_average, 0),
                fmt_opt(r.cases_week_change, 2),
                fmt_opt(r.incidence, 1),
                fmt_opt(r.positivity_week, 1),
                fmt_opt(r.hospitalized, 0),
                fmt_opt(r.icu, 0),
                fmt_opt(r.deaths_week_average, 1),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    let mut projections = Vec::new();
    for r in &summary.regions {
        if let Some(peak) = r.hospitalized_peak {
            out.push_str(&format!(
                "\n{}: hospitalizations peaked at {:.0} on {}",
                r.name,
                peak.total,
                iso_date(peak.date)
            ));
        }
        if let Some(label) = r.hospitalized_peak_day {
            projections.push(format!("{}: back at the hospitalization peak: {}", r.name, label));
        }
        if let Some(label) = r.hospital_saturation {
            projections.push(format!("Hospital beds saturated: {}", label));
        }
        if let Some(label) = r.icu_saturation {
            projections.push(format!("ICU beds saturated: {}", label));
        }
    }
    if summary.regions.iter().any(|r| r.hospitalized_peak.is_some()) {
        out.push('\n');
    }

    if !projections.is_empty() {
        out.push('\n');
        for line in projections {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(PROJECTION_DISCLAIMER);
        out.push('\n');
    }

    out
}

/// Print the last `rows` days of a derived series (all when `rows == 0`).
pub fn format_series(report: &SeriesReport, rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} - {} (last consolidated day {})\n",
        report.measure.display_name(),
        report.region.display_name(),
        iso_date(report.reference_day)
    ));
    out.push_str(&format!("Week-over-week change: {}\n", fmt_pct(report.week_change)));
    if let Some(peak) = report.peak {
        out.push_str(&format!(
            "Peak (7-day average): {:.1} on {}\n",
            peak.total,
            iso_date(peak.date)
        ));
    }
    out.push('\n');

    out.push_str(&header(&[("date", 10), ("raw", 10), ("average", 10), ("trend", 10), ("wow %", 8)]));
    let skip = if rows == 0 { 0 } else { report.rows.len().saturating_sub(rows) };
    for row in report.rows.iter().skip(skip) {
        let change = report.changes.iter().find(|p| p.x == row.date).map(|p| p.y);
        out.push_str(
            format!(
                "{:<10} {:>10.1} {:>10.1} {:>10} {:>8}",
                iso_date(row.date),
                row.raw,
                row.average,
                fmt_opt(row.trend, 1),
                fmt_opt(change, 2),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_incidence(report: &IncidenceReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}-day incidence per {:.0} - {} on {}\n",
        report.weeks * 7,
        report.denominator,
        report.region.display_name(),
        iso_date(report.date)
    ));
    out.push_str(&header(&[("age group", 12), ("incidence", 10)]));
    for (label, value) in report.groups.iter() {
        out.push_str(&format!("{:<12} {:>10.1}\n", label, value));
    }
    out.push_str(&format!("{:<12} {:>10}\n", "all ages", fmt_opt(report.total, 1)));
    out
}

fn header(columns: &[(&str, usize)]) -> String {
    let mut names = Vec::with_capacity(columns.len());
    let mut rules = Vec::with_capacity(columns.len());
    for (i, &(name, width)) in columns.iter().enumerate() {
        if i == 0 {
            names.push(format!("{name:<width$}"));
        } else {
            names.push(format!("{name:>width$}"));
        }
        rules.push("-".repeat(width));
    }
    format!("{}\n{}\n", names.join(" ").trim_end(), rules.join(" "))
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:+.2}%"),
        None => "N.A.".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
