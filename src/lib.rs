//! `belcovid-stats` library crate.
//!
//! The binary (`belcovid`) is a thin wrapper around this library so that:
//!
//! - the series derivations are testable without spawning processes
//! - the core (`dates`, `series`, `math`) stays free of I/O and clocks
//! - presentation stays in `report` and `cli`

pub mod app;
pub mod cli;
pub mod data;
pub mod dates;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
pub mod series;
