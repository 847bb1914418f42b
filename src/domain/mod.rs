//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - static reference data (`Region`, age-group enumerations, `Capacity`)
//! - raw feed records and derived series (`RawRecord`, `DailySeries`, `Point`, ...)
//! - feed/measure descriptors and the run configuration

pub mod reference;
pub mod types;

pub use reference::*;
pub use types::*;
