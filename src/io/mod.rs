//! Input/output helpers.
//!
//! - feed JSON ingest (`ingest`)
//! - series and summary exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
