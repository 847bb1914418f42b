//! Data acquisition: upstream feeds, the on-disk cache and population tables.

pub mod cache;
pub mod fetch;
pub mod population;
pub mod source;

pub use cache::*;
pub use fetch::*;
pub use population::*;
pub use source::*;
