//! Reporting: headline summaries, per-measure views and terminal formatting.

pub mod detail;
pub mod format;
pub mod summary;

pub use detail::*;
pub use format::*;
pub use summary::*;
