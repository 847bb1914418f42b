//! Mathematical utilities: least squares and polynomial trend fitting.

pub mod ols;
pub mod poly;

pub use ols::*;
pub use poly::*;
