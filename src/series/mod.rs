//! Time-series derivations.
//!
//! Every function here borrows its input and returns a fresh value. Nothing
//! reads the clock, touches the network or logs: reference days are passed in.

pub mod aggregate;
pub mod incidence;
pub mod peak;
pub mod positivity;
pub mod projection;
pub mod rolling;

pub use aggregate::*;
pub use incidence::*;
pub use peak::*;
pub use positivity::*;
pub use projection::*;
pub use rolling::*;
