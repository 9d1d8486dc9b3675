//! CLI command implementations.

pub mod coefficients;
pub mod devices;
pub mod run;
