//! Request handlers for the Court Finder API Lambdas.
//!
//! Each module backs one binary under `src/bin`.

pub mod ai;
pub mod availability;
