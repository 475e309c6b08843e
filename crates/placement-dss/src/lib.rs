//! Decision support engine for the internship placement platform.
//!
//! The `matching` module holds the scoring core: a registry of pure criteria, weight
//! normalization, the scoring engine, and the ranking service. The remaining modules carry
//! the configuration, telemetry, and error plumbing shared with the API host.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
