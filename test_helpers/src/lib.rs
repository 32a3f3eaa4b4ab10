//! Test helpers shared across crates.
//!
//! This crate provides a `figment::Jail` wrapper and JSON fixture helpers for
//! building configuration mappings.

pub mod config;
pub mod figment;
