//! Core of the sentiment ETL pipeline.
//!
//! Holds the domain model, the ports the adapters implement, and the pure
//! transform/metrics/layout logic. Adapters in `adapters/` do all the I/O.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod ports;
pub mod transform;
pub mod utils;
