//! Normalizes heterogeneous prosecutorial-case CSV extracts into one table
//! with derived KPIs, persisted as CSV and as an indexed SQLite table.

pub mod commands;
pub mod config;
pub mod error;
pub mod file_utils;
pub mod logging;
pub mod models;
pub mod output;
pub mod progress;
pub mod transform;

pub use config::EtlConfig;
pub use error::{EtlError, Result};
