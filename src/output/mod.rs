pub mod csv_writer;
pub mod qc;
pub mod sqlite;

pub use qc::QcSummary;
