use crate::error::{EtlError, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const CSV_FILE_NAME: &str = "casos_fiscales_2019_2023.csv";
pub const DB_FILE_NAME: &str = "casos_fiscales.sqlite";
pub const QC_FILE_NAME: &str = "qc_summary.json";
pub const DEFAULT_TABLE: &str = "casos_fiscales";

/// Rutas y nombres usados por el pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EtlConfig {
    pub raw_dir: PathBuf,
    pub out_dir: PathBuf,
    pub db_dir: PathBuf,
    pub table: String,
}

impl EtlConfig {
    /// Layout por defecto bajo `base`: data/raw, data/processed, db.
    pub fn with_base_dir<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            raw_dir: base.join("data").join("raw"),
            out_dir: base.join("data").join("processed"),
            db_dir: base.join("db"),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Resolves the layout from `CASOS_BASE_DIR` (default: current dir) and
    /// applies the per-directory and table overrides.
    pub fn from_env() -> Result<Self> {
        let base = match env::var_os("CASOS_BASE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()?,
        };
        let mut config = Self::with_base_dir(base);

        if let Some(dir) = env::var_os("CASOS_RAW_DIR") {
            config.raw_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os("CASOS_OUT_DIR") {
            config.out_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os("CASOS_DB_DIR") {
            config.db_dir = PathBuf::from(dir);
        }
        if let Ok(table) = env::var("CASOS_TABLE") {
            config.table = table;
        }

        config.validate()?;
        Ok(config)
    }

    /// The table name is interpolated into DDL, so only plain identifiers pass.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.table.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(EtlError::Config(format!(
                "Invalid table name '{}': expected [A-Za-z_][A-Za-z0-9_]*",
                self.table
            )));
        }
        Ok(())
    }

    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(CSV_FILE_NAME)
    }

    pub fn qc_path(&self) -> PathBuf {
        self.out_dir.join(QC_FILE_NAME)
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(DB_FILE_NAME)
    }
}
