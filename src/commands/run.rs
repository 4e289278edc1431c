use crate::config::EtlConfig;
use crate::error::Result;
use crate::file_utils::{discover_input_files, ensure_directory_exists, format_bytes, get_file_size};
use crate::models::CaseRow;
use crate::output::{csv_writer, sqlite, QcSummary};
use crate::progress::ProgressTracker;
use crate::transform;
use tracing::info;

/// Ejecuta el ETL completo: descubre, normaliza, concatena y persiste.
pub fn run(config: &EtlConfig) -> Result<QcSummary> {
    config.validate()?;
    for dir in [&config.out_dir, &config.db_dir] {
        ensure_directory_exists(dir)?;
    }

    let files = discover_input_files(&config.raw_dir)?;
    info!("{} CSV encontrados en {}", files.len(), config.raw_dir.display());

    let mut progress = ProgressTracker::new();
    let mut rows: Vec<CaseRow> = Vec::new();

    for path in &files {
        let size = get_file_size(path).map(format_bytes).unwrap_or_default();
        info!("📥 Procesando {} ({})", path.display(), size);

        let batch = transform::process_file(path)?;
        progress.record_file(&batch.fuente, batch.rows.len());
        rows.extend(batch.rows);
    }
    progress.finish();

    let csv_path = config.csv_path();
    csv_writer::save_csv(&csv_path, &rows)?;
    info!("✅ CSV limpio → {}", csv_path.display());

    let db_path = config.db_path();
    sqlite::save_sqlite(&db_path, &config.table, &rows)?;
    info!("✅ SQLite → {} (tabla {})", db_path.display(), config.table);

    let qc = QcSummary::from_rows(&rows);
    let qc_path = config.qc_path();
    qc.save_json(&qc_path)?;
    info!("✅ QC → {}", qc_path.display());

    Ok(qc)
}
