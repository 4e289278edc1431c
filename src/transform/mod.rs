//! Record-level normalization: header reconciliation, type coercion and
//! KPI derivation. Each input file is processed independently.

pub mod date_ops;
pub mod features;
pub mod header_ops;
pub mod normalize;

use crate::error::Result;
use crate::models::CaseRow;
use csv::ReaderBuilder;
use header_ops::HeaderMapping;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Tabla normalizada de un archivo de entrada.
#[derive(Debug, Clone)]
pub struct FileBatch {
    pub fuente: String,
    pub mapping: HeaderMapping,
    pub rows: Vec<CaseRow>,
}

/// Runs reconciliation → normalization → derivation over one CSV stream.
/// Only reader-level failures (I/O) are returned; bad cells degrade.
pub fn process_reader<R: Read>(reader: R, fuente: &str) -> Result<FileBatch> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    let mapping = HeaderMapping::from_headers(&headers);

    if !mapping.dropped().is_empty() {
        debug!(fuente = %fuente, dropped = ?mapping.dropped(), "columnas no reconocidas");
    }
    let missing = mapping.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        debug!(fuente = %fuente, missing = ?names, "columnas ausentes, se rellenan con nulos");
    }

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        let raw = mapping.reconcile(
            record
                .iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned()),
        );
        let case = normalize::normalize_case(&raw, fuente);
        let derived = features::derive(&case);
        rows.push(CaseRow { case, derived });
    }

    Ok(FileBatch {
        fuente: fuente.to_string(),
        mapping,
        rows,
    })
}

/// Processes one file; `fuente` is the file name.
pub fn process_file(path: &Path) -> Result<FileBatch> {
    let fuente = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = std::fs::File::open(path)?;
    process_reader(file, &fuente)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn processes_a_mixed_extract() {
        let data = "\
PERIODO,Anio,Distrito Fiscal,ingresado,atendido,Especializada,fecha_corte,otra
Marzo,2022,LIMA NORTE,10,4,Penal,,x
13,2020,callao,abc,5,No,15/08/2020,y
";
        let batch = process_reader(data.as_bytes(), "casos_2022.csv").unwrap();
        assert_eq!(batch.fuente, "casos_2022.csv");
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.mapping.dropped(), &["otra".to_string()]);

        let first = &batch.rows[0];
        assert_eq!(first.case.distrito_fiscal.as_deref(), Some("Lima Norte"));
        assert_eq!(first.derived.fecha_corte_final, NaiveDate::from_ymd_opt(2022, 3, 1));
        assert_eq!(first.derived.tasa_atencion, Some(0.4));
        assert!(first.derived.es_especializado);
        assert_eq!(first.derived.anio_mes_key, Some(202203));

        let second = &batch.rows[1];
        assert_eq!(second.case.ingresado, 0);
        assert_eq!(second.derived.tasa_atencion, None);
        assert_eq!(second.derived.backlog, -5);
        assert!(second.derived.datos_invalidos);
        assert!(!second.derived.es_especializado);
        assert_eq!(second.derived.fecha_corte_final, NaiveDate::from_ymd_opt(2020, 8, 15));
        assert_eq!(second.case.fuente, "casos_2022.csv");
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let batch = process_reader("periodo,anio\n".as_bytes(), "vacio.csv").unwrap();
        assert!(batch.rows.is_empty());
    }

    #[test]
    fn ragged_rows_do_not_abort_the_batch() {
        let data = "anio,ingresado,atendido\n2021,5\n2021,5,3,extra\n";
        let batch = process_reader(data.as_bytes(), "ragged.csv").unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].case.atendido, 0);
        assert_eq!(batch.rows[1].case.atendido, 3);
    }
}
