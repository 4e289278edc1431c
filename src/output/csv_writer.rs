use crate::error::Result;
use crate::models::{CaseRow, OUTPUT_COLUMNS};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

/// Escribe la tabla final con cabecera; los nulos quedan como celdas vacías.
pub fn write_rows<W: Write>(writer: W, rows: &[CaseRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    wtr.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        wtr.write_record(row.to_fields())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, rows: &[CaseRow]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_rows(std::io::BufWriter::new(file), rows)
}
