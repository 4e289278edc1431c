use crate::error::Result;
use crate::models::{CaseRow, OUTPUT_COLUMNS};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

/// Tipos SQLite, alineados con `OUTPUT_COLUMNS`.
const COLUMN_TYPES: [&str; 23] = [
    "TEXT",    // periodo
    "INTEGER", // anio
    "TEXT",    // fecha_descarga
    "TEXT",    // distrito_fiscal
    "TEXT",    // tipo_fiscalia
    "TEXT",    // materia
    "TEXT",    // especialidad
    "TEXT",    // tipo_caso
    "TEXT",    // especializada
    "INTEGER", // ingresado
    "INTEGER", // atendido
    "TEXT",    // ubigeo_pjfs
    "TEXT",    // dpto_pjfs
    "TEXT",    // prov_pjfs
    "TEXT",    // dist_pjfs
    "TEXT",    // fecha_corte
    "TEXT",    // fecha_corte_final
    "REAL",    // tasa_atencion
    "INTEGER", // backlog
    "INTEGER", // datos_invalidos
    "INTEGER", // es_especializado
    "INTEGER", // anio_mes_key
    "TEXT",    // fuente
];

/// (index name, column)
const INDEXES: [(&str, &str); 4] = [
    ("idx_anio", "anio"),
    ("idx_distrito", "distrito_fiscal"),
    ("idx_materia", "materia"),
    ("idx_meskey", "anio_mes_key"),
];

fn text(value: &Option<String>) -> Value {
    value.clone().map(Value::Text).unwrap_or(Value::Null)
}

fn date(value: &Option<chrono::NaiveDate>) -> Value {
    value
        .map(|d| Value::Text(d.format("%Y-%m-%d").to_string()))
        .unwrap_or(Value::Null)
}

fn row_values(row: &CaseRow) -> [Value; 23] {
    let c = &row.case;
    let d = &row.derived;
    [
        text(&c.periodo),
        c.anio.map(|y| Value::Integer(y as i64)).unwrap_or(Value::Null),
        date(&c.fecha_descarga),
        text(&c.distrito_fiscal),
        text(&c.tipo_fiscalia),
        text(&c.materia),
        text(&c.especialidad),
        text(&c.tipo_caso),
        text(&c.especializada),
        Value::Integer(c.ingresado),
        Value::Integer(c.atendido),
        text(&c.ubigeo_pjfs),
        text(&c.dpto_pjfs),
        text(&c.prov_pjfs),
        text(&c.dist_pjfs),
        date(&c.fecha_corte),
        date(&d.fecha_corte_final),
        d.tasa_atencion.map(Value::Real).unwrap_or(Value::Null),
        Value::Integer(d.backlog),
        Value::Integer(d.datos_invalidos as i64),
        Value::Integer(d.es_especializado as i64),
        d.anio_mes_key.map(|k| Value::Integer(k as i64)).unwrap_or(Value::Null),
        Value::Text(c.fuente.clone()),
    ]
}

/// Replaces `table` with `rows` and rebuilds its indexes. `table` must be a
/// validated identifier (see `EtlConfig::validate`).
pub fn write_table(conn: &mut Connection, table: &str, rows: &[CaseRow]) -> Result<usize> {
    let columns: Vec<String> = OUTPUT_COLUMNS
        .iter()
        .zip(COLUMN_TYPES.iter())
        .map(|(name, ty)| format!("{} {}", name, ty))
        .collect();
    let placeholders: Vec<String> = (1..=OUTPUT_COLUMNS.len()).map(|i| format!("?{}", i)).collect();

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({});",
        columns.join(", ")
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            OUTPUT_COLUMNS.join(", "),
            placeholders.join(", ")
        ))?;
        for row in rows {
            stmt.execute(params_from_iter(row_values(row)))?;
        }
    }

    for (index, column) in INDEXES {
        tx.execute(
            &format!("CREATE INDEX IF NOT EXISTS {index} ON {table}({column})"),
            [],
        )?;
    }
    tx.commit()?;

    debug!(table = %table, rows = rows.len(), "tabla SQLite reemplazada");
    Ok(rows.len())
}

pub fn save_sqlite(path: &Path, table: &str, rows: &[CaseRow]) -> Result<usize> {
    let mut conn = Connection::open(path)?;
    write_table(&mut conn, table, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseRecord, DerivedFields};

    fn sample(fuente: &str, anio: Option<i32>) -> CaseRow {
        CaseRow {
            case: CaseRecord {
                anio,
                materia: Some("Penal".into()),
                ingresado: 10,
                atendido: 4,
                fuente: fuente.into(),
                ..Default::default()
            },
            derived: DerivedFields {
                fecha_corte_final: anio.and_then(|y| chrono::NaiveDate::from_ymd_opt(y, 12, 31)),
                tasa_atencion: Some(0.4),
                backlog: 6,
                datos_invalidos: false,
                es_especializado: true,
                anio_mes_key: anio.map(|y| y * 100 + 12),
            },
        }
    }

    #[test]
    fn column_types_cover_every_output_column() {
        assert_eq!(COLUMN_TYPES.len(), OUTPUT_COLUMNS.len());
        assert_eq!(row_values(&sample("a.csv", None)).len(), OUTPUT_COLUMNS.len());
    }

    #[test]
    fn replaces_previous_table_and_creates_indexes() {
        let mut conn = Connection::open_in_memory().unwrap();
        write_table(&mut conn, "casos_fiscales", &[sample("viejo.csv", Some(2019))]).unwrap();
        let written = write_table(
            &mut conn,
            "casos_fiscales",
            &[sample("a.csv", Some(2021)), sample("b.csv", None)],
        )
        .unwrap();
        assert_eq!(written, 2);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM casos_fiscales", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);

        let (fecha, tasa, key): (Option<String>, f64, Option<i64>) = conn
            .query_row(
                "SELECT fecha_corte_final, tasa_atencion, anio_mes_key FROM casos_fiscales WHERE fuente = 'a.csv'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(fecha.as_deref(), Some("2021-12-31"));
        assert_eq!(tasa, 0.4);
        assert_eq!(key, Some(202112));

        let anio: Option<i64> = conn
            .query_row("SELECT anio FROM casos_fiscales WHERE fuente = 'b.csv'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(anio, None);

        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'casos_fiscales' ORDER BY name")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(names, vec!["idx_anio", "idx_distrito", "idx_materia", "idx_meskey"]);
    }
}
