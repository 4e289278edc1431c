use crate::error::Result;
use crate::models::CaseRow;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Resumen de control de calidad de la tabla final.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcSummary {
    pub registros: usize,
    pub nulls_fecha_corte_final: usize,
    pub errores_tipo: usize,
    pub rango_fechas: (Option<NaiveDate>, Option<NaiveDate>),
}

impl QcSummary {
    pub fn from_rows(rows: &[CaseRow]) -> Self {
        let dates = rows.iter().filter_map(|r| r.derived.fecha_corte_final);
        let (min, max) = dates.fold((None, None), |(min, max): (Option<NaiveDate>, Option<NaiveDate>), d| {
            (
                Some(min.map_or(d, |m| m.min(d))),
                Some(max.map_or(d, |m| m.max(d))),
            )
        });

        Self {
            registros: rows.len(),
            nulls_fecha_corte_final: rows
                .iter()
                .filter(|r| r.derived.fecha_corte_final.is_none())
                .count(),
            errores_tipo: rows.iter().filter(|r| r.derived.datos_invalidos).count(),
            rango_fechas: (min, max),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn print_report(&self) {
        let fmt_date = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };

        println!();
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║  🔎 QC - Casos Fiscales                                      ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!("📊 Registros:                 {}", self.registros);
        println!("📅 Sin fecha_corte_final:     {}", self.nulls_fecha_corte_final);
        println!("⚠️  Datos inválidos:           {}", self.errores_tipo);
        println!(
            "🗓️  Rango de fechas:           {} → {}",
            fmt_date(self.rango_fechas.0),
            fmt_date(self.rango_fechas.1)
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseRecord, DerivedFields};

    fn row(fecha: Option<NaiveDate>, invalid: bool) -> CaseRow {
        CaseRow {
            case: CaseRecord::default(),
            derived: DerivedFields {
                fecha_corte_final: fecha,
                tasa_atencion: None,
                backlog: 0,
                datos_invalidos: invalid,
                es_especializado: false,
                anio_mes_key: None,
            },
        }
    }

    #[test]
    fn counts_nulls_invalid_rows_and_date_range() {
        let rows = vec![
            row(NaiveDate::from_ymd_opt(2021, 5, 10), false),
            row(None, true),
            row(NaiveDate::from_ymd_opt(2019, 1, 1), true),
            row(NaiveDate::from_ymd_opt(2023, 7, 1), false),
        ];
        let qc = QcSummary::from_rows(&rows);

        assert_eq!(qc.registros, 4);
        assert_eq!(qc.nulls_fecha_corte_final, 1);
        assert_eq!(qc.errores_tipo, 2);
        assert_eq!(
            qc.rango_fechas,
            (NaiveDate::from_ymd_opt(2019, 1, 1), NaiveDate::from_ymd_opt(2023, 7, 1))
        );
    }

    #[test]
    fn empty_table_has_no_range() {
        let qc = QcSummary::from_rows(&[]);
        assert_eq!(qc.registros, 0);
        assert_eq!(qc.rango_fechas, (None, None));
    }

    #[test]
    fn json_uses_report_keys() {
        let qc = QcSummary::from_rows(&[row(NaiveDate::from_ymd_opt(2021, 5, 10), true)]);
        let value: serde_json::Value = serde_json::from_str(&qc.to_json().unwrap()).unwrap();

        assert_eq!(value["registros"], 1);
        assert_eq!(value["nulls_fecha_corte_final"], 0);
        assert_eq!(value["errores_tipo"], 1);
        assert_eq!(value["rango_fechas"][0], "2021-05-10");
        assert_eq!(value["rango_fechas"][1], "2021-05-10");
    }
}
