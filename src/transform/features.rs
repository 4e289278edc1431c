use crate::models::{CaseRecord, DerivedFields};
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Meses en español -> número. Se buscan como subcadena, en este orden.
    static ref MONTH_MAP: Vec<(&'static str, u32)> = vec![
        ("enero", 1),
        ("febrero", 2),
        ("marzo", 3),
        ("abril", 4),
        ("mayo", 5),
        ("junio", 6),
        ("julio", 7),
        ("agosto", 8),
        ("setiembre", 9),
        ("septiembre", 9),
        ("octubre", 10),
        ("noviembre", 11),
        ("diciembre", 12),
    ];

    /// Valores de `especializada` que significan "no especializado".
    static ref NEGATIVE_SPECIALIZATION: HashSet<&'static str> = [
        "",
        "no",
        "0",
        "false",
        "f",
        "n",
        "sin",
        "ninguno",
        "no especializada",
        "no-especializada",
    ]
    .into_iter()
    .collect();

    static ref PERIOD_SEPARATORS: Regex = Regex::new(r"[-_ ]").unwrap();
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn month_in_range(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|m| (1..=12).contains(m))
}

/// Infers a month number (1-12) from a free-form period label.
pub fn month_from_periodo(periodo: Option<&str>) -> Option<u32> {
    let s = periodo?.trim().to_lowercase();

    if is_digits(&s) {
        return month_in_range(&s);
    }

    if let Some((_, month)) = MONTH_MAP.iter().find(|(name, _)| s.contains(name)) {
        return Some(*month);
    }

    PERIOD_SEPARATORS
        .split(&s)
        .filter(|t| is_digits(t))
        .find_map(month_in_range)
}

/// Canonical reporting date: cutoff, then download date, then day 1 of
/// year + inferred month, then December 31 of the year.
pub fn derive_fecha_corte_final(case: &CaseRecord) -> Option<NaiveDate> {
    if let Some(date) = case.fecha_corte {
        return Some(date);
    }
    if let Some(date) = case.fecha_descarga {
        return Some(date);
    }
    let anio = case.anio?;
    month_from_periodo(case.periodo.as_deref())
        .and_then(|month| NaiveDate::from_ymd_opt(anio, month, 1))
        .or_else(|| NaiveDate::from_ymd_opt(anio, 12, 31))
}

pub fn tasa_atencion(ingresado: i64, atendido: i64) -> Option<f64> {
    if ingresado > 0 {
        Some(atendido as f64 / ingresado as f64)
    } else {
        None
    }
}

/// Unknown labels count as specialized; only the listed negatives do not.
pub fn es_especializado(especializada: Option<&str>) -> bool {
    let normalized = especializada.unwrap_or("").trim().to_lowercase();
    !NEGATIVE_SPECIALIZATION.contains(normalized.as_str())
}

/// YYYYMM key; falls back to the raw year with month 1.
pub fn anio_mes_key(fecha_corte_final: Option<NaiveDate>, anio: Option<i32>) -> Option<i32> {
    match fecha_corte_final {
        Some(date) => Some(date.year() * 100 + date.month() as i32),
        None => {
            let year = anio?;
            NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.year() * 100 + 1)
        }
    }
}

/// Computes every derived field. Pure; the record is left untouched.
pub fn derive(case: &CaseRecord) -> DerivedFields {
    let fecha_corte_final = derive_fecha_corte_final(case);

    DerivedFields {
        fecha_corte_final,
        tasa_atencion: tasa_atencion(case.ingresado, case.atendido),
        backlog: case.ingresado - case.atendido,
        datos_invalidos: case.atendido > case.ingresado,
        es_especializado: es_especializado(case.especializada.as_deref()),
        anio_mes_key: anio_mes_key(fecha_corte_final, case.anio),
    }
}
