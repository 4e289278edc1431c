use crate::models::{CanonicalField, CaseRecord, RawCase};
use crate::transform::date_ops::parse_date_safe;

/// Valores de texto que equivalen a nulo (comparación en minúsculas).
const NULL_TEXT_TOKENS: [&str; 3] = ["nan", "none", "null"];

/// Parses a case count. Anything non-numeric, non-finite or negative is 0;
/// fractional values are truncated.
pub fn parse_count(value: Option<&str>) -> i64 {
    let s = match value {
        Some(s) => s.trim(),
        None => return 0,
    };
    if let Ok(n) = s.parse::<i64>() {
        return n.max(0);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as i64,
        _ => 0,
    }
}

/// Parses the reporting year; non-numeric or fractional values are null.
pub fn parse_year(value: Option<&str>) -> Option<i32> {
    let s = value?.trim();
    if let Ok(n) = s.parse::<i32>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

/// Pone en mayúscula la primera letra de cada palabra y el resto en minúscula.
/// A word starts at every letter that does not follow another letter.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Trims, maps the null tokens to `None` and title-cases the rest.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    let s = value?.trim();
    let lowered = s.to_lowercase();
    if s.is_empty() || NULL_TEXT_TOKENS.iter().any(|t| *t == lowered) {
        return None;
    }
    Some(title_case(s))
}

/// Coerces a reconciled row to semantic types. Never fails.
pub fn normalize_case(raw: &RawCase, fuente: &str) -> CaseRecord {
    let text = |field: CanonicalField| normalize_text(raw.get(field));

    CaseRecord {
        periodo: text(CanonicalField::Periodo),
        anio: parse_year(raw.get(CanonicalField::Anio)),
        fecha_descarga: parse_date_safe(raw.get(CanonicalField::FechaDescarga)),
        distrito_fiscal: text(CanonicalField::DistritoFiscal),
        tipo_fiscalia: text(CanonicalField::TipoFiscalia),
        materia: text(CanonicalField::Materia),
        especialidad: text(CanonicalField::Especialidad),
        tipo_caso: text(CanonicalField::TipoCaso),
        especializada: text(CanonicalField::Especializada),
        ingresado: parse_count(raw.get(CanonicalField::Ingresado)),
        atendido: parse_count(raw.get(CanonicalField::Atendido)),
        ubigeo_pjfs: text(CanonicalField::UbigeoPjfs),
        dpto_pjfs: text(CanonicalField::DptoPjfs),
        prov_pjfs: text(CanonicalField::ProvPjfs),
        dist_pjfs: text(CanonicalField::DistPjfs),
        fecha_corte: parse_date_safe(raw.get(CanonicalField::FechaCorte)),
        fuente: fuente.to_string(),
    }
}
