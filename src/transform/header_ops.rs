use crate::models::{CanonicalField, RawCase, COLUMN_MAP};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Normaliza un nombre de columna para buscarlo en `COLUMN_MAP`.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    WHITESPACE_RUN.replace_all(trimmed, " ").to_lowercase()
}

/// Resolved positions of each canonical field inside one file's header row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMapping {
    positions: [Option<usize>; CanonicalField::COUNT],
    dropped: Vec<String>,
}

impl HeaderMapping {
    /// First occurrence wins when two raw columns map to the same field;
    /// later duplicates are reported as dropped.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = [None; CanonicalField::COUNT];
        let mut dropped = Vec::new();

        for (idx, raw) in headers.into_iter().enumerate() {
            let raw = raw.as_ref();
            match COLUMN_MAP.get(normalize_header(raw).as_str()) {
                Some(field) if positions[field.index()].is_none() => {
                    positions[field.index()] = Some(idx);
                }
                _ => dropped.push(raw.to_string()),
            }
        }

        Self { positions, dropped }
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.positions[field.index()]
    }

    pub fn recognized(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(|f| self.position(*f).is_some())
            .collect()
    }

    pub fn missing(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(|f| self.position(*f).is_none())
            .collect()
    }

    /// Raw column names that did not map to any canonical field.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Builds the canonical row. Missing columns and short rows yield nulls.
    pub fn reconcile<I, S>(&self, row: I) -> RawCase
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = row.into_iter().map(Into::into).collect();
        let mut case = RawCase::default();
        for field in CanonicalField::ALL {
            let value = self.position(field).and_then(|idx| cells.get(idx).cloned());
            case.set(field, value);
        }
        case
    }
}
