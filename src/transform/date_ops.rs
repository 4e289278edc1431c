use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

/// Tokens que se tratan como fecha nula (comparación en minúsculas).
const NULL_DATE_TOKENS: [&str; 4] = ["nan", "none", "nul", "null"];

lazy_static! {
    /// Explicit formats in priority order. Each shape regex guards its format
    /// so that only 4-digit years match (chrono's %Y alone would accept "21").
    static ref EXPLICIT_FORMATS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(), "%d/%m/%Y"),
        (Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(), "%Y-%m-%d"),
        (Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap(), "%d-%m-%Y"),
        (Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(), "%m/%d/%Y"),
    ];

    /// Trailing time of day, with optional seconds, meridiem and offset.
    static ref TIME_SUFFIX: Regex = Regex::new(
        r"(?i)^(?P<date>.+?)[ T]+\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?\s*(?:[ap]\.?m\.?)?\s*(?:z|utc|[+-]\d{2}:?\d{2})?$"
    ).unwrap();

    static ref NUMERIC_DATE: Regex =
        Regex::new(r"^(\d{1,4})[/.\- ](\d{1,2})[/.\- ](\d{1,4})$").unwrap();

    static ref COMPACT_DATE: Regex = Regex::new(r"^\d{8}$").unwrap();

    static ref WORD_SEPARATORS: Regex = Regex::new(r"[\s,./\-]+").unwrap();

    /// Month names for the fallback parser: Spanish and English, full and abbreviated.
    static ref MONTH_WORDS: Vec<(&'static str, u32)> = vec![
        ("enero", 1), ("ene", 1), ("january", 1), ("jan", 1),
        ("febrero", 2), ("feb", 2), ("february", 2),
        ("marzo", 3), ("mar", 3), ("march", 3),
        ("abril", 4), ("abr", 4), ("april", 4), ("apr", 4),
        ("mayo", 5), ("may", 5),
        ("junio", 6), ("jun", 6), ("june", 6),
        ("julio", 7), ("jul", 7), ("july", 7),
        ("agosto", 8), ("ago", 8), ("august", 8), ("aug", 8),
        ("setiembre", 9), ("septiembre", 9), ("set", 9), ("sep", 9), ("sept", 9), ("september", 9),
        ("octubre", 10), ("oct", 10), ("october", 10),
        ("noviembre", 11), ("nov", 11), ("november", 11),
        ("diciembre", 12), ("dic", 12), ("december", 12), ("dec", 12),
    ];

    /// Tokens ignored by the fallback parser ("10 de marzo de 2021", "lunes 1 marzo 2021").
    static ref FILLER_WORDS: Vec<&'static str> = vec![
        "de", "del", "the", "of",
        "lunes", "martes", "miercoles", "miércoles", "jueves", "viernes", "sabado", "sábado", "domingo",
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        "mon", "tue", "wed", "thu", "fri", "sat", "sun",
    ];
}

/// Parsea una fecha tolerando formatos mixtos. Nunca falla: lo irreconocible es `None`.
pub fn parse_date_safe(value: Option<&str>) -> Option<NaiveDate> {
    let s = value?.trim();
    let lowered = s.to_lowercase();
    if s.is_empty() || NULL_DATE_TOKENS.iter().any(|t| *t == lowered) {
        return None;
    }
    parse_explicit(s).or_else(|| parse_fallback(s))
}

/// First explicit format that consumes the whole string wins.
pub fn parse_explicit(s: &str) -> Option<NaiveDate> {
    EXPLICIT_FORMATS
        .iter()
        .filter(|(shape, _)| shape.is_match(s))
        .find_map(|(_, fmt)| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Permissive parser for everything the explicit formats miss. Ambiguous
/// numeric day/month order is read day-first; time of day is discarded.
/// A complete day, month and year are required.
pub fn parse_fallback(s: &str) -> Option<NaiveDate> {
    let lowered = s.trim().to_lowercase();
    let date_part = TIME_SUFFIX
        .captures(&lowered)
        .and_then(|caps| caps.name("date"))
        .map(|m| m.as_str().trim())
        .unwrap_or(lowered.as_str());

    if let Some(date) = parse_numeric(date_part) {
        return Some(date);
    }
    if COMPACT_DATE.is_match(date_part) {
        return NaiveDate::from_ymd_opt(
            date_part[0..4].parse().ok()?,
            date_part[4..6].parse().ok()?,
            date_part[6..8].parse().ok()?,
        );
    }
    parse_with_month_name(date_part)
}

fn expand_year(token: &str) -> Option<i32> {
    let year: i32 = token.parse().ok()?;
    match token.len() {
        // mismo pivote que %y de chrono: 00-69 → 20xx, 70-99 → 19xx
        1 | 2 if year < 70 => Some(2000 + year),
        1 | 2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

fn parse_numeric(s: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(s)?;
    let (a, b, c) = (&caps[1], &caps[2], &caps[3]);
    let b: u32 = b.parse().ok()?;

    if a.len() == 4 {
        let year: i32 = a.parse().ok()?;
        let c: u32 = c.parse().ok()?;
        if c > 99 {
            return None;
        }
        return NaiveDate::from_ymd_opt(year, b, c).or_else(|| NaiveDate::from_ymd_opt(year, c, b));
    }

    if a.len() > 2 {
        return None;
    }
    let a: u32 = a.parse().ok()?;
    let year = expand_year(c)?;
    NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
}

fn month_word(token: &str) -> Option<u32> {
    MONTH_WORDS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, month)| *month)
}

fn parse_with_month_name(s: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = WORD_SEPARATORS
        .split(s)
        .filter(|t| !t.is_empty() && !FILLER_WORDS.iter().any(|w| w == t))
        .collect();
    if tokens.len() != 3 {
        return None;
    }

    let month_pos = tokens.iter().position(|t| month_word(t).is_some())?;
    let month = month_word(tokens[month_pos])?;
    let numbers: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != month_pos)
        .map(|(_, t)| *t)
        .collect();
    if !numbers.iter().all(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    // un token de 4 dígitos es el año; si no, el último número lo es
    let (day, year) = if numbers[0].len() == 4 {
        (numbers[1], numbers[0])
    } else {
        (numbers[0], numbers[1])
    };
    if day.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(expand_year(year)?, month, day.parse().ok()?)
}
