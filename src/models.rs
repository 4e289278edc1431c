use chrono::NaiveDate;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Columnas canónicas, en el orden en que se emiten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Periodo,
    Anio,
    FechaDescarga,
    DistritoFiscal,
    TipoFiscalia,
    Materia,
    Especialidad,
    TipoCaso,
    Especializada,
    Ingresado,
    Atendido,
    UbigeoPjfs,
    DptoPjfs,
    ProvPjfs,
    DistPjfs,
    FechaCorte,
}

impl CanonicalField {
    pub const COUNT: usize = 16;

    pub const ALL: [CanonicalField; CanonicalField::COUNT] = [
        CanonicalField::Periodo,
        CanonicalField::Anio,
        CanonicalField::FechaDescarga,
        CanonicalField::DistritoFiscal,
        CanonicalField::TipoFiscalia,
        CanonicalField::Materia,
        CanonicalField::Especialidad,
        CanonicalField::TipoCaso,
        CanonicalField::Especializada,
        CanonicalField::Ingresado,
        CanonicalField::Atendido,
        CanonicalField::UbigeoPjfs,
        CanonicalField::DptoPjfs,
        CanonicalField::ProvPjfs,
        CanonicalField::DistPjfs,
        CanonicalField::FechaCorte,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Periodo => "periodo",
            CanonicalField::Anio => "anio",
            CanonicalField::FechaDescarga => "fecha_descarga",
            CanonicalField::DistritoFiscal => "distrito_fiscal",
            CanonicalField::TipoFiscalia => "tipo_fiscalia",
            CanonicalField::Materia => "materia",
            CanonicalField::Especialidad => "especialidad",
            CanonicalField::TipoCaso => "tipo_caso",
            CanonicalField::Especializada => "especializada",
            CanonicalField::Ingresado => "ingresado",
            CanonicalField::Atendido => "atendido",
            CanonicalField::UbigeoPjfs => "ubigeo_pjfs",
            CanonicalField::DptoPjfs => "dpto_pjfs",
            CanonicalField::ProvPjfs => "prov_pjfs",
            CanonicalField::DistPjfs => "dist_pjfs",
            CanonicalField::FechaCorte => "fecha_corte",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

lazy_static! {
    /// Spelling (already normalized: trimmed, lowercase, single spaces) → canonical field.
    pub static ref COLUMN_MAP: HashMap<&'static str, CanonicalField> = {
        let mut map = HashMap::new();
        for field in CanonicalField::ALL {
            map.insert(field.name(), field);
        }
        map.insert("distrito fiscal", CanonicalField::DistritoFiscal);
        map.insert("tipo fiscalia", CanonicalField::TipoFiscalia);
        map.insert("tipo fiscalía", CanonicalField::TipoFiscalia);
        map.insert("año", CanonicalField::Anio);
        map.insert("fecha de corte", CanonicalField::FechaCorte);
        map.insert("fecha de descarga", CanonicalField::FechaDescarga);
        map
    };
}

/// Columnas de salida: canónicas + derivadas + procedencia.
pub const OUTPUT_COLUMNS: [&str; 23] = [
    "periodo",
    "anio",
    "fecha_descarga",
    "distrito_fiscal",
    "tipo_fiscalia",
    "materia",
    "especialidad",
    "tipo_caso",
    "especializada",
    "ingresado",
    "atendido",
    "ubigeo_pjfs",
    "dpto_pjfs",
    "prov_pjfs",
    "dist_pjfs",
    "fecha_corte",
    "fecha_corte_final",
    "tasa_atencion",
    "backlog",
    "datos_invalidos",
    "es_especializado",
    "anio_mes_key",
    "fuente",
];

/// A raw row after reconciliation: one untyped cell per canonical field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCase {
    values: [Option<String>; CanonicalField::COUNT],
}

impl RawCase {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    pub fn set(&mut self, field: CanonicalField, value: Option<String>) {
        self.values[field.index()] = value;
    }
}

/// Registro con tipos semánticos, salida del normalizador.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseRecord {
    pub periodo: Option<String>,
    pub anio: Option<i32>,
    pub fecha_descarga: Option<NaiveDate>,
    pub distrito_fiscal: Option<String>,
    pub tipo_fiscalia: Option<String>,
    pub materia: Option<String>,
    pub especialidad: Option<String>,
    pub tipo_caso: Option<String>,
    pub especializada: Option<String>,
    /// Never negative.
    pub ingresado: i64,
    /// Never negative.
    pub atendido: i64,
    pub ubigeo_pjfs: Option<String>,
    pub dpto_pjfs: Option<String>,
    pub prov_pjfs: Option<String>,
    pub dist_pjfs: Option<String>,
    pub fecha_corte: Option<NaiveDate>,
    pub fuente: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub fecha_corte_final: Option<NaiveDate>,
    pub tasa_atencion: Option<f64>,
    pub backlog: i64,
    pub datos_invalidos: bool,
    pub es_especializado: bool,
    pub anio_mes_key: Option<i32>,
}

/// Fila final: registro normalizado más sus KPIs.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRow {
    pub case: CaseRecord,
    pub derived: DerivedFields,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date(value: &Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn number<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    let cell = if value { "1" } else { "0" };
    cell.to_string()
}

impl CaseRow {
    /// Cells in `OUTPUT_COLUMNS` order; nulls become empty strings.
    pub fn to_fields(&self) -> Vec<String> {
        let c = &self.case;
        let d = &self.derived;
        vec![
            text(&c.periodo),
            number(&c.anio),
            date(&c.fecha_descarga),
            text(&c.distrito_fiscal),
            text(&c.tipo_fiscalia),
            text(&c.materia),
            text(&c.especialidad),
            text(&c.tipo_caso),
            text(&c.especializada),
            c.ingresado.to_string(),
            c.atendido.to_string(),
            text(&c.ubigeo_pjfs),
            text(&c.dpto_pjfs),
            text(&c.prov_pjfs),
            text(&c.dist_pjfs),
            date(&c.fecha_corte),
            date(&d.fecha_corte_final),
            number(&d.tasa_atencion),
            d.backlog.to_string(),
            flag(d.datos_invalidos),
            flag(d.es_especializado),
            number(&d.anio_mes_key),
            c.fuente.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_output_prefix() {
        for (i, field) in CanonicalField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(OUTPUT_COLUMNS[i], field.name());
        }
    }

    #[test]
    fn column_map_knows_spaced_and_canonical_spellings() {
        assert_eq!(COLUMN_MAP.get("distrito fiscal"), Some(&CanonicalField::DistritoFiscal));
        assert_eq!(COLUMN_MAP.get("distrito_fiscal"), Some(&CanonicalField::DistritoFiscal));
        assert_eq!(COLUMN_MAP.get("tipo fiscalia"), Some(&CanonicalField::TipoFiscalia));
        assert_eq!(COLUMN_MAP.get("fecha_corte"), Some(&CanonicalField::FechaCorte));
        assert_eq!(COLUMN_MAP.get("fuente"), None);
    }

    #[test]
    fn fields_render_nulls_as_empty_cells() {
        let row = CaseRow {
            case: CaseRecord {
                anio: Some(2021),
                ingresado: 10,
                atendido: 4,
                fuente: "a.csv".to_string(),
                ..Default::default()
            },
            derived: DerivedFields {
                fecha_corte_final: NaiveDate::from_ymd_opt(2021, 12, 31),
                tasa_atencion: Some(0.4),
                backlog: 6,
                datos_invalidos: false,
                es_especializado: true,
                anio_mes_key: Some(202112),
            },
        };

        let fields = row.to_fields();
        assert_eq!(fields.len(), OUTPUT_COLUMNS.len());
        assert_eq!(fields[0], "");
        assert_eq!(fields[1], "2021");
        assert_eq!(fields[15], "");
        assert_eq!(fields[16], "2021-12-31");
        assert_eq!(fields[17], "0.4");
        assert_eq!(fields[18], "6");
        assert_eq!(fields[19], "0");
        assert_eq!(fields[20], "1");
        assert_eq!(fields[21], "202112");
        assert_eq!(fields[22], "a.csv");
    }
}
