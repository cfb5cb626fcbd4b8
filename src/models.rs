use chrono::NaiveDate;
use serde::Serialize;

use crate::amount::Fixed2;

/// One spreadsheet cell as delivered by the reader. No invariants: text may
/// be garbled, numbers may arrive as text, date cells surface as Excel
/// serial numbers, anything may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Text(String),
    Number(f64),
    #[default]
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text content for fields that are semantically strings. Numeric cells
    /// print without a trailing `.0` (spreadsheets upgrade code columns to
    /// floats).
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Cell::Empty => String::new(),
        }
    }
}

/// Intermediate representation of one export line before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub classification_code: Cell,
    pub classification_name: Cell,
    pub supplier_code: Cell,
    pub supplier_name: Cell,
    pub file_no: Cell,
    pub unit_no: Cell,
    pub line_no: Cell,
    pub product_name: Cell,
    pub manufacturer: Cell,
    pub material_model: Cell,
    pub quantity: Cell,
    pub received_date: Cell,
    pub unit_price: Cell,
}

/// Normalized, total-safe projection of a RawRow. `classification_name` is
/// always populated; quantity and unit price default to zero rather than
/// null so sums never poison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    #[serde(rename = "分類コード")]
    pub classification_code: String,
    #[serde(rename = "分類名称")]
    pub classification_name: String,
    #[serde(rename = "仕入先コード")]
    pub supplier_code: String,
    #[serde(rename = "仕入先略称")]
    pub supplier_name: String,
    #[serde(rename = "ファイルNO")]
    pub file_no: String,
    #[serde(rename = "ユニットNO")]
    pub unit: String,
    #[serde(rename = "部品番号")]
    pub line_no: String,
    #[serde(rename = "品目名称")]
    pub product_name: String,
    #[serde(rename = "メーカー名")]
    pub manufacturer: String,
    #[serde(rename = "材質・型式")]
    pub material_model: String,
    #[serde(rename = "受入数量")]
    pub quantity: Fixed2,
    #[serde(rename = "受入日")]
    pub received_date: Option<NaiveDate>,
    #[serde(rename = "受入単価")]
    pub unit_price: Fixed2,
}

impl CanonicalRecord {
    /// quantity × unit price, the monetary basis for every report.
    pub fn purchase_value(&self) -> Fixed2 {
        self.quantity.times(self.unit_price)
    }
}

/// Anomaly counts accumulated while normalizing one input. Surfaced with
/// every run so bad rows never vanish silently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeStats {
    pub input_rows: usize,
    pub normalized: usize,
    pub dropped_rows: usize,
    pub repaired_fields: usize,
    pub repair_failures: usize,
    pub quantity_defaults: usize,
    pub price_defaults: usize,
    pub date_failures: usize,
    pub unknown_codes: usize,
}

impl NormalizeStats {
    pub fn has_anomalies(&self) -> bool {
        self.dropped_rows > 0
            || self.repair_failures > 0
            || self.quantity_defaults > 0
            || self.price_defaults > 0
            || self.date_failures > 0
            || self.unknown_codes > 0
    }
}
