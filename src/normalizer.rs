use chrono::NaiveDate;

use crate::amount::Fixed2;
use crate::mapping::{normalize_code, CategoryMap};
use crate::models::{CanonicalRecord, Cell, NormalizeStats, RawRow};
use crate::repair::RepairStrategy;

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

/// Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug).
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial as i64))
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y年%m月%d日",
];

fn parse_date(cell: &Cell, stats: &mut NormalizeStats) -> Option<NaiveDate> {
    match cell {
        Cell::Number(serial) => {
            let parsed = excel_serial_to_date(*serial);
            if parsed.is_none() {
                stats.date_failures += 1;
            }
            parsed
        }
        Cell::Empty => None,
        Cell::Text(s) => {
            let t = s.trim();
            if t.is_empty() {
                return None;
            }
            for fmt in DATE_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
                    return Some(d);
                }
            }
            stats.date_failures += 1;
            None
        }
    }
}

/// Coerce a quantity or unit-price cell, defaulting to zero. Only a present
/// but unparseable value counts as an anomaly; a blank cell is simply zero.
fn parse_numeric(cell: &Cell, defaults: &mut usize) -> Fixed2 {
    match cell {
        Cell::Number(n) => Fixed2::from_f64(*n),
        Cell::Empty => Fixed2::ZERO,
        Cell::Text(s) => {
            if s.trim().is_empty() {
                return Fixed2::ZERO;
            }
            match Fixed2::parse(s) {
                Some(v) => v,
                None => {
                    *defaults += 1;
                    Fixed2::ZERO
                }
            }
        }
    }
}

/// Text field with encoding repair. Non-text cells stringify as-is.
fn repaired_text(cell: &Cell, strategy: RepairStrategy, stats: &mut NormalizeStats) -> String {
    match cell {
        Cell::Text(s) => {
            let r = strategy.apply(s.trim());
            if r.changed {
                stats.repaired_fields += 1;
            }
            if r.failed {
                stats.repair_failures += 1;
            }
            r.text
        }
        other => other.as_text(),
    }
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Turn raw export rows into canonical records. A row missing classification
/// code, file number, and product name alike carries nothing aggregatable
/// and is dropped (counted, never fatal).
pub fn normalize(
    rows: &[RawRow],
    map: &CategoryMap,
    strategy: RepairStrategy,
) -> (Vec<CanonicalRecord>, NormalizeStats) {
    let mut stats = NormalizeStats {
        input_rows: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        if row.classification_code.is_empty()
            && row.file_no.is_empty()
            && row.product_name.is_empty()
        {
            stats.dropped_rows += 1;
            continue;
        }

        let raw_code = repaired_text(&row.classification_code, strategy, &mut stats);
        let classification_code = normalize_code(&raw_code).unwrap_or(raw_code);
        let source_name = repaired_text(&row.classification_name, strategy, &mut stats);
        let (classification_name, known) = map.translate(&classification_code, &source_name);
        if !known && !classification_code.is_empty() {
            stats.unknown_codes += 1;
        }

        let quantity = parse_numeric(&row.quantity, &mut stats.quantity_defaults);
        let unit_price = parse_numeric(&row.unit_price, &mut stats.price_defaults);
        let received_date = parse_date(&row.received_date, &mut stats);

        records.push(CanonicalRecord {
            classification_code,
            classification_name,
            supplier_code: repaired_text(&row.supplier_code, strategy, &mut stats),
            supplier_name: repaired_text(&row.supplier_name, strategy, &mut stats),
            file_no: repaired_text(&row.file_no, strategy, &mut stats),
            unit: repaired_text(&row.unit_no, strategy, &mut stats),
            line_no: repaired_text(&row.line_no, strategy, &mut stats),
            product_name: repaired_text(&row.product_name, strategy, &mut stats),
            manufacturer: repaired_text(&row.manufacturer, strategy, &mut stats),
            material_model: repaired_text(&row.material_model, strategy, &mut stats),
            quantity,
            received_date,
            unit_price,
        });
    }

    stats.normalized = records.len();
    (records, stats)
}
