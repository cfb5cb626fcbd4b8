use std::collections::HashMap;

use serde::Serialize;

use crate::amount::Fixed2;
use crate::models::CanonicalRecord;

// ---------------------------------------------------------------------------
// Category summary
// ---------------------------------------------------------------------------

/// Spend totals for one (classification, file) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    #[serde(rename = "分類コード")]
    pub classification_code: String,
    #[serde(rename = "分類名称")]
    pub classification_name: String,
    #[serde(rename = "ファイルNO")]
    pub file_no: String,
    #[serde(rename = "件数")]
    pub record_count: usize,
    #[serde(rename = "合計数量")]
    pub total_quantity: Fixed2,
    #[serde(rename = "合計金額")]
    pub total_amount: Fixed2,
}

/// Group records by (classification code, classification name, file number).
/// Groups appear in first-seen input order so tabular output is reproducible
/// run over run.
pub fn summarize_by_category(records: &[CanonicalRecord]) -> Vec<SummaryRecord> {
    let mut order: Vec<SummaryRecord> = Vec::new();
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();

    for rec in records {
        let key = (
            rec.classification_code.clone(),
            rec.classification_name.clone(),
            rec.file_no.clone(),
        );
        let idx = *index.entry(key).or_insert_with(|| {
            order.push(SummaryRecord {
                classification_code: rec.classification_code.clone(),
                classification_name: rec.classification_name.clone(),
                file_no: rec.file_no.clone(),
                record_count: 0,
                total_quantity: Fixed2::ZERO,
                total_amount: Fixed2::ZERO,
            });
            order.len() - 1
        });
        let entry = &mut order[idx];
        entry.record_count += 1;
        entry.total_quantity += rec.quantity;
        entry.total_amount += rec.purchase_value();
    }

    order
}

// ---------------------------------------------------------------------------
// File summary
// ---------------------------------------------------------------------------

/// Spend totals for one originating file number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    #[serde(rename = "ファイルNO")]
    pub file_no: String,
    #[serde(rename = "件数")]
    pub record_count: usize,
    #[serde(rename = "合計金額")]
    pub total_amount: Fixed2,
}

pub fn summarize_by_file(records: &[CanonicalRecord]) -> Vec<FileSummary> {
    let mut order: Vec<FileSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for rec in records {
        let idx = *index.entry(rec.file_no.clone()).or_insert_with(|| {
            order.push(FileSummary {
                file_no: rec.file_no.clone(),
                record_count: 0,
                total_amount: Fixed2::ZERO,
            });
            order.len() - 1
        });
        let entry = &mut order[idx];
        entry.record_count += 1;
        entry.total_amount += rec.purchase_value();
    }

    order
}

/// Distinct file numbers present in the records, sorted for display.
pub fn file_numbers(records: &[CanonicalRecord]) -> Vec<String> {
    let mut nos: Vec<String> = records
        .iter()
        .map(|r| r.file_no.clone())
        .filter(|f| !f.is_empty())
        .collect();
    nos.sort();
    nos.dedup();
    nos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{CategoryMap, UnknownCodePolicy};
    use crate::models::{Cell, RawRow};
    use crate::normalizer::normalize;
    use crate::repair::RepairStrategy;

    fn record(code: &str, name: &str, file_no: &str, qty: i64, price: i64) -> CanonicalRecord {
        CanonicalRecord {
            classification_code: code.to_string(),
            classification_name: name.to_string(),
            supplier_code: String::new(),
            supplier_name: "X".to_string(),
            file_no: file_no.to_string(),
            unit: String::new(),
            line_no: String::new(),
            product_name: "p".to_string(),
            manufacturer: String::new(),
            material_model: String::new(),
            quantity: Fixed2::from_int(qty),
            received_date: None,
            unit_price: Fixed2::from_int(price),
        }
    }

    #[test]
    fn test_two_rows_same_group_aggregate_to_one_summary() {
        let records = vec![
            record("A1", "Bolts", "F1", 2, 100),
            record("A1", "Bolts", "F1", 3, 100),
        ];
        let summaries = summarize_by_category(&records);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.classification_name, "Bolts");
        assert_eq!(s.file_no, "F1");
        assert_eq!(s.record_count, 2);
        assert_eq!(s.total_quantity, Fixed2::from_int(5));
        assert_eq!(s.total_amount, Fixed2::from_int(500));
    }

    #[test]
    fn test_groups_split_by_file_no() {
        let records = vec![
            record("A1", "Bolts", "F1", 1, 100),
            record("A1", "Bolts", "F2", 1, 100),
        ];
        let summaries = summarize_by_category(&records);
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn test_first_seen_group_order_is_stable() {
        let records = vec![
            record("B2", "Nuts", "F1", 1, 10),
            record("A1", "Bolts", "F1", 1, 10),
            record("B2", "Nuts", "F1", 1, 10),
        ];
        let summaries = summarize_by_category(&records);
        assert_eq!(summaries[0].classification_name, "Nuts");
        assert_eq!(summaries[1].classification_name, "Bolts");
        assert_eq!(summaries[0].record_count, 2);
    }

    #[test]
    fn test_every_record_lands_in_exactly_one_group() {
        let records = vec![
            record("A1", "Bolts", "F1", 1, 10),
            record("A1", "Bolts", "F2", 2, 10),
            record("B2", "Nuts", "F1", 3, 10),
            record("C3", "Screws", "F3", 4, 10),
        ];
        let summaries = summarize_by_category(&records);
        let counted: usize = summaries.iter().map(|s| s.record_count).sum();
        assert_eq!(counted, records.len());
    }

    #[test]
    fn test_conservation_through_normalize_and_aggregate() {
        // Total of record counts equals rows that survived normalization.
        let rows = vec![
            raw("11", "F1", "2", "100"),
            raw("11", "F1", "3", "100"),
            RawRow::default(), // dropped
            raw("12", "F2", "1", "50"),
        ];
        let map = CategoryMap::builtin(UnknownCodePolicy::SourceName);
        let (records, stats) = normalize(&rows, &map, RepairStrategy::Mojibake);
        let summaries = summarize_by_category(&records);
        let counted: usize = summaries.iter().map(|s| s.record_count).sum();
        assert_eq!(counted, stats.input_rows - stats.dropped_rows);
    }

    fn raw(code: &str, file_no: &str, qty: &str, price: &str) -> RawRow {
        RawRow {
            classification_code: Cell::Text(code.into()),
            file_no: Cell::Text(file_no.into()),
            product_name: Cell::Text("p".into()),
            quantity: Cell::Text(qty.into()),
            unit_price: Cell::Text(price.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_twice_yields_identical_output() {
        let records = vec![
            record("A1", "Bolts", "F1", 2, 100),
            record("B2", "Nuts", "F1", 3, 40),
        ];
        assert_eq!(summarize_by_category(&records), summarize_by_category(&records));
        assert_eq!(summarize_by_file(&records), summarize_by_file(&records));
    }

    #[test]
    fn test_file_summary() {
        let records = vec![
            record("A1", "Bolts", "F1", 2, 100),
            record("B2", "Nuts", "F1", 1, 50),
            record("A1", "Bolts", "F2", 1, 10),
        ];
        let summaries = summarize_by_file(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].file_no, "F1");
        assert_eq!(summaries[0].record_count, 2);
        assert_eq!(summaries[0].total_amount, Fixed2::from_int(250));
        assert_eq!(summaries[1].total_amount, Fixed2::from_int(10));
    }

    #[test]
    fn test_file_numbers_sorted_distinct() {
        let records = vec![
            record("A1", "Bolts", "F2", 1, 1),
            record("A1", "Bolts", "F1", 1, 1),
            record("A1", "Bolts", "F2", 1, 1),
        ];
        assert_eq!(file_numbers(&records), vec!["F1", "F2"]);
    }

    #[test]
    fn test_empty_input_gives_empty_summaries() {
        assert!(summarize_by_category(&[]).is_empty());
        assert!(summarize_by_file(&[]).is_empty());
    }
}
