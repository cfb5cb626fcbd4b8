use std::collections::BTreeSet;

use crate::error::{Result, ShiireError};
use crate::mapping::normalize_code;
use crate::models::{CanonicalRecord, Cell};
use crate::repair::RepairStrategy;

const SHAPING_CODE_HEADERS: &[&str] = &["分類ｺｰﾄﾞ", "分類コード"];

/// Distinct classification codes extracted from the shaping-list export.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowList {
    codes: BTreeSet<String>,
}

impl AllowList {
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.codes.iter()
    }
}

/// Extract the allow-list from raw shaping-list rows. The shaping list is a
/// hand-maintained sheet: its header sits anywhere in the leading rows and
/// code cells mix numeric and float-formatted text, so every candidate is
/// pushed through the same code normalization as the main export.
pub fn build_allow_list(rows: &[Vec<Cell>], strategy: RepairStrategy) -> Result<AllowList> {
    let mut code_col: Option<usize> = None;
    let mut header_row = 0usize;

    'scan: for (i, row) in rows.iter().enumerate().take(50) {
        for (j, cell) in row.iter().enumerate() {
            if let Cell::Text(s) = cell {
                let repaired = strategy.apply(s.trim()).text;
                if SHAPING_CODE_HEADERS.iter().any(|h| repaired == *h) {
                    code_col = Some(j);
                    header_row = i;
                    break 'scan;
                }
            }
        }
    }

    let col = code_col.ok_or_else(|| ShiireError::MissingColumn {
        path: "shaping list".to_string(),
        column: "分類ｺｰﾄﾞ".to_string(),
    })?;

    let mut codes = BTreeSet::new();
    for row in &rows[header_row + 1..] {
        let Some(cell) = row.get(col) else { continue };
        if let Some(code) = normalize_code(&cell.as_text()) {
            codes.insert(code);
        }
    }
    Ok(AllowList { codes })
}

/// Keep only records whose classification code appears in the allow-list.
/// Returns the kept records and the count of those excluded. A join miss is
/// not an error, but it must be visible.
pub fn filter_records(
    records: Vec<CanonicalRecord>,
    allow: &AllowList,
) -> (Vec<CanonicalRecord>, usize) {
    let before = records.len();
    let kept: Vec<CanonicalRecord> = records
        .into_iter()
        .filter(|r| allow.contains(&r.classification_code))
        .collect();
    let excluded = before - kept.len();
    (kept, excluded)
}
