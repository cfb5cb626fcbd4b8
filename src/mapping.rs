use std::collections::HashMap;

use regex::Regex;

/// Classification code → replacement name, as maintained by purchasing.
/// Codes are stored zero-padded the way the source system prints them.
const BUILTIN_TABLE: &[(&str, &str)] = &[
    ("02", "E:盤組"),
    ("03", "E:配線"),
    ("04", "E:調整"),
    ("05", "E:配線"),
    ("06", "M:設計"),
    ("07", "M:製作"),
    ("08", "M:組立"),
    ("09", "M:組立"),
    ("10", "M:組立"),
    ("11", "E:部品"),
    ("12", "E:部品"),
    ("13", "E:部品"),
    ("14", "M:一式"),
    ("15", "M:購入"),
    ("16", "M:材料"),
    ("17", "M:製作"),
    ("18", "M:一式"),
    ("19", "-"),
    ("20", "Others:"),
    ("100", "S:旅費"),
    ("101", "E:旅費"),
    ("102", "M:旅費"),
    ("103", "S:旅費"),
    ("104", "S:旅費"),
];

/// What `translate` returns when the code is not in the table.
#[derive(Debug, Clone, PartialEq)]
pub enum UnknownCodePolicy {
    /// Keep the classification name the row already carries (the source
    /// system's own label). This is what the original reports did.
    SourceName,
    /// Substitute a fixed label, e.g. "未分類".
    Label(String),
}

pub struct CategoryMap {
    entries: HashMap<String, String>,
    policy: UnknownCodePolicy,
}

impl CategoryMap {
    pub fn builtin(policy: UnknownCodePolicy) -> Self {
        let entries = BUILTIN_TABLE
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        CategoryMap { entries, policy }
    }

    /// Build from arbitrary pairs (tests, or a future external table).
    pub fn from_entries<I>(pairs: I, policy: UnknownCodePolicy) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        CategoryMap {
            entries: pairs.into_iter().collect(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted (code, name) pairs for display.
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut v: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(c, n)| (c.as_str(), n.as_str()))
            .collect();
        v.sort();
        v
    }

    /// Total over strings: returns the translated name and whether the code
    /// was known. `source_name` is the classification name the row carried.
    pub fn translate(&self, code: &str, source_name: &str) -> (String, bool) {
        if let Some(name) = self.entries.get(code) {
            return (name.clone(), true);
        }
        let fallback = match &self.policy {
            UnknownCodePolicy::SourceName => {
                let trimmed = source_name.trim();
                if trimmed.is_empty() {
                    code.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            UnknownCodePolicy::Label(label) => label.clone(),
        };
        (fallback, false)
    }
}

/// Normalize a raw code cell to canonical form: numeric text (including the
/// `2.0` float artifacts spreadsheet cells produce) is truncated to an
/// integer and zero-padded to at least two digits. Non-numeric text yields
/// None.
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let numeric = Regex::new(r"^\d+(\.\d+)?$").ok()?;
    if !numeric.is_match(trimmed) {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()? as i64;
    Some(format!("{value:02}"))
}
