use std::collections::HashMap;

use serde::Serialize;

use crate::amount::Fixed2;
use crate::models::CanonicalRecord;

/// Summary of one numeric column for the analysis JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

fn numeric_stats(values: &[Fixed2]) -> NumericStats {
    if values.is_empty() {
        return NumericStats {
            count: 0,
            min: None,
            max: None,
            mean: None,
            std: None,
        };
    }
    let floats: Vec<f64> = values.iter().map(|v| v.to_f64()).collect();
    let n = floats.len() as f64;
    let mean = floats.iter().sum::<f64>() / n;
    // Sample standard deviation; undefined for a single value.
    let std = if floats.len() > 1 {
        let var = floats.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(var.sqrt())
    } else {
        None
    };
    NumericStats {
        count: values.len(),
        min: floats.iter().cloned().reduce(f64::min),
        max: floats.iter().cloned().reduce(f64::max),
        mean: Some(mean),
        std,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

/// Summary of one categorical column: distinct count plus the most frequent
/// values (count descending, first-seen on ties, so output is deterministic).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalStats {
    pub unique_count: usize,
    pub top_values: Vec<TopValue>,
}

const TOP_VALUES: usize = 10;

fn categorical_stats<'a, I>(values: I) -> CategoricalStats
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for v in values {
        if !counts.contains_key(v) {
            first_seen.push(v);
        }
        *counts.entry(v).or_insert(0) += 1;
    }
    let unique_count = first_seen.len();
    let mut ranked: Vec<(usize, &str)> = first_seen
        .iter()
        .enumerate()
        .map(|(i, v)| (i, *v))
        .collect();
    ranked.sort_by_key(|&(i, v)| (std::cmp::Reverse(counts[v]), i));
    CategoricalStats {
        unique_count,
        top_values: ranked
            .into_iter()
            .take(TOP_VALUES)
            .map(|(_, v)| TopValue {
                value: v.to_string(),
                count: counts[v],
            })
            .collect(),
    }
}

/// Per-column statistics block of the detail JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub numeric_columns: HashMap<String, NumericStats>,
    pub categorical_columns: HashMap<String, CategoricalStats>,
}

pub fn compute(records: &[CanonicalRecord]) -> ColumnStatistics {
    let mut numeric_columns = HashMap::new();
    numeric_columns.insert(
        "受入数量".to_string(),
        numeric_stats(&records.iter().map(|r| r.quantity).collect::<Vec<_>>()),
    );
    numeric_columns.insert(
        "受入単価".to_string(),
        numeric_stats(&records.iter().map(|r| r.unit_price).collect::<Vec<_>>()),
    );
    numeric_columns.insert(
        "仕入金額".to_string(),
        numeric_stats(&records.iter().map(|r| r.purchase_value()).collect::<Vec<_>>()),
    );

    let mut categorical_columns = HashMap::new();
    categorical_columns.insert(
        "分類コード".to_string(),
        categorical_stats(records.iter().map(|r| r.classification_code.as_str())),
    );
    categorical_columns.insert(
        "分類名称".to_string(),
        categorical_stats(records.iter().map(|r| r.classification_name.as_str())),
    );
    categorical_columns.insert(
        "仕入先略称".to_string(),
        categorical_stats(records.iter().map(|r| r.supplier_name.as_str())),
    );
    categorical_columns.insert(
        "ファイルNO".to_string(),
        categorical_stats(records.iter().map(|r| r.file_no.as_str())),
    );

    ColumnStatistics {
        numeric_columns,
        categorical_columns,
    }
}
