use std::fs;
use std::path::Path;

use chrono::Local;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::aggregate::{FileSummary, SummaryRecord};
use crate::amount::Fixed2;
use crate::error::Result;
use crate::models::{CanonicalRecord, NormalizeStats};
use crate::stats;

/// Timestamped default filename, matching the original report tooling:
/// purchase_report_20250825_143000.json
pub fn timestamped_name(prefix: &str, ext: &str) -> String {
    format!("{prefix}_{}.{ext}", Local::now().format("%Y%m%d_%H%M%S"))
}

fn file_checksum(path: &Path) -> Result<String> {
    let data = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// The canonical export column order, shared by the CSV and the JSON
/// metadata column list.
pub const EXPORT_COLUMNS: &[&str] = &[
    "分類コード",
    "分類名称",
    "仕入先コード",
    "仕入先",
    "ファイルNo.",
    "UNIT",
    "No.",
    "品名",
    "メーカー",
    "材質・型式",
    "数",
    "受入日",
    "単価",
];

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Detail export for downstream analysis: metadata + per-column statistics +
/// the full record set.
pub fn write_detail_json(
    records: &[CanonicalRecord],
    norm_stats: &NormalizeStats,
    source: &Path,
    out_path: &Path,
) -> Result<()> {
    let payload = json!({
        "metadata": {
            "generated_at": Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "total_records": records.len(),
            "columns": EXPORT_COLUMNS,
            "file_no": records.first().map(|r| r.file_no.clone()),
            "source_file": source.display().to_string(),
            "source_checksum": file_checksum(source)?,
            "anomalies": norm_stats,
        },
        "statistics": stats::compute(records),
        "data": records,
    });
    ensure_parent(out_path)?;
    fs::write(out_path, format!("{}\n", serde_json::to_string_pretty(&payload)?))?;
    Ok(())
}

/// Aggregated export: category and file summaries.
pub fn write_summary_json(
    category_summary: &[SummaryRecord],
    file_summary: &[FileSummary],
    out_path: &Path,
) -> Result<()> {
    let payload = json!({
        "metadata": {
            "generated_at": Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "category_count": category_summary.len(),
            "file_count": file_summary.len(),
        },
        "category_summary": category_summary,
        "file_summary": file_summary,
    });
    ensure_parent(out_path)?;
    fs::write(out_path, format!("{}\n", serde_json::to_string_pretty(&payload)?))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Plain numeric text for CSV cells: whole values without decimals.
fn plain(v: Fixed2) -> String {
    if v.hundredths() % 100 == 0 {
        (v.hundredths() / 100).to_string()
    } else {
        format!("{:.2}", v.to_f64())
    }
}

/// Detail CSV with a UTF-8 BOM so Excel opens it with the right encoding.
pub fn write_detail_csv(records: &[CanonicalRecord], out_path: &Path) -> Result<()> {
    ensure_parent(out_path)?;
    let mut buf: Vec<u8> = vec![0xEF, 0xBB, 0xBF];
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(EXPORT_COLUMNS)?;
        for rec in records {
            let date = rec
                .received_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            wtr.write_record([
                rec.classification_code.clone(),
                rec.classification_name.clone(),
                rec.supplier_code.clone(),
                rec.supplier_name.clone(),
                rec.file_no.clone(),
                rec.unit.clone(),
                rec.line_no.clone(),
                rec.product_name.clone(),
                rec.manufacturer.clone(),
                rec.material_model.clone(),
                plain(rec.quantity),
                date,
                plain(rec.unit_price),
            ])?;
        }
        wtr.flush()?;
    }
    fs::write(out_path, buf)?;
    Ok(())
}
