use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::aggregate::{summarize_by_category, summarize_by_file, FileSummary, SummaryRecord};
use crate::allowlist::{build_allow_list, filter_records};
use crate::amount::Fixed2;
use crate::cli::{print_anomalies, strategy_for};
use crate::error::{Result, ShiireError};
use crate::fmt::{qty, yen};
use crate::mapping::CategoryMap;
use crate::normalizer::normalize;
use crate::reader;
use crate::settings::load_settings;
use crate::writer;

pub fn run(
    data: &str,
    shaping: Option<&str>,
    filtered: bool,
    out_dir: Option<&str>,
    csv: bool,
    no_repair: bool,
) -> Result<()> {
    if filtered && shaping.is_none() {
        return Err(ShiireError::Other(
            "--filtered requires --shaping (the allow-list comes from the shaping list)"
                .to_string(),
        ));
    }

    let settings = load_settings();
    let out_dir = out_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.output_dir());
    let strategy = strategy_for(no_repair);
    let map = CategoryMap::builtin(settings.policy());

    let data_path = Path::new(data);
    let rows = reader::read_purchasing_export(data_path, strategy)?;
    let (mut records, stats) = normalize(&rows, &map, strategy);
    print_anomalies(&stats);

    if filtered {
        let shaping_path = Path::new(shaping.unwrap());
        let shaping_rows = reader::read_rows(shaping_path)?;
        let allow = build_allow_list(&shaping_rows, strategy)?;
        if allow.is_empty() {
            println!(
                "{}",
                "Warning: shaping list yielded no codes; filtered report will be empty".yellow()
            );
        }
        let (kept, excluded) = filter_records(records, &allow);
        records = kept;
        println!(
            "Allow-list: {} codes; {} records excluded, {} kept",
            allow.len(),
            excluded,
            records.len()
        );
    }

    let category_summary = summarize_by_category(&records);
    let file_summary = summarize_by_file(&records);

    println!("\n{}", format_category_table(&category_summary));
    println!("\n{}", format_file_table(&file_summary));

    let detail_path = out_dir.join(writer::timestamped_name("purchase_report", "json"));
    writer::write_detail_json(&records, &stats, data_path, &detail_path)?;
    println!("\nDetail JSON:  {}", detail_path.display().to_string().green());

    let summary_path = out_dir.join(writer::timestamped_name("purchase_summary", "json"));
    writer::write_summary_json(&category_summary, &file_summary, &summary_path)?;
    println!("Summary JSON: {}", summary_path.display().to_string().green());

    if csv {
        let csv_path = out_dir.join(writer::timestamped_name("purchase_report", "csv"));
        writer::write_detail_csv(&records, &csv_path)?;
        println!("Detail CSV:   {}", csv_path.display().to_string().green());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (summary data → String)
// ---------------------------------------------------------------------------

pub fn format_category_table(summary: &[SummaryRecord]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Category", "File No.", "Count", "Qty", "Amount"]);
    for s in summary {
        table.add_row(vec![
            Cell::new(&s.classification_code),
            Cell::new(&s.classification_name),
            Cell::new(&s.file_no),
            Cell::new(s.record_count),
            Cell::new(qty(s.total_quantity)),
            Cell::new(yen(s.total_amount)),
        ]);
    }
    let total: Fixed2 = summary.iter().map(|s| s.total_amount).sum();
    let count: usize = summary.iter().map(|s| s.record_count).sum();
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(""),
        Cell::new(""),
        Cell::new(count),
        Cell::new(""),
        Cell::new(yen(total)),
    ]);
    format!("Category Summary\n{table}")
}

pub fn format_file_table(summary: &[FileSummary]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["File No.", "Count", "Amount"]);
    for s in summary {
        table.add_row(vec![
            Cell::new(&s.file_no),
            Cell::new(s.record_count),
            Cell::new(yen(s.total_amount)),
        ]);
    }
    format!("File Summary\n{table}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table_lists_groups_and_total() {
        let summary = vec![
            SummaryRecord {
                classification_code: "11".into(),
                classification_name: "E:部品".into(),
                file_no: "F1".into(),
                record_count: 2,
                total_quantity: Fixed2::from_int(5),
                total_amount: Fixed2::from_int(500),
            },
            SummaryRecord {
                classification_code: "16".into(),
                classification_name: "M:材料".into(),
                file_no: "F1".into(),
                record_count: 1,
                total_quantity: Fixed2::from_int(1),
                total_amount: Fixed2::from_int(80),
            },
        ];
        let out = format_category_table(&summary);
        assert!(out.contains("E:部品"));
        assert!(out.contains("¥500"));
        assert!(out.contains("¥580")); // grand total
        assert!(out.contains("Category Summary"));
    }

    #[test]
    fn test_file_table_empty_is_wellformed() {
        let out = format_file_table(&[]);
        assert!(out.contains("File Summary"));
        assert!(out.contains("File No."));
    }
}
