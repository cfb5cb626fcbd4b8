use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::aggregate::file_numbers;
use crate::cli::{print_anomalies, strategy_for};
use crate::error::{Result, ShiireError};
use crate::fmt::yen;
use crate::html;
use crate::mapping::CategoryMap;
use crate::normalizer::normalize;
use crate::ranking::rank;
use crate::reader;
use crate::settings::load_settings;
use crate::writer;

/// File numbers go into output filenames; keep them path-safe.
fn sanitize(file_no: &str) -> String {
    file_no
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

pub fn run(
    data: &str,
    file_no: Option<&str>,
    out_dir: Option<&str>,
    no_repair: bool,
) -> Result<()> {
    let settings = load_settings();
    let out_dir = out_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.output_dir());
    let strategy = strategy_for(no_repair);
    let map = CategoryMap::builtin(settings.policy());

    let data_path = Path::new(data);
    let rows = reader::read_purchasing_export(data_path, strategy)?;
    // The ranking always runs on the full record set; the allow-list filter
    // belongs to the summary report, not the per-file analysis.
    let (records, stats) = normalize(&rows, &map, strategy);
    print_anomalies(&stats);

    let Some(file_no) = file_no else {
        let available = file_numbers(&records);
        if available.is_empty() {
            println!("No file numbers found in {data}.");
            return Ok(());
        }
        println!("\nAvailable file numbers (pass one with --file-no):");
        for no in available {
            println!("  {no}");
        }
        return Ok(());
    };

    let tree = rank(&records, file_no);
    if tree.record_count == 0 {
        return Err(ShiireError::UnknownFileNo(file_no.to_string()));
    }

    println!(
        "\nFile No. {}: {} records, {} across {} categories",
        file_no,
        tree.record_count,
        yen(tree.total_amount),
        tree.categories.len()
    );

    let name = writer::timestamped_name(&format!("purchase_analysis_{}", sanitize(file_no)), "html");
    let out_path = out_dir.join(name);
    if let Some(dir) = out_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&out_path, html::render(&tree))?;
    println!("HTML report:  {}", out_path.display().to_string().green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_no() {
        assert_eq!(sanitize("F-1024"), "F-1024");
        assert_eq!(sanitize("A/B 1"), "A_B_1");
        assert_eq!(sanitize("第2期"), "第2期");
    }
}
