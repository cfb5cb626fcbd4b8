use std::path::Path;

use colored::Colorize;

use crate::aggregate::file_numbers;
use crate::allowlist::build_allow_list;
use crate::cli::{print_anomalies, strategy_for};
use crate::error::Result;
use crate::mapping::CategoryMap;
use crate::normalizer::normalize;
use crate::reader;
use crate::settings::load_settings;

pub fn run(data: &str, shaping: Option<&str>, no_repair: bool) -> Result<()> {
    let settings = load_settings();
    let strategy = strategy_for(no_repair);
    let map = CategoryMap::builtin(settings.policy());

    let data_path = Path::new(data);
    let rows = reader::read_rows(data_path)?;
    println!("{}", format!("=== {data} ===").bold());
    println!("Sheet rows:    {}", rows.len());

    let raw = reader::read_purchasing_export(data_path, strategy)?;
    let (records, stats) = normalize(&raw, &map, strategy);
    print_anomalies(&stats);

    let files = file_numbers(&records);
    println!("\nFile numbers ({}):", files.len());
    for no in &files {
        println!("  {no}");
    }

    println!("\nTranslation table ({} codes):", map.len());
    for (code, name) in map.sorted_entries() {
        println!("  {code} -> {name}");
    }

    if let Some(shaping) = shaping {
        let shaping_rows = reader::read_rows(Path::new(shaping))?;
        let allow = build_allow_list(&shaping_rows, strategy)?;
        println!("\nShaping list: {} allow-listed codes", allow.len());
        let codes: Vec<String> = allow.iter().cloned().collect();
        println!("  {}", codes.join(", "));
        let outside = records
            .iter()
            .filter(|r| !allow.contains(&r.classification_code))
            .count();
        println!("  {} records fall outside the allow-list", outside);
    }

    Ok(())
}
