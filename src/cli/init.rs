use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings};

/// Write the settings file so defaults are visible and editable.
pub fn run(output_dir: Option<&str>, fallback: Option<&str>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = output_dir {
        settings.output_dir = dir.to_string();
    }
    if let Some(fb) = fallback {
        settings.unknown_code_fallback = fb.to_string();
    }
    save_settings(&settings)?;

    println!("{}", "Settings saved.".green());
    println!("Output dir:            {}", settings.output_dir);
    println!("Unknown-code fallback: {}", settings.unknown_code_fallback);
    if settings.unknown_code_fallback == "label" {
        println!("Unclassified label:    {}", settings.unclassified_label);
    }
    Ok(())
}
