use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiireError};
use crate::mapping::UnknownCodePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// "source-name" keeps the row's own classification name for unknown
    /// codes; "label" substitutes `unclassified_label`.
    #[serde(default = "default_fallback")]
    pub unknown_code_fallback: String,
    #[serde(default = "default_unclassified_label")]
    pub unclassified_label: String,
}

fn default_output_dir() -> String {
    "ReportOutput".to_string()
}

fn default_fallback() -> String {
    "source-name".to_string()
}

fn default_unclassified_label() -> String {
    "未分類".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            unknown_code_fallback: default_fallback(),
            unclassified_label: default_unclassified_label(),
        }
    }
}

impl Settings {
    pub fn policy(&self) -> UnknownCodePolicy {
        match self.unknown_code_fallback.as_str() {
            "label" => UnknownCodePolicy::Label(self.unclassified_label.clone()),
            _ => UnknownCodePolicy::SourceName,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("shiire")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ShiireError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}
