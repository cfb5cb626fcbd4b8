use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShiireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read {path}: {reason}")]
    Spreadsheet { path: String, reason: String },

    #[error("No header row found in {0} (expected purchasing-export columns)")]
    HeaderNotFound(String),

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: String, column: String },

    #[error("No records for file number: {0}")]
    UnknownFileNo(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ShiireError>;
