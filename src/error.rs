use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinsortError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Row {row}: invalid {column} value {value:?}")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown row: {0}")]
    UnknownRow(usize),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, FinsortError>;
