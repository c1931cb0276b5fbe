use lipidmatch::AlignmentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error interpreting the config: {0}")]
    Config(String),

    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("Data reading error: {0}")]
    DataReading(String),
}
