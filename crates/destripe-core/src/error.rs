use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DestripeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} RAW file does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("FITS error: {0}")]
    Fits(#[from] fitsio::errors::Error),

    #[error("Keyword {keyword} not found in {}", path.display())]
    MissingKeyword { path: PathBuf, keyword: String },

    #[error("Keyword {keyword} has unexpected value: {value}")]
    InvalidKeyword { keyword: String, value: String },

    #[error("Cannot derive product names from {}: no 'raw' token in file name", .0.display())]
    InvalidName(PathBuf),

    #[error("Stripe mask {} does not exist", .0.display())]
    MissingMask(PathBuf),

    #[error("Could not launch {tool}: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} failed ({status})")]
    StageFailed { stage: String, status: ExitStatus },

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, DestripeError>;
