pub mod config;
pub use config::{Config, LoggingConfig, OutputConfig, SourceConfig, DATA_URL};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToyHistError {
    #[error("network error: {0}")]
    Network(String),
    #[error("format error: {0}")]
    Format(String),
    #[error("shape error in histogram '{name}': {detail}")]
    Shape { name: String, detail: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("histogram not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Other(String),
}

impl ToyHistError {
    pub fn shape(name: &str, detail: impl Into<String>) -> Self {
        Self::Shape { name: name.to_owned(), detail: detail.into() }
    }
}

pub type Result<T> = std::result::Result<T, ToyHistError>;
