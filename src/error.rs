//! Error types shared by the cleaning, training and serving stages

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File {} is not a {expected} file", .path.display())]
    InvalidExtension { path: PathBuf, expected: &'static str },

    #[error("File {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("{label} is not a valid {domain}")]
    UnknownLabel { domain: &'static str, label: String },

    #[error("{code} is not a valid {domain} value")]
    UnknownCode { domain: &'static str, code: i64 },

    #[error("Model returned no prediction")]
    EmptyPrediction,

    #[error("Training error: {0}")]
    Training(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Errors caused by the caller's input rather than by this process.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::UnknownLabel { .. }
                | PipelineError::UnknownCode { .. }
                | PipelineError::EmptyPrediction
        )
    }
}

impl From<rmp_serde::encode::Error> for PipelineError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        PipelineError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for PipelineError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        PipelineError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
