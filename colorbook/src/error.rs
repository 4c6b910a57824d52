//! Error types for the colorbook pipeline

use colorbook_region::RegionError;
use thiserror::Error;

/// Errors that can occur while running the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] colorbook_core::Error),

    /// Region consolidation error
    #[error("region error: {0}")]
    Region(#[from] RegionError),

    /// Configuration could not be parsed or serialized
    #[error("configuration format error: {0}")]
    Format(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration values out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An external collaborator (superpixel generator, color converter) failed
    #[error("{stage} failed: {message}")]
    Collaborator {
        stage: &'static str,
        message: String,
    },
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
