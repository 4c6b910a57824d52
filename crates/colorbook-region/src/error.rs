//! Error types for colorbook-region

use thiserror::Error;

/// Errors that can occur during region consolidation
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] colorbook_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Region referenced by the graph is missing
    #[error("region {0} is not in the graph")]
    MissingRegion(u32),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
