//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to build a fixture
    #[error("failed to build fixture: {0}")]
    Fixture(#[from] colorbook_core::Error),

    /// Failed to write a regression output
    #[error("failed to write '{path}': {message}")]
    Write { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
