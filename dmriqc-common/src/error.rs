//! Common error types for dMRI QC tools

use thiserror::Error;

/// Common result type for QC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across QC tools
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested file or folder not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or command-line parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
