//! Error types for dmriqc-squad
//!
//! Every variant aborts the run; there is no partial report.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// File system operation failed on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Aggregator could not be started or its output stream failed
    #[error("External tool failure ({binary}): {message}")]
    ExternalTool { binary: String, message: String },

    /// Aggregator result missing or malformed
    #[error("Data format error in {path}: {message}")]
    DataFormat { path: PathBuf, message: String },

    /// Metric arrays of unequal length
    #[error(
        "Shape mismatch: qc_motion has {motion} rows, qc_cnr has {cnr}, qc_outliers has {outliers}"
    )]
    ShapeMismatch {
        motion: usize,
        cnr: usize,
        outliers: usize,
    },

    /// Discovered folders and aggregator rows differ in number
    #[error("Subject count mismatch: {discovered} folders discovered, {aggregated} rows aggregated")]
    SubjectCountMismatch { discovered: usize, aggregated: usize },

    /// dmriqc-common error
    #[error("Common error: {0}")]
    Common(#[from] dmriqc_common::Error),
}

impl PipelineError {
    /// Attach the offending path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline stages
pub type PipelineResult<T> = Result<T, PipelineError>;
