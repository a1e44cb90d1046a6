use std::path::PathBuf;

/// Errors raised while loading or transforming a single interferogram.
///
/// Every variant is terminal for the file that produced it; the batch driver
/// records it and moves on to the next job.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The input path does not exist.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed table: missing columns, non-numeric fields or too few rows.
    #[error("parse error: {0}")]
    Parse(String),

    /// Data that parsed but cannot be transformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AnalysisError::FileNotFound { path }
        } else {
            AnalysisError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
