//! Error taxonomy for stream extraction, configuration, and materialization.
//!
//! Extraction and configuration errors are fail-fast: no partial metadata is
//! ever returned. Materialization errors abort the copy loop in place and are
//! not rolled back; the absence of the completion marker is the only recovery
//! signal consumers may rely on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    /// The stream directory does not exist.
    #[error("missing directory '{path}'")]
    NotFound { path: PathBuf },

    /// The stream directory contains no `.jpg` pictures.
    #[error("no .jpg found inside '{path}'")]
    EmptyStream { path: PathBuf },

    /// A filename does not match the stream picture grammar.
    #[error("filename '{filename}' does not match the stream picture grammar")]
    Parse { filename: String },

    /// Pictures from more than one stream share the directory.
    #[error("pictures not from stream '{expected}': {}", .files.join(", "))]
    InconsistentStream {
        expected: String,
        files: Vec<String>,
    },

    /// Invalid delay distribution specification.
    #[error("invalid delay distribution '{spec}': {reason}")]
    Config { spec: String, reason: String },

    /// The materialization target directory already exists.
    #[error("target directory '{path}' already exists")]
    AlreadyExists { path: PathBuf },

    /// Filesystem failure naming the path it happened on.
    #[error("i/o failure on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StreamError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StreamError::Io {
            path: path.into(),
            source,
        }
    }
}
