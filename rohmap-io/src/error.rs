use std::io;
use thiserror::Error;

use rohmap_core::errors::CallStoreError;

/// Error type for reading genotype tables.
#[derive(Error, Debug)]
pub enum GenotypeReadError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File ended before a header line was found.
    #[error("No header line found in {0}")]
    MissingHeader(String),

    /// Header lacks one of the required columns.
    #[error("Header in {file} is missing required column '{column}'")]
    MissingColumn { file: String, column: String },

    /// Data line has fewer fields than the header needs.
    #[error("Line {line} in {file} has {found} fields, expected at least {expected}")]
    ShortLine {
        file: String,
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("Line {line} in {file}: invalid position '{value}'")]
    InvalidPosition {
        file: String,
        line: usize,
        value: String,
    },

    #[error("Line {line} in {file}: invalid confidence '{value}'")]
    InvalidConfidence {
        file: String,
        line: usize,
        value: String,
    },

    #[error("Line {line} in {file}: {message}")]
    InvalidCall {
        file: String,
        line: usize,
        message: String,
    },

    /// Build comment names a genome build the length lookup does not know.
    #[error("Unrecognised genome build '{build}' in {file}")]
    UnknownBuild { file: String, build: String },

    #[error(transparent)]
    CallStore(#[from] CallStoreError),
}

/// Result type alias for rohmap-io operations.
pub type Result<T> = std::result::Result<T, GenotypeReadError>;
