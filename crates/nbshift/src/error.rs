//! Error types for notebook conversion.

use std::path::PathBuf;

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Errors that can occur while reading, converting or writing notebooks.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The document's format version cannot be converted.
    #[error("Unsupported notebook format v{major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },

    /// A cell has a shape the converter cannot translate.
    #[error("Malformed cell: {0}")]
    MalformedCell(String),

    /// An output has a shape the converter cannot translate.
    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    /// The content has no faithful representation in the target version.
    #[error("Cannot represent in target format: {0}")]
    Unrepresentable(String),

    /// The document is not a notebook at all.
    #[error("Invalid notebook: {0}")]
    InvalidNotebook(String),

    /// Failed to read source file.
    #[error("Failed to read file {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    /// Failed to write output file.
    #[error("Failed to write file {path}: {message}")]
    WriteError { path: PathBuf, message: String },

    /// Failed to serialize/deserialize JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ConversionError {
    /// Shorthand for an unsupported `(major, minor)` pair.
    pub fn unsupported((major, minor): (u32, u32)) -> Self {
        Self::UnsupportedVersion { major, minor }
    }
}
