//! Error types for catalog loading, saving and image handling

use std::path::{Path, PathBuf};

/// Error raised by catalog operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Input rejected before any state change (missing description, missing image)
    Validation(String),
    /// Uploaded bytes are not a decodable image
    ImageDecode(String),
    /// Catalog file exists but cannot be read or parsed
    StorageRead { path: PathBuf, message: String },
    /// Catalog file or image directory cannot be written
    StorageWrite { path: PathBuf, message: String },
    /// The largest seq in the catalog is `u64::MAX`; no new item can be numbered
    SequenceExhausted,
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn read(path: &Path, err: impl std::fmt::Display) -> Self {
        CatalogError::StorageRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        CatalogError::StorageWrite {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Whether the error left on-disk state untouched and the user can retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_) | CatalogError::ImageDecode(_)
        )
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Validation(message) => write!(f, "{}", message),
            CatalogError::ImageDecode(message) => {
                write!(f, "uploaded file is not a readable image: {}", message)
            }
            CatalogError::StorageRead { path, message } => {
                write!(f, "failed to read catalog '{}': {}", path.display(), message)
            }
            CatalogError::StorageWrite { path, message } => {
                write!(f, "failed to write '{}': {}", path.display(), message)
            }
            CatalogError::SequenceExhausted => {
                write!(f, "no sequence number left after {}", u64::MAX)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// A source row whose sequence cell could not be parsed
///
/// Never propagated past the loader: the row is dropped and the error logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceParseError {
    /// 1-based data row number in the selected sheet
    pub row: usize,
    /// Raw cell text
    pub raw: String,
}

impl std::fmt::Display for SequenceParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.raw.is_empty() {
            write!(f, "row {}: sequence cell is empty", self.row)
        } else {
            write!(f, "row {}: '{}' is not a valid sequence number", self.row, self.raw)
        }
    }
}

impl std::error::Error for SequenceParseError {}
