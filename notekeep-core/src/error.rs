//! Error types for Notekeep

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Notekeep error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// Requested note does not exist or has been deleted
    #[error("note not found")]
    NotFound,

    /// Live note count has reached the configured ceiling
    #[error("maximum number of notes reached: {max}")]
    CapacityExceeded { max: usize },

    /// A stored line could not be decoded
    #[error("data corruption: {0}")]
    Corruption(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if the error is correctable by the caller (as opposed to an
    /// internal failure the caller should treat as opaque)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound | StoreError::CapacityExceeded { .. }
        )
    }

    /// Check if error indicates corruption
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corruption(_))
    }
}
