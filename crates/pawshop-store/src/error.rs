//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ShellError (register app) ← What the operator sees                    │
//! │                                                                         │
//! │  NOTE: malformed JSON on the READ path is not an error at all - the    │
//! │  collection falls back to its default value (see store.rs). Serde      │
//! │  errors only surface from writes and backup imports.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in a collection.
    ///
    /// ## When This Occurs
    /// - Deleting or updating by an id that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique business-key violation.
    ///
    /// ## When This Occurs
    /// - Registering a product with a barcode another product already uses
    /// - Registering a username twice
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Filesystem operation failed (permissions, disk full, ...).
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed while WRITING a collection.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backup document could not be understood.
    #[error("Invalid backup document: {0}")]
    InvalidBackup(String),

    /// Input failed business-rule validation before reaching storage.
    #[error("Validation error: {0}")]
    Validation(#[from] pawshop_core::ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
