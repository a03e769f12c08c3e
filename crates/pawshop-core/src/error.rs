//! # Error Types
//!
//! Domain-specific error types for pawshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pawshop-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pawshop-store errors (separate crate)                                 │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  Register app errors                                                   │
//! │  └── ShellError       - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ShellError → screen  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product code, sale id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every mutating operation validates fully BEFORE mutating anything, so
//!    an `Err` always means "state untouched"

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Barcode scan misses the catalog
    /// - Product id was deleted between screens
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete a sale.
    ///
    /// ## When This Occurs
    /// - Trying to sell more than available stock of a non-service product
    /// - For edits, availability first counts back the quantity the sale
    ///   being replaced had already taken
    ///
    /// ## User Workflow
    /// ```text
    /// Finalize (RAC-KG × 6.0)
    ///      │
    ///      ▼
    /// Check stock: available = 4.5
    ///      │
    ///      ▼
    /// InsufficientStock { code: "RAC-KG", available: 4.5, requested: 6.0 }
    ///      │
    ///      ▼
    /// Register shows: "Estoque insuficiente"
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: f64,
        requested: f64,
    },

    /// Sale not found (edit or cancel of an unknown sale code).
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Finalize was requested with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Tendered payments do not cover the sale total.
    ///
    /// ## When This Occurs
    /// Sum of tenders is more than one centavo below the total. The sale is
    /// NOT committed and no stock moves.
    #[error("Insufficient payment: paid {paid_cents} of {total_cents} centavos")]
    InsufficientPayment { paid_cents: i64, total_cents: i64 },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: f64, max: f64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed amount, fractional unit quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
