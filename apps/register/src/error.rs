//! # Shell Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pawshop Register                       │
//! │                                                                         │
//! │  Operator input                 Command handler                         │
//! │  ──────────────                 ───────────────                         │
//! │                                                                         │
//! │  "finalize"                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Result<String, ShellError>                                             │
//! │      │                                                                  │
//! │      ├── CoreError::InsufficientPayment ──► [PAYMENT_ERROR] ...         │
//! │      ├── StoreError::NotFound ───────────► [NOT_FOUND] ...              │
//! │      └── Ok(receipt text) ───────────────► printed to the operator     │
//! │                                                                         │
//! │  Every command validates before mutating, so an error line on screen   │
//! │  always means the store is exactly as it was.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use pawshop_core::receipt::PrintError;
use pawshop_core::{CoreError, ValidationError};
use pawshop_store::StoreError;

/// Error surfaced to the operator by a command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Persistence operation failed
    StorageError,

    /// Business logic error
    BusinessLogic,

    /// Insufficient stock
    InsufficientStock,

    /// Payment gating error
    PaymentError,

    /// Login required or credentials rejected
    AuthError,

    /// Printing failed
    PrinterError,

    /// Anything else
    Internal,
}

impl ShellError {
    /// Creates a new shell error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ShellError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ShellError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ShellError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        ShellError::new(ErrorCode::AuthError, message)
    }

    /// Creates a usage error (bad command arguments).
    pub fn usage(message: impl Into<String>) -> Self {
        ShellError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts core errors to shell errors.
impl From<CoreError> for ShellError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::SaleNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InsufficientPayment { .. } => ErrorCode::PaymentError,
            CoreError::EmptyCart
            | CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. } => ErrorCode::BusinessLogic,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ShellError::new(code, err.to_string())
    }
}

/// Converts validation errors to shell errors.
impl From<ValidationError> for ShellError {
    fn from(err: ValidationError) -> Self {
        ShellError::validation(err.to_string())
    }
}

/// Converts store errors to shell errors.
impl From<StoreError> for ShellError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ShellError::not_found(&entity, &id),
            StoreError::Io(e) => {
                // Log the actual error but return a concise message
                tracing::error!("Storage I/O failed: {}", e);
                ShellError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StoreError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                ShellError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            // Duplicate, InvalidBackup, Validation: the message is already
            // operator-facing
            other => ShellError::new(ErrorCode::ValidationError, other.to_string()),
        }
    }
}

/// Converts print errors to shell errors.
impl From<PrintError> for ShellError {
    fn from(err: PrintError) -> Self {
        ShellError::new(ErrorCode::PrinterError, err.to_string())
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ShellError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ShellError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err: ShellError = CoreError::InsufficientPayment {
            paid_cents: 100,
            total_cents: 200,
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err: ShellError = CoreError::ProductNotFound("x".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: x");
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ShellError = StoreError::not_found("Sale", "000001").into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ShellError = StoreError::duplicate("code", "RAC-KG").into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_error_serializes_with_screaming_code() {
        let err = ShellError::not_found("Sale", "000001");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"NOT_FOUND\""));
        assert!(json.contains("Sale not found"));
    }
}
