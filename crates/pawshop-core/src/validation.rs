//! # Validation Module
//!
//! Input validation utilities for Pawshop POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register shell (argument parsing)                            │
//! │  ├── Basic format checks (numbers parse, fields present)               │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout engine invariants                                   │
//! │  ├── Payment sufficiency                                               │
//! │  └── Stock availability                                                │
//! │                                                                         │
//! │  Defense in depth: validation failures abort BEFORE any mutation       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::UnitType;
use crate::{MAX_ITEM_QUANTITY, MIN_PASSWORD_LEN, QUANTITY_EPSILON};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code (barcode / SKU).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use pawshop_core::validation::validate_product_code;
///
/// assert!(validate_product_code("RAC-KG").is_ok());
/// assert!(validate_product_code("").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product or customer name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer phone (required contact field).
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    Ok(())
}

/// Validates a registration password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LEN`] characters
/// - Confirmation must match exactly
pub fn validate_password(password: &str, confirmation: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if password != confirmation {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "confirmation does not match".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity for a given unit type.
///
/// ## Rules
/// - Must be positive
/// - Must not exceed MAX_ITEM_QUANTITY (999 units or kilos)
/// - `un` products only take whole quantities; fractions belong to `kg`
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Operator enters quantity: 2.5 for a closed-bag (un) product           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2.5, Un) ← THIS FUNCTION                            │
/// │       │                                                                 │
/// │       └── Error: "quantity has invalid format: ..."                     │
/// │                                                                         │
/// │  Weighed products (kg) accept 2.5 without complaint.                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(quantity: f64, unit_type: UnitType) -> ValidationResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    if !unit_type.is_weighed() && (quantity - quantity.round()).abs() > QUANTITY_EPSILON {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "unit products are sold in whole quantities".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in centavos.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (courtesy items)
///
/// ## Example
/// ```rust
/// use pawshop_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1850).is_ok());  // R$ 18.50
/// assert!(validate_price_cents(0).is_ok());     // courtesy
/// assert!(validate_price_cents(-100).is_err()); // invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount in centavos.
///
/// ## Rules
/// - Must be positive (> 0); zero or negative tenders are typos
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a payment-method fee rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Real merchant rates are 0-500 (0% to 5%)
pub fn validate_fee_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "fee".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("RAC-KG").is_ok());
        assert!(validate_product_code("SRV001").is_ok());
        assert!(validate_product_code("produto_1").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Ração Golden Adulto").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0, UnitType::Un).is_ok());
        assert!(validate_quantity(999.0, UnitType::Un).is_ok());
        assert!(validate_quantity(0.25, UnitType::Kg).is_ok());

        assert!(validate_quantity(0.0, UnitType::Un).is_err());
        assert!(validate_quantity(-1.0, UnitType::Kg).is_err());
        assert!(validate_quantity(1000.0, UnitType::Un).is_err());
        assert!(validate_quantity(f64::NAN, UnitType::Kg).is_err());

        // Fractional quantities only make sense for weighed products
        assert!(validate_quantity(2.5, UnitType::Un).is_err());
        assert!(validate_quantity(2.5, UnitType::Kg).is_ok());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1850).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(100).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-100).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("1234", "1234").is_ok());
        assert!(validate_password("123", "123").is_err());
        assert!(validate_password("1234", "4321").is_err());
    }

    #[test]
    fn test_validate_fee_bps() {
        assert!(validate_fee_bps(0).is_ok());
        assert!(validate_fee_bps(350).is_ok());
        assert!(validate_fee_bps(10000).is_ok());
        assert!(validate_fee_bps(10001).is_err());
    }
}
