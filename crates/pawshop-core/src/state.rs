//! # Shop State
//!
//! The explicit, whole-of-shop state the transaction engine operates on.
//!
//! ## Why an explicit state object?
//! The checkout and cancel operations take a `ShopState` by reference and
//! return the next one. There is no global mutable store anywhere in this
//! crate: persistence is the caller's job (see `pawshop-store`), which makes
//! every engine path unit-testable with plain values.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     State Flow on Finalize                              │
//! │                                                                         │
//! │  store.load() ──► ShopState ──► finalize_sale(&state, &draft, now)     │
//! │                                      │                                  │
//! │                         ┌────────────┴────────────┐                     │
//! │                         ▼                         ▼                     │
//! │                  CheckoutOutcome            CoreError                   │
//! │                  { state', sale }        (state untouched)              │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                  store.save(state')                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{PaymentMethod, Product, Sale};
use crate::SALE_NUMBER_WIDTH;

// =============================================================================
// Shop State
// =============================================================================

/// Everything the transaction engine reads or writes.
///
/// Customers, company info and credentials are persisted too, but the engine
/// never touches them, so they stay out of this struct (finalize receives
/// the customer reference already resolved by the caller).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopState {
    /// The catalog. Stock levels live here.
    pub products: Vec<Product>,

    /// Sales history, newest first (new sales are prepended).
    pub sales: Vec<Sale>,

    /// Payment-method configuration. Read-only for the engine: finalize
    /// reads the live fee rate, never writes.
    pub payment_methods: Vec<PaymentMethod>,

    /// Monotonically increasing counter for the next sale code.
    pub next_sale_number: u64,
}

impl ShopState {
    /// Fresh state with the default payment methods and an empty catalog.
    pub fn new() -> Self {
        ShopState {
            products: Vec::new(),
            sales: Vec::new(),
            payment_methods: default_payment_methods(),
            next_sale_number: 1,
        }
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product by barcode.
    pub fn product_by_code(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.code == code)
    }

    /// Looks up a sale by its code.
    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Looks up a payment method by id.
    pub fn payment_method(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.id == id)
    }

    /// The code the next new sale will receive, e.g. "000042".
    pub fn peek_sale_code(&self) -> String {
        format_sale_code(self.next_sale_number)
    }
}

impl Default for ShopState {
    fn default() -> Self {
        ShopState::new()
    }
}

/// Formats a sale number as the zero-padded sale code.
///
/// ## Example
/// ```rust
/// use pawshop_core::state::format_sale_code;
///
/// assert_eq!(format_sale_code(1), "000001");
/// assert_eq!(format_sale_code(123), "000123");
/// ```
pub fn format_sale_code(number: u64) -> String {
    format!("{:0width$}", number, width = SALE_NUMBER_WIDTH)
}

/// The payment methods a fresh shop starts with.
pub fn default_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "p1".to_string(),
            name: "Dinheiro".to_string(),
            icon: "💵".to_string(),
            fee_bps: 0,
        },
        PaymentMethod {
            id: "p2".to_string(),
            name: "Cartão de Débito".to_string(),
            icon: "💳".to_string(),
            fee_bps: 190,
        },
        PaymentMethod {
            id: "p3".to_string(),
            name: "Cartão de Crédito".to_string(),
            icon: "💳".to_string(),
            fee_bps: 350,
        },
        PaymentMethod {
            id: "p4".to_string(),
            name: "Pix".to_string(),
            icon: "📱".to_string(),
            fee_bps: 0,
        },
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
