//! # pawshop-core: Pure Business Logic for Pawshop POS
//!
//! This crate is the **heart** of Pawshop POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pawshop POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Register App (apps/register)                   │   │
//! │  │    Scan ──► Cart ──► Tender ──► Receipt ──► History/Reports    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command handlers                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pawshop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ checkout  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ finalize  │  │   │
//! │  │   │   Sale    │  │  FeeRate  │  │ CartItem  │  │  cancel   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  report   │  │  receipt  │  │   auth    │  │ validation│  │   │
//! │  │   │  revenue  │  │ rendering │  │  login    │  │   rules   │  │   │
//! │  │   │ COGS/fees │  │  printer  │  │  check    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pawshop-store (Persistence Layer)              │   │
//! │  │        string-keyed JSON collections, backup, seed data         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, PaymentMethod, Customer, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - In-progress cart: merge lines, price overrides, bulk weight
//! - [`state`] - The explicit shop state the checkout engine operates on
//! - [`checkout`] - Finalize/edit/cancel sales and reconcile stock
//! - [`report`] - Revenue, COGS and fee-allocated profit reporting
//! - [`receipt`] - Plain-text receipt projection and the print surface
//! - [`auth`] - Credential matching for the login gate
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Storage, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit State**: Checkout and cancel take a [`state::ShopState`] and
//!    return the next one; nothing in this crate mutates a global store
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pawshop_core::money::Money;
//! use pawshop_core::types::FeeRate;
//!
//! // Create money from centavos (never from floats!)
//! let price = Money::from_cents(1850); // R$ 18.50
//!
//! // Card fees are basis points: 3.5% = 350 bps
//! let fee_rate = FeeRate::from_bps(350);
//! let fee = price.calculate_fee(fee_rate);
//!
//! // Fee on R$ 18.50 at 3.5% = R$ 0.65 (rounded)
//! assert_eq!(fee.cents(), 65);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pawshop_core::Money` instead of
// `use pawshop_core::money::Money`

pub use cart::Cart;
pub use checkout::{cancel_sale, finalize_sale, CheckoutOutcome, SaleDraft, Tender};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{build_report, FinancialReport, ReportFilter};
pub use state::ShopState;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category name reserved for services (banho, tosa, consulta...).
///
/// ## Why a constant?
/// Services have infinite effective stock: finalizing or cancelling a sale
/// never touches the stock of a product in this category. The category is
/// matched by name because that is the identity the catalog uses for it.
pub const SERVICES_CATEGORY: &str = "Serviços";

/// Sentinel payment-method label used when a tender references a method id
/// that no longer exists (e.g. the method was removed in settings while the
/// checkout was open). Carries a 0% fee and never fails the sale.
pub const FALLBACK_METHOD_NAME: &str = "Outro";

/// Tolerance, in centavos, when checking payment sufficiency.
///
/// ## Business Reason
/// The register historically accepted payments within 0.01 of the total; in
/// integer money that is exactly one centavo. A customer one centavo short
/// does not block the queue.
pub const PAYMENT_EPSILON_CENTS: i64 = 1;

/// Width of the zero-padded sequential sale code ("000001").
pub const SALE_NUMBER_WIDTH: usize = 6;

/// Comparison slack for f64 quantities (weights).
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line (units or kilograms).
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: f64 = 999.0;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Catalog categories offered by default. "Todos" is a UI filter value, not
/// a category, so it is not listed here.
pub const DEFAULT_CATEGORIES: &[&str] =
    &["Ração", "Acessórios", "Higiene", "Saúde", SERVICES_CATEGORY];
