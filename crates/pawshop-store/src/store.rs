//! # Store
//!
//! Typed access to the persisted collections, layered on a
//! [`StorageBackend`].
//!
//! ## Corruption Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               load path (get + deserialize)                             │
//! │                                                                         │
//! │   key absent ───────────────► collection default                       │
//! │   JSON malformed ───────────► warn!() + collection default             │
//! │   backend I/O error ────────► warn!() + collection default             │
//! │                                                                         │
//! │   Loading NEVER crashes the register. Write errors, by contrast, are   │
//! │   surfaced: silently dropping a committed sale is not acceptable.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use pawshop_core::state::{default_payment_methods, ShopState};
use pawshop_core::types::{CompanyInfo, Credential, Customer, PaymentMethod, Product, Sale};

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::StoreResult;
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::settings::SettingsRepository;

// =============================================================================
// Storage Keys
// =============================================================================

/// The string keys the shop persists under. One key = one JSON document.
pub mod keys {
    pub const PRODUCTS: &str = "pawshop_products";
    pub const SALES: &str = "pawshop_sales";
    pub const CUSTOMERS: &str = "pawshop_customers";
    pub const PAYMENT_METHODS: &str = "pawshop_payments";
    pub const COMPANY: &str = "pawshop_company";
    pub const USERS: &str = "pawshop_users";
    pub const NEXT_SALE_NUMBER: &str = "pawshop_next_sale_number";
    pub const SESSION: &str = "pawshop_session";
}

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,no_run
/// use pawshop_store::{Store, StoreConfig};
///
/// # fn main() -> Result<(), pawshop_store::StoreError> {
/// let store = Store::open(StoreConfig::new("./pawshop-data"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory the `<key>.json` documents live in.
    pub data_dir: std::path::PathBuf,
}

impl StoreConfig {
    /// Creates a configuration pointing at the given data directory.
    pub fn new(data_dir: impl Into<std::path::PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main persistence handle providing typed load/save and repository access.
///
/// Cheap to clone: repositories share the backend through an `Arc`.
#[derive(Debug, Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
}

impl Store {
    /// Opens a file-backed store rooted at the configured data directory.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(dir = %config.data_dir.display(), "Opening store");
        let backend = FileBackend::open(config.data_dir)?;
        Ok(Store {
            backend: Arc::new(backend),
        })
    }

    /// An isolated in-memory store (tests, dry runs).
    pub fn in_memory() -> Self {
        Store {
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    /// Wraps an externally built backend.
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Store { backend }
    }

    // -------------------------------------------------------------------------
    // Raw typed access
    // -------------------------------------------------------------------------

    /// Loads `key`, falling back to the given default on absence, corruption
    /// or backend failure. Bad storage never crashes the register.
    pub fn load_with<T, F>(&self, key: &str, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.backend.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "Malformed stored document, using default");
                    fallback()
                }
            },
            Ok(None) => fallback(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored document, using default");
                fallback()
            }
        }
    }

    /// [`Store::load_with`] using `T::default()` as the fallback.
    pub fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load_with(key, T::default)
    }

    /// Serializes `value` and replaces the document stored under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    /// Removes the document stored under `key`.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.backend.remove(key)
    }

    // -------------------------------------------------------------------------
    // Whole shop state (the checkout engine's unit of work)
    // -------------------------------------------------------------------------

    /// Loads everything the transaction engine reads: catalog, sales,
    /// payment methods and the sale-number counter.
    pub fn load_shop_state(&self) -> ShopState {
        ShopState {
            products: self.load_or_default::<Vec<Product>>(keys::PRODUCTS),
            sales: self.load_or_default::<Vec<Sale>>(keys::SALES),
            payment_methods: self
                .load_with::<Vec<PaymentMethod>, _>(keys::PAYMENT_METHODS, default_payment_methods),
            next_sale_number: self.load_with(keys::NEXT_SALE_NUMBER, || 1),
        }
    }

    /// Persists a whole shop state, the commit half of finalize/cancel.
    pub fn save_shop_state(&self, state: &ShopState) -> StoreResult<()> {
        self.save(keys::PRODUCTS, &state.products)?;
        self.save(keys::SALES, &state.sales)?;
        self.save(keys::PAYMENT_METHODS, &state.payment_methods)?;
        self.save(keys::NEXT_SALE_NUMBER, &state.next_sale_number)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Collection shortcuts used by repositories and backup
    // -------------------------------------------------------------------------

    /// Loads the customer collection.
    pub fn load_customers(&self) -> Vec<Customer> {
        self.load_or_default(keys::CUSTOMERS)
    }

    /// Loads the company info (defaults on first run).
    pub fn load_company(&self) -> CompanyInfo {
        self.load_with(keys::COMPANY, CompanyInfo::default)
    }

    /// Loads the credential list.
    pub fn load_users(&self) -> Vec<Credential> {
        self.load_or_default(keys::USERS)
    }

    /// Returns the persisted session username, if an operator is logged in.
    pub fn load_session(&self) -> Option<String> {
        self.load_or_default(keys::SESSION)
    }

    /// Persists the session username.
    pub fn save_session(&self, username: &str) -> StoreResult<()> {
        self.save(keys::SESSION, &username)
    }

    /// Clears the session (logout).
    pub fn clear_session(&self) -> StoreResult<()> {
        self.remove(keys::SESSION)
    }

    // -------------------------------------------------------------------------
    // Repositories
    // -------------------------------------------------------------------------

    /// Returns the product repository.
    ///
    /// ## Example
    /// ```rust
    /// use pawshop_store::Store;
    ///
    /// let store = Store::in_memory();
    /// let products = store.products().all();
    /// assert!(products.is_empty());
    /// ```
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.clone())
    }

    /// Returns the settings repository (payment methods, company info,
    /// credentials).
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_default_on_missing_key() {
        let store = Store::in_memory();
        let products: Vec<Product> = store.load_or_default(keys::PRODUCTS);
        assert!(products.is_empty());
    }

    #[test]
    fn test_corrupt_document_falls_back_to_default() {
        let store = Store::in_memory();
        store
            .save(keys::PRODUCTS, &"not a product list")
            .unwrap();

        let products: Vec<Product> = store.load_or_default(keys::PRODUCTS);
        assert!(products.is_empty());
    }

    #[test]
    fn test_fresh_state_has_default_payment_methods() {
        let store = Store::in_memory();
        let state = store.load_shop_state();

        assert_eq!(state.payment_methods.len(), 4);
        assert_eq!(state.next_sale_number, 1);
        assert!(state.products.is_empty());
        assert!(state.sales.is_empty());
    }

    #[test]
    fn test_shop_state_round_trip() {
        let store = Store::in_memory();
        let mut state = store.load_shop_state();
        state.next_sale_number = 42;
        state.payment_methods[0].fee_bps = 10;

        store.save_shop_state(&state).unwrap();
        let reloaded = store.load_shop_state();

        assert_eq!(reloaded.next_sale_number, 42);
        assert_eq!(reloaded.payment_methods[0].fee_bps, 10);
    }

    #[test]
    fn test_corrupt_payment_methods_fall_back_to_seeded_set() {
        let store = Store::in_memory();
        store.save(keys::PAYMENT_METHODS, &12345).unwrap();

        let state = store.load_shop_state();
        assert_eq!(state.payment_methods.len(), 4);
        assert_eq!(state.payment_methods[0].name, "Dinheiro");
    }

    #[test]
    fn test_session_round_trip() {
        let store = Store::in_memory();
        assert_eq!(store.load_session(), None);

        store.save_session("admin").unwrap();
        assert_eq!(store.load_session().as_deref(), Some("admin"));

        store.clear_session().unwrap();
        assert_eq!(store.load_session(), None);
    }

    #[test]
    fn test_company_defaults_on_first_run() {
        let store = Store::in_memory();
        let company = store.load_company();
        assert_eq!(company.name, "Pawshop Pet");
    }
}
