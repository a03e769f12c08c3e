//! # pawshop-store: Persistence Layer for Pawshop POS
//!
//! This crate persists the shop's state as string-keyed JSON documents.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pawshop POS Data Flow                            │
//! │                                                                         │
//! │  Register command (finalize, save product, run backup)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pawshop-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │    Backup    │  │   │
//! │  │   │  (store.rs)   │    │ (product.rs)  │    │ (backup.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ typed load/   │◄───│ ProductRepo   │    │ one JSON doc │  │   │
//! │  │   │ save per key  │    │ SaleRepo ...  │    │ in/out       │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │           ▼                                                     │   │
//! │  │   ┌───────────────────────────────────────────────────────┐    │   │
//! │  │   │        StorageBackend (get/set/remove by key)         │    │   │
//! │  │   │   FileBackend: <data-dir>/<key>.json   MemoryBackend  │    │   │
//! │  │   └───────────────────────────────────────────────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - The `StorageBackend` trait and its file/memory impls
//! - [`store`] - Typed load/save, corruption fallback, repository access
//! - [`repository`] - Per-collection operations (product, sale, ...)
//! - [`backup`] - Whole-state export/import as a single JSON document
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pawshop_store::{Store, StoreConfig};
//!
//! # fn main() -> Result<(), pawshop_store::StoreError> {
//! let store = Store::open(StoreConfig::new("./pawshop-data"))?;
//!
//! // Whole-state path used by the checkout engine
//! let state = store.load_shop_state();
//!
//! // Collection paths used by the CRUD screens
//! let products = store.products().all();
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod backup;
pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use backup::{export_backup, import_backup, BackupDocument};
pub use error::{StoreError, StoreResult};
pub use store::{keys, Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;
