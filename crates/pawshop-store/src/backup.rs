//! # Backup
//!
//! Whole-state export and restore as a single JSON document.
//!
//! ## Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EXPORT: snapshot of every business collection + the sale counter       │
//! │          (credentials and the login session are NOT exported)           │
//! │                                                                         │
//! │  IMPORT: full overwrite, no merge. Whatever was in the store before    │
//! │          is gone. The caller gates this behind a confirmation.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A field missing from the document restores as that collection's empty
//! default rather than failing - older backups stay importable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use pawshop_core::state::default_payment_methods;
use pawshop_core::types::{CompanyInfo, Customer, PaymentMethod, Product, Sale};

use crate::error::{StoreError, StoreResult};
use crate::store::{keys, Store};

/// The single-document backup format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default = "default_payment_methods")]
    pub payments: Vec<PaymentMethod>,
    #[serde(default)]
    pub company: CompanyInfo,
    #[serde(default = "default_next_sale_number")]
    pub next_sale_number: u64,
    /// When the backup was taken.
    pub date: DateTime<Utc>,
}

fn default_next_sale_number() -> u64 {
    1
}

/// Serializes the whole persisted state to one JSON document.
pub fn export_backup(store: &Store, now: DateTime<Utc>) -> StoreResult<String> {
    let document = BackupDocument {
        products: store.products().all(),
        sales: store.sales().all(),
        customers: store.customers().all(),
        payments: store.settings().payment_methods(),
        company: store.settings().company(),
        next_sale_number: store.sales().next_sale_number(),
        date: now,
    };

    info!(
        products = document.products.len(),
        sales = document.sales.len(),
        "Backup exported"
    );
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Restores a backup document wholesale, overwriting every collection.
///
/// Unconditional once called - the "this will erase current data"
/// confirmation belongs to the caller.
pub fn import_backup(store: &Store, raw: &str) -> StoreResult<BackupDocument> {
    let document: BackupDocument =
        serde_json::from_str(raw).map_err(|e| StoreError::InvalidBackup(e.to_string()))?;

    store.save(keys::PRODUCTS, &document.products)?;
    store.save(keys::SALES, &document.sales)?;
    store.save(keys::CUSTOMERS, &document.customers)?;
    store.save(keys::PAYMENT_METHODS, &document.payments)?;
    store.save(keys::COMPANY, &document.company)?;
    store.save(keys::NEXT_SALE_NUMBER, &document.next_sale_number)?;

    info!(
        products = document.products.len(),
        sales = document.sales.len(),
        date = %document.date,
        "Backup restored (full overwrite)"
    );
    Ok(document)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pawshop_core::types::UnitType;

    fn sample_product() -> Product {
        Product {
            id: "1".to_string(),
            code: "RAC-KG".to_string(),
            name: "Ração Granel".to_string(),
            category: "Ração".to_string(),
            subgroup: None,
            cost_price_cents: 1200,
            price_cents: 1850,
            stock: 50.0,
            unit_type: UnitType::Kg,
            color: None,
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = Store::in_memory();
        source.products().upsert(sample_product()).unwrap();
        source.sales().set_next_sale_number(42).unwrap();

        let json = export_backup(&source, Utc::now()).unwrap();

        let target = Store::in_memory();
        // target has unrelated data that must be overwritten
        let mut other = sample_product();
        other.id = "other".to_string();
        other.code = "OTHER".to_string();
        target.products().upsert(other).unwrap();

        let document = import_backup(&target, &json).unwrap();
        assert_eq!(document.products.len(), 1);

        let products = target.products().all();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].code, "RAC-KG");
        assert_eq!(target.sales().next_sale_number(), 42);
    }

    #[test]
    fn test_import_rejects_malformed_document() {
        let store = Store::in_memory();
        let err = import_backup(&store, "{ nope").unwrap_err();
        assert!(matches!(err, StoreError::InvalidBackup(_)));
        // nothing was written
        assert!(store.products().all().is_empty());
    }

    #[test]
    fn test_import_tolerates_missing_collections() {
        let store = Store::in_memory();
        let json = r#"{"products": [], "date": "2026-03-14T12:00:00Z"}"#;

        let document = import_backup(&store, json).unwrap();
        assert!(document.sales.is_empty());
        assert_eq!(document.next_sale_number, 1);
        assert_eq!(document.payments.len(), 4);
    }
}
