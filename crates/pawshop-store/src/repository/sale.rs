//! # Sale Repository
//!
//! Persistence for the sales history and the sale-number counter.
//!
//! ## Who Writes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Persistence                                 │
//! │                                                                         │
//! │  finalize / cancel (pawshop-core::checkout)                            │
//! │      └── produces the next ShopState                                   │
//! │            └── Store::save_shop_state() writes sales + stock + counter │
//! │                                                                         │
//! │  THIS REPOSITORY serves the read side (history screen, reprints) and   │
//! │  the raw collection writes backup/import needs.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use tracing::debug;

use pawshop_core::types::Sale;

use crate::error::StoreResult;
use crate::store::{keys, Store};

/// Repository for sale history operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    store: Store,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(store: Store) -> Self {
        SaleRepository { store }
    }

    /// Returns the whole history, newest first (storage order).
    pub fn all(&self) -> Vec<Sale> {
        self.store.load_or_default(keys::SALES)
    }

    /// Gets a sale by its code.
    pub fn get(&self, id: &str) -> Option<Sale> {
        self.all().into_iter().find(|s| s.id == id)
    }

    /// Sales whose timestamp falls on the given UTC calendar day.
    pub fn on_day(&self, day: NaiveDate) -> Vec<Sale> {
        self.all()
            .into_iter()
            .filter(|s| s.timestamp.date_naive() == day)
            .collect()
    }

    /// History filtered by sale code or customer name fragment.
    pub fn search(&self, query: &str) -> Vec<Sale> {
        let query = query.to_lowercase();
        self.all()
            .into_iter()
            .filter(|s| {
                s.id.to_lowercase().contains(&query)
                    || s.customer_name
                        .as_deref()
                        .map(|n| n.to_lowercase().contains(&query))
                        .unwrap_or(false)
            })
            .collect()
    }

    /// Replaces the whole history (backup import path).
    pub fn save_all(&self, sales: &[Sale]) -> StoreResult<()> {
        debug!(count = sales.len(), "Replacing sales history");
        self.store.save(keys::SALES, &sales)
    }

    /// The number the next new sale will take.
    pub fn next_sale_number(&self) -> u64 {
        self.store.load_with(keys::NEXT_SALE_NUMBER, || 1)
    }

    /// Sets the counter (backup import path).
    pub fn set_next_sale_number(&self, number: u64) -> StoreResult<()> {
        self.store.save(keys::NEXT_SALE_NUMBER, &number)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pawshop_core::types::PaymentEntry;

    fn sale(id: &str, day: u32, customer: Option<&str>) -> Sale {
        Sale {
            id: id.to_string(),
            items: vec![],
            total_cents: 1000,
            change_cents: 0,
            timestamp: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            payments: vec![PaymentEntry {
                method: "Pix".to_string(),
                amount_cents: 1000,
                fee_cents: 0,
            }],
            customer_id: customer.map(|_| "c1".to_string()),
            customer_name: customer.map(str::to_string),
        }
    }

    #[test]
    fn test_history_round_trip_and_lookup() {
        let store = Store::in_memory();
        let repo = store.sales();

        repo.save_all(&[sale("000002", 11, None), sale("000001", 10, None)])
            .unwrap();

        assert_eq!(repo.all().len(), 2);
        assert_eq!(repo.get("000001").unwrap().total_cents, 1000);
        assert!(repo.get("999999").is_none());
    }

    #[test]
    fn test_on_day_filter() {
        let store = Store::in_memory();
        let repo = store.sales();
        repo.save_all(&[
            sale("000003", 12, None),
            sale("000002", 11, None),
            sale("000001", 11, None),
        ])
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        let found = repo.on_day(day);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_search_by_code_and_customer() {
        let store = Store::in_memory();
        let repo = store.sales();
        repo.save_all(&[
            sale("000001", 10, Some("Maria")),
            sale("000002", 10, None),
        ])
        .unwrap();

        assert_eq!(repo.search("000002").len(), 1);
        assert_eq!(repo.search("maria").len(), 1);
        assert_eq!(repo.search("000").len(), 2);
    }

    #[test]
    fn test_counter_round_trip() {
        let store = Store::in_memory();
        let repo = store.sales();

        assert_eq!(repo.next_sale_number(), 1);
        repo.set_next_sale_number(42).unwrap();
        assert_eq!(repo.next_sale_number(), 42);
    }
}
