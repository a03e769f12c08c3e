//! # Product Repository
//!
//! Catalog operations for the inventory screen.
//!
//! Stock mutations from sales do NOT come through here - the checkout
//! engine computes the next shop state and `Store::save_shop_state`
//! persists it. This repository covers catalog CRUD and manual stock
//! adjustments.

use tracing::debug;
use uuid::Uuid;

use pawshop_core::types::Product;
use pawshop_core::validation::{validate_name, validate_price_cents, validate_product_code};

use crate::error::{StoreError, StoreResult};
use crate::store::{keys, Store};

/// Repository for catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(store: Store) -> Self {
        ProductRepository { store }
    }

    /// Returns the whole catalog.
    pub fn all(&self) -> Vec<Product> {
        self.store.load_or_default(keys::PRODUCTS)
    }

    /// Gets a product by id.
    pub fn get(&self, id: &str) -> Option<Product> {
        self.all().into_iter().find(|p| p.id == id)
    }

    /// Finds a product by barcode (scanner path).
    pub fn find_by_code(&self, code: &str) -> Option<Product> {
        self.all().into_iter().find(|p| p.code == code)
    }

    /// Case-insensitive search over name and code.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let query = query.to_lowercase();
        self.all()
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query) || p.code.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Inserts or updates a product.
    ///
    /// ## Behavior
    /// - Validates code, name and prices first
    /// - A new product may not reuse another product's barcode
    /// - Existing id: replaced in place; new id: prepended (newest first)
    pub fn upsert(&self, product: Product) -> StoreResult<()> {
        validate_product_code(&product.code)?;
        validate_name("name", &product.name)?;
        validate_price_cents(product.price_cents)?;
        validate_price_cents(product.cost_price_cents)?;

        let mut products = self.all();
        if products
            .iter()
            .any(|p| p.code == product.code && p.id != product.id)
        {
            return Err(StoreError::duplicate("code", &product.code));
        }

        debug!(id = %product.id, code = %product.code, "Saving product");
        match products.iter().position(|p| p.id == product.id) {
            Some(pos) => products[pos] = product,
            None => products.insert(0, product),
        }
        self.store.save(keys::PRODUCTS, &products)
    }

    /// Removes a product from the catalog.
    ///
    /// Historical sale lines keep their snapshots; they are unaffected.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut products = self.all();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StoreError::not_found("Product", id));
        }

        debug!(id, "Product deleted");
        self.store.save(keys::PRODUCTS, &products)
    }

    /// Sets a product's stock level outright (manual inventory adjustment).
    pub fn update_stock(&self, id: &str, stock: f64) -> StoreResult<()> {
        let mut products = self.all();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        debug!(id, stock, "Stock adjusted");
        product.stock = stock.max(0.0);
        self.store.save(keys::PRODUCTS, &products)
    }
}

/// Generates a new product id.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pawshop_core::types::UnitType;

    fn product(id: &str, code: &str) -> Product {
        Product {
            id: id.to_string(),
            code: code.to_string(),
            name: format!("Produto {}", id),
            category: "Acessórios".to_string(),
            subgroup: None,
            cost_price_cents: 1500,
            price_cents: 3500,
            stock: 10.0,
            unit_type: UnitType::Un,
            color: None,
        }
    }

    #[test]
    fn test_upsert_and_lookup() {
        let store = Store::in_memory();
        let repo = store.products();

        repo.upsert(product("1", "ACE001")).unwrap();
        repo.upsert(product("2", "HIG001")).unwrap();

        assert_eq!(repo.all().len(), 2);
        // newest first
        assert_eq!(repo.all()[0].id, "2");
        assert_eq!(repo.find_by_code("ACE001").unwrap().id, "1");
        assert!(repo.find_by_code("NOPE").is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = Store::in_memory();
        let repo = store.products();

        repo.upsert(product("1", "ACE001")).unwrap();
        let mut updated = product("1", "ACE001");
        updated.price_cents = 3990;
        repo.upsert(updated).unwrap();

        assert_eq!(repo.all().len(), 1);
        assert_eq!(repo.get("1").unwrap().price_cents, 3990);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let store = Store::in_memory();
        let repo = store.products();

        repo.upsert(product("1", "ACE001")).unwrap();
        let err = repo.upsert(product("2", "ACE001")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // the same code on the same id is just an update
        repo.upsert(product("1", "ACE001")).unwrap();
    }

    #[test]
    fn test_delete() {
        let store = Store::in_memory();
        let repo = store.products();

        repo.upsert(product("1", "ACE001")).unwrap();
        repo.delete("1").unwrap();
        assert!(repo.all().is_empty());

        assert!(matches!(
            repo.delete("1").unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_update_stock_floors_at_zero() {
        let store = Store::in_memory();
        let repo = store.products();

        repo.upsert(product("1", "ACE001")).unwrap();
        repo.update_stock("1", 4.5).unwrap();
        assert_eq!(repo.get("1").unwrap().stock, 4.5);

        repo.update_stock("1", -3.0).unwrap();
        assert_eq!(repo.get("1").unwrap().stock, 0.0);
    }

    #[test]
    fn test_search() {
        let store = Store::in_memory();
        let repo = store.products();

        let mut shampoo = product("1", "HIG001");
        shampoo.name = "Shampoo Neutro 500ml".to_string();
        repo.upsert(shampoo).unwrap();
        repo.upsert(product("2", "ACE001")).unwrap();

        assert_eq!(repo.search("shampoo").len(), 1);
        assert_eq!(repo.search("hig").len(), 1);
        assert_eq!(repo.search("").len(), 2);
    }
}
