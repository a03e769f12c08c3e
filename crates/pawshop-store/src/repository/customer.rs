//! # Customer Repository
//!
//! CRUD for the customer register. No relational enforcement: deleting a
//! customer leaves any denormalized name on historical sales untouched,
//! which is the intended behavior for receipts.

use tracing::debug;
use uuid::Uuid;

use pawshop_core::types::Customer;
use pawshop_core::validation::{validate_name, validate_phone};

use crate::error::{StoreError, StoreResult};
use crate::store::{keys, Store};

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    store: Store,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(store: Store) -> Self {
        CustomerRepository { store }
    }

    /// Returns all customers.
    pub fn all(&self) -> Vec<Customer> {
        self.store.load_customers()
    }

    /// Gets a customer by id.
    pub fn get(&self, id: &str) -> Option<Customer> {
        self.all().into_iter().find(|c| c.id == id)
    }

    /// Inserts or updates a customer. Name and phone are required.
    pub fn upsert(&self, customer: Customer) -> StoreResult<()> {
        validate_name("name", &customer.name)?;
        validate_phone(&customer.phone)?;

        let mut customers = self.all();
        debug!(id = %customer.id, "Saving customer");
        match customers.iter().position(|c| c.id == customer.id) {
            Some(pos) => customers[pos] = customer,
            None => customers.insert(0, customer),
        }
        self.store.save(keys::CUSTOMERS, &customers)
    }

    /// Removes a customer. Historical sales keep their denormalized name.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut customers = self.all();
        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            return Err(StoreError::not_found("Customer", id));
        }

        debug!(id, "Customer deleted");
        self.store.save(keys::CUSTOMERS, &customers)
    }
}

/// Generates a new customer id.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
