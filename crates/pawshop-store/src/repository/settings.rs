//! # Settings Repository
//!
//! Payment-method configuration, company identity and the credential list.
//!
//! Fee changes here only affect FUTURE sales: committed sales carry their
//! own fee snapshots and are never rewritten.

use tracing::{debug, info};
use uuid::Uuid;

use pawshop_core::state::default_payment_methods;
use pawshop_core::types::{CompanyInfo, Credential, PaymentMethod};
use pawshop_core::validation::{validate_fee_bps, validate_name, validate_password};

use crate::error::{StoreError, StoreResult};
use crate::store::{keys, Store};

/// Repository for configuration entities.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(store: Store) -> Self {
        SettingsRepository { store }
    }

    // -------------------------------------------------------------------------
    // Payment methods
    // -------------------------------------------------------------------------

    /// Returns the configured payment methods (seeded set on first run).
    pub fn payment_methods(&self) -> Vec<PaymentMethod> {
        self.store
            .load_with(keys::PAYMENT_METHODS, default_payment_methods)
    }

    /// Adds a payment method and returns it.
    pub fn add_payment_method(&self, name: &str, fee_bps: u32) -> StoreResult<PaymentMethod> {
        validate_name("name", name)?;
        validate_fee_bps(fee_bps)?;

        let method = PaymentMethod {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            icon: "💰".to_string(),
            fee_bps,
        };

        let mut methods = self.payment_methods();
        methods.push(method.clone());
        self.store.save(keys::PAYMENT_METHODS, &methods)?;

        info!(id = %method.id, name = %method.name, fee_bps, "Payment method added");
        Ok(method)
    }

    /// Removes a payment method. Sales that used it keep its name snapshot;
    /// open checkouts referencing it fall back to the zero-fee sentinel.
    pub fn remove_payment_method(&self, id: &str) -> StoreResult<()> {
        let mut methods = self.payment_methods();
        let before = methods.len();
        methods.retain(|m| m.id != id);
        if methods.len() == before {
            return Err(StoreError::not_found("Payment method", id));
        }

        debug!(id, "Payment method removed");
        self.store.save(keys::PAYMENT_METHODS, &methods)
    }

    /// Updates a method's fee rate (applies to future sales only).
    pub fn set_payment_method_fee(&self, id: &str, fee_bps: u32) -> StoreResult<()> {
        validate_fee_bps(fee_bps)?;

        let mut methods = self.payment_methods();
        let method = methods
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("Payment method", id))?;

        debug!(id, fee_bps, "Payment method fee updated");
        method.fee_bps = fee_bps;
        self.store.save(keys::PAYMENT_METHODS, &methods)
    }

    // -------------------------------------------------------------------------
    // Company info
    // -------------------------------------------------------------------------

    /// Returns the company identity printed on receipts.
    pub fn company(&self) -> CompanyInfo {
        self.store.load_company()
    }

    /// Replaces the company identity (edit-in-place form).
    pub fn save_company(&self, company: &CompanyInfo) -> StoreResult<()> {
        validate_name("name", &company.name)?;
        self.store.save(keys::COMPANY, company)
    }

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------

    /// Returns the stored credential list.
    pub fn users(&self) -> Vec<Credential> {
        self.store.load_users()
    }

    /// Registers a user. Password policy: minimum length plus a matching
    /// confirmation. Usernames are unique.
    pub fn register_user(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> StoreResult<()> {
        validate_name("username", username)?;
        validate_password(password, confirmation)?;

        let mut users = self.users();
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::duplicate("username", username));
        }

        users.push(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
        self.store.save(keys::USERS, &users)?;

        info!(username, "User registered");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_methods_seeded_then_mutable() {
        let store = Store::in_memory();
        let repo = store.settings();

        assert_eq!(repo.payment_methods().len(), 4);

        let method = repo.add_payment_method("Vale Pet", 250).unwrap();
        assert_eq!(repo.payment_methods().len(), 5);

        repo.set_payment_method_fee(&method.id, 300).unwrap();
        let methods = repo.payment_methods();
        let updated = methods.iter().find(|m| m.id == method.id).unwrap();
        assert_eq!(updated.fee_bps, 300);

        repo.remove_payment_method(&method.id).unwrap();
        assert_eq!(repo.payment_methods().len(), 4);
        assert!(matches!(
            repo.remove_payment_method(&method.id).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_fee_bounds_enforced() {
        let store = Store::in_memory();
        let repo = store.settings();

        assert!(repo.add_payment_method("Cartão Loja", 10001).is_err());
    }

    #[test]
    fn test_company_round_trip() {
        let store = Store::in_memory();
        let repo = store.settings();

        let mut company = repo.company();
        company.name = "Pawshop Pet & Ração".to_string();
        repo.save_company(&company).unwrap();

        assert_eq!(repo.company().name, "Pawshop Pet & Ração");
    }

    #[test]
    fn test_register_user_rules() {
        let store = Store::in_memory();
        let repo = store.settings();

        repo.register_user("admin", "segredo", "segredo").unwrap();
        assert_eq!(repo.users().len(), 1);

        // short password
        assert!(repo.register_user("outro", "abc", "abc").is_err());
        // mismatched confirmation
        assert!(repo.register_user("outro", "segredo", "segred0").is_err());
        // duplicate username
        assert!(matches!(
            repo.register_user("admin", "segredo", "segredo").unwrap_err(),
            StoreError::Duplicate { .. }
        ));
    }
}
