//! # Checkout Session
//!
//! The register's in-progress sale: the cart, the tender rows typed so far,
//! the identified customer and - when the operator pulled a historical sale
//! back up - the edit context.
//!
//! ## Edit Context Rules
//! - `edit <sale>` loads the sale's lines and customer into the session and
//!   remembers the sale id; finalize then replaces that sale in place
//! - cancelling the sale that is open for editing aborts the edit session
//! - finalize and abandon both clear everything

use pawshop_core::checkout::{CustomerRef, SaleDraft, Tender};
use pawshop_core::types::Sale;
use pawshop_core::Cart;

/// In-progress checkout state.
#[derive(Debug, Default)]
pub struct CheckoutSession {
    /// Lines being rung up.
    pub cart: Cart,

    /// Tender rows typed at the payment step.
    pub tenders: Vec<Tender>,

    /// Identified customer, if any.
    pub customer: Option<CustomerRef>,

    /// Sale id this session is editing, if it was loaded from history.
    editing: Option<String>,
}

impl CheckoutSession {
    /// Creates an empty checkout session.
    pub fn new() -> Self {
        CheckoutSession::default()
    }

    /// The sale id under edit, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Loads a historical sale into the session for correction.
    pub fn begin_edit(&mut self, sale: &Sale) {
        self.cart = Cart {
            items: sale.items.clone(),
        };
        self.tenders.clear();
        self.customer = match (&sale.customer_id, &sale.customer_name) {
            (Some(id), Some(name)) => Some(CustomerRef {
                id: id.clone(),
                name: name.clone(),
            }),
            _ => None,
        };
        self.editing = Some(sale.id.clone());
    }

    /// Drops the edit context along with everything else.
    pub fn abort(&mut self) {
        self.clear();
    }

    /// If the given sale is open for editing, abort the session (used when
    /// that sale gets cancelled from the history screen).
    pub fn abort_if_editing(&mut self, sale_id: &str) -> bool {
        if self.editing.as_deref() == Some(sale_id) {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Resets the session (after finalize, or on abandon).
    pub fn clear(&mut self) {
        self.cart.clear();
        self.tenders.clear();
        self.customer = None;
        self.editing = None;
    }

    /// Sum of tendered amounts, in centavos.
    pub fn paid_cents(&self) -> i64 {
        self.tenders.iter().map(|t| t.amount_cents).sum()
    }

    /// Snapshot of the session as engine input.
    pub fn draft(&self) -> SaleDraft {
        SaleDraft {
            items: self.cart.items.clone(),
            tenders: self.tenders.clone(),
            customer: self.customer.clone(),
            sale_id: self.editing.clone(),
        }
    }
}
