//! # Cart
//!
//! The in-progress sale: lines being rung up before checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Register Action          Cart Method              Cart Change          │
//! │  ───────────────          ───────────              ───────────          │
//! │                                                                         │
//! │  Scan / tap product ────► add_product() ─────────► merge or push line  │
//! │                                                                         │
//! │  "R$ 10 of ração"  ─────► add_amount() ──────────► qty = amount/price  │
//! │                                                                         │
//! │  +/- buttons ───────────► step_quantity() ───────► qty ± step          │
//! │                                                                         │
//! │  Type a quantity ───────► set_quantity() ────────► qty = n (0 drops)   │
//! │                                                                         │
//! │  Edit line price ───────► override_price() ──────► line price = p      │
//! │                                                                         │
//! │  ✕ on a line ───────────► remove_line()                                │
//! │                                                                         │
//! │  Finalize / abandon ────► clear()                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product again
//!   increases the existing line's quantity)
//! - Quantities are > 0 (setting a quantity to zero removes the line)
//! - A non-service product with zero stock cannot enter the cart
//!
//! Stock is NOT decremented here: the cart only snapshots products. All
//! stock movement happens at finalize time in [`crate::checkout`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Product};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, QUANTITY_EPSILON};

/// Minimum quantity a line can be stepped down to before it would be absurd
/// to weigh (1 gram).
const MIN_STEP_QUANTITY: f64 = 0.001;

/// The in-progress sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the order they were rung up.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Out-of-stock non-services are rejected up front
    /// - If the product is already in the cart: increases quantity
    /// - Otherwise: appends a new snapshot line
    pub fn add_product(&mut self, product: &Product, quantity: f64) -> CoreResult<()> {
        validate_quantity(quantity, product.unit_type)?;

        // The catalog gate: a sold-out product cannot be rung up at all.
        // (Availability against the requested TOTAL is re-checked with edit
        // awareness at finalize time.)
        if !product.is_service() && product.stock <= 0.0 {
            return Err(CoreError::InsufficientStock {
                code: product.code.clone(),
                available: product.stock,
                requested: quantity,
            });
        }

        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Adds a weighed (`kg`) product by target amount: the customer says how
    /// much they want to spend and the quantity is derived.
    ///
    /// ## Returns
    /// The computed quantity in kilograms.
    ///
    /// ## Example
    /// ```rust
    /// use pawshop_core::cart::quantity_for_amount;
    /// use pawshop_core::money::Money;
    ///
    /// // R$ 10.00 of ração at R$ 18.50/kg ≈ 0.540541 kg
    /// let qty = quantity_for_amount(Money::from_cents(1850), Money::from_cents(1000));
    /// assert!((qty - 0.540_540_5).abs() < 1e-6);
    /// ```
    pub fn add_amount(&mut self, product: &Product, amount: Money) -> CoreResult<f64> {
        if !product.unit_type.is_weighed() {
            return Err(CoreError::Validation(
                crate::error::ValidationError::InvalidFormat {
                    field: "amount".to_string(),
                    reason: "amount-based entry is only for weighed products".to_string(),
                },
            ));
        }
        crate::validation::validate_payment_amount(amount.cents())?;

        let quantity = quantity_for_amount(product.price(), amount);
        self.add_product(product, quantity)?;
        Ok(quantity)
    }

    /// Steps a line's quantity by ±1 step (1 unit, or 0.1 kg for weighed
    /// lines), never below the minimum weighable quantity.
    pub fn step_quantity(&mut self, product_id: &str, direction: i32) -> CoreResult<()> {
        let line = self.line_mut(product_id)?;
        let step = line.unit_type.quantity_step() * direction as f64;
        line.quantity = (line.quantity + step).max(MIN_STEP_QUANTITY);
        Ok(())
    }

    /// Sets a line's quantity outright. Zero (or less) removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: f64) -> CoreResult<()> {
        if quantity <= QUANTITY_EPSILON {
            return self.remove_line(product_id);
        }

        let unit_type = self.line_mut(product_id)?.unit_type;
        validate_quantity(quantity, unit_type)?;

        let line = self.line_mut(product_id)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Overrides a line's unit price (cashier discount / adjustment).
    pub fn override_price(&mut self, product_id: &str, price: Money) -> CoreResult<()> {
        crate::validation::validate_price_cents(price.cents())?;
        let line = self.line_mut(product_id)?;
        line.unit_price_cents = price.cents();
        Ok(())
    }

    /// Removes a line by product id.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ProductNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines (after finalize, or when the sale is abandoned).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of lines in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart total: sum of line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn line_mut(&mut self, product_id: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }
}

/// Quantity bought when a customer pays `amount` for goods priced
/// `price_per_kg`: `amount / price`.
pub fn quantity_for_amount(price_per_kg: Money, amount: Money) -> f64 {
    amount.cents() as f64 / price_per_kg.cents() as f64
}

// =============================================================================
// Unit Tests
// =============================================================================
