//! # Checkout Engine
//!
//! Sale finalization, sale editing and cancellation, and the stock
//! reconciliation they imply.
//!
//! ## Finalize-or-Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      finalize_sale(state, draft, now)                   │
//! │                                                                         │
//! │  1. VALIDATE (no mutation yet)                                          │
//! │     ├── cart non-empty                                                  │
//! │     ├── Σ tendered ≥ total − 1 centavo                                  │
//! │     └── per-product availability                                        │
//! │         • edits first count back the old sale's allocation             │
//! │         • services are exempt                                           │
//! │                                                                         │
//! │  2. SETTLE                                                              │
//! │     ├── total = Σ line price × qty                                      │
//! │     ├── change = max(0, Σ tendered − total)                             │
//! │     └── per-tender fee = share-of-total × live method rate              │
//! │                                                                         │
//! │  3. COMMIT (on a clone of the state)                                    │
//! │     ├── edit: restore old lines' stock, keep id + timestamp            │
//! │     ├── deduct new lines' stock (floored at zero)                      │
//! │     ├── upsert sale (replace in place / prepend)                       │
//! │     └── advance the sale counter (new sales only)                      │
//! │                                                                         │
//! │  Any Err returns BEFORE step 3: the caller's state is never touched.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Invariant
//! After any committed operation every non-service product has stock ≥ 0.
//! Availability is rejected up front; the deduction itself additionally
//! floors at zero so the invariant survives even a caller that skips
//! validation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::state::{format_sale_code, ShopState};
use crate::types::{CartItem, PaymentEntry, PaymentMethod, Product, Sale};
use crate::{FALLBACK_METHOD_NAME, PAYMENT_EPSILON_CENTS, QUANTITY_EPSILON};

// =============================================================================
// Inputs
// =============================================================================

/// One tender row typed at the payment screen: which method, how much.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// References a [`PaymentMethod`] by id. A dangling id falls back to the
    /// sentinel zero-fee method at settle time - never an error.
    pub method_id: String,
    /// Amount tendered in centavos.
    pub amount_cents: i64,
}

impl Tender {
    /// Returns the tendered amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// The customer attached to a draft, already resolved by the caller.
/// The sale stores both the id and the denormalized name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

/// Everything finalize needs besides the shop state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    /// Lines being sold.
    pub items: Vec<CartItem>,

    /// Tendered payments (split payment = multiple rows).
    pub tenders: Vec<Tender>,

    /// Optional identified customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,

    /// When set, finalize replaces the sale with this code IF it still
    /// exists (edit); otherwise the draft commits as a new sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
}

/// What a successful finalize or cancel hands back.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// The next shop state, ready to persist.
    pub state: ShopState,
    /// The committed sale (finalize) or the removed sale (cancel).
    pub sale: Sale,
}

// =============================================================================
// Finalize
// =============================================================================

/// Finalizes a draft into a committed sale, or updates an existing sale in
/// place when the draft names one.
///
/// Pure: takes the current state by reference, returns the next state.
/// On `Err` nothing was mutated anywhere.
pub fn finalize_sale(
    state: &ShopState,
    draft: &SaleDraft,
    now: DateTime<Utc>,
) -> CoreResult<CheckoutOutcome> {
    if draft.items.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let total: Money = draft.items.iter().map(CartItem::line_total).sum();
    let paid: Money = draft.tenders.iter().map(Tender::amount).sum();

    if paid.cents() < total.cents() - PAYMENT_EPSILON_CENTS {
        return Err(CoreError::InsufficientPayment {
            paid_cents: paid.cents(),
            total_cents: total.cents(),
        });
    }

    // Edit iff the draft names a sale that is actually in the store.
    let previous = draft.sale_id.as_deref().and_then(|id| state.sale(id));

    check_availability(state, &draft.items, previous)?;

    let payments = settle_tenders(&draft.tenders, total, paid, &state.payment_methods);
    let change = (paid - total).max_zero();

    // Edits keep their code and original timestamp; new sales take the next
    // number off the counter.
    let (id, timestamp, next_number) = match previous {
        Some(prev) => (prev.id.clone(), prev.timestamp, state.next_sale_number),
        None => (
            format_sale_code(state.next_sale_number),
            now,
            state.next_sale_number + 1,
        ),
    };

    let sale = Sale {
        id,
        items: draft.items.clone(),
        total_cents: total.cents(),
        change_cents: change.cents(),
        timestamp,
        payments,
        customer_id: draft.customer.as_ref().map(|c| c.id.clone()),
        customer_name: draft.customer.as_ref().map(|c| c.name.clone()),
    };

    let mut next = state.clone();
    if let Some(prev) = previous {
        restore_stock(&mut next.products, &prev.items);
    }
    deduct_stock(&mut next.products, &draft.items);

    match next.sales.iter().position(|s| s.id == sale.id) {
        Some(pos) => next.sales[pos] = sale.clone(),
        None => next.sales.insert(0, sale.clone()),
    }
    next.next_sale_number = next_number;

    Ok(CheckoutOutcome { state: next, sale })
}

// =============================================================================
// Cancel
// =============================================================================

/// Cancels (fully reverses) a committed sale: every non-service line's stock
/// is restored, then the sale record is removed.
///
/// Unconditional once called - the confirmation step belongs to the caller.
pub fn cancel_sale(state: &ShopState, sale_id: &str) -> CoreResult<CheckoutOutcome> {
    let pos = state
        .sales
        .iter()
        .position(|s| s.id == sale_id)
        .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

    let mut next = state.clone();
    let sale = next.sales.remove(pos);
    restore_stock(&mut next.products, &sale.items);

    Ok(CheckoutOutcome { state: next, sale })
}

// =============================================================================
// Internals
// =============================================================================

/// Rejects any line that would take a non-service product below zero.
///
/// For edits, availability counts the old sale's allocation as already
/// returned: a cashier re-saving an unchanged cart must never hit a false
/// "out of stock".
fn check_availability(
    state: &ShopState,
    items: &[CartItem],
    previous: Option<&Sale>,
) -> CoreResult<()> {
    // Quantity the old version of this sale had taken, per product.
    let mut returned: HashMap<&str, f64> = HashMap::new();
    if let Some(prev) = previous {
        for item in &prev.items {
            if !item.is_service() {
                *returned.entry(item.product_id.as_str()).or_insert(0.0) += item.quantity;
            }
        }
    }

    // The draft may carry several lines of one product only if a caller
    // bypassed the cart's merging; sum them before comparing.
    let mut requested: HashMap<&str, f64> = HashMap::new();
    for item in items {
        if !item.is_service() {
            *requested.entry(item.product_id.as_str()).or_insert(0.0) += item.quantity;
        }
    }

    for (product_id, qty) in requested {
        // A line whose product vanished from the catalog has no stock to
        // guard; the snapshot still sells and reports fine.
        let Some(product) = state.product(product_id) else {
            continue;
        };
        if product.is_service() {
            continue;
        }

        let available = product.stock + returned.get(product_id).copied().unwrap_or(0.0);
        if qty > available + QUANTITY_EPSILON {
            return Err(CoreError::InsufficientStock {
                code: product.code.clone(),
                available,
                requested: qty,
            });
        }
    }

    Ok(())
}

/// Turns tender rows into the payment entries stored on the sale.
///
/// The fee for each tender is computed on its share of the TOTAL (not the
/// raw tendered amount), using the method's live rate at this moment. The
/// share is `total × amount ÷ paid`, so overpayment (change) never accrues
/// fees, and the shares of a split payment sum back to the total.
fn settle_tenders(
    tenders: &[Tender],
    total: Money,
    paid: Money,
    methods: &[PaymentMethod],
) -> Vec<PaymentEntry> {
    tenders
        .iter()
        .map(|tender| {
            let method = methods.iter().find(|m| m.id == tender.method_id);
            let (name, rate) = match method {
                Some(m) => (m.name.clone(), m.fee_rate()),
                None => (
                    FALLBACK_METHOD_NAME.to_string(),
                    crate::types::FeeRate::zero(),
                ),
            };

            let share = total.prorate(tender.amount(), paid);
            PaymentEntry {
                method: name,
                amount_cents: tender.amount_cents,
                fee_cents: share.calculate_fee(rate).cents(),
            }
        })
        .collect()
}

/// Gives quantities back to the catalog (edit rollback, cancellation).
fn restore_stock(products: &mut [Product], items: &[CartItem]) {
    for item in items {
        if item.is_service() {
            continue;
        }
        if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
            product.stock += item.quantity;
        }
    }
}

/// Takes quantities out of the catalog, flooring at zero.
fn deduct_stock(products: &mut [Product], items: &[CartItem]) {
    for item in items {
        if item.is_service() {
            continue;
        }
        if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
            product.stock = (product.stock - item.quantity).max(0.0);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::default_payment_methods;
    use crate::types::UnitType;
    use chrono::TimeZone;

    fn product(id: &str, price_cents: i64, stock: f64, unit_type: UnitType) -> Product {
        Product {
            id: id.to_string(),
            code: format!("COD-{}", id),
            name: format!("Produto {}", id),
            category: if unit_type.is_weighed() {
                "Ração".to_string()
            } else {
                "Acessórios".to_string()
            },
            subgroup: None,
            cost_price_cents: price_cents / 2,
            price_cents,
            stock,
            unit_type,
            color: None,
        }
    }

    fn shop() -> ShopState {
        ShopState {
            products: vec![
                product("1", 1850, 10.0, UnitType::Un),
                product("2", 1850, 50.0, UnitType::Kg),
                Product {
                    category: crate::SERVICES_CATEGORY.to_string(),
                    ..product("s1", 5000, 999.0, UnitType::Un)
                },
            ],
            sales: Vec::new(),
            payment_methods: default_payment_methods(),
            next_sale_number: 1,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 15, 30, 0).unwrap()
    }

    fn line(state: &ShopState, product_id: &str, quantity: f64) -> CartItem {
        CartItem::from_product(state.product(product_id).unwrap(), quantity)
    }

    fn cash(amount_cents: i64) -> Tender {
        Tender {
            method_id: "p1".to_string(),
            amount_cents,
        }
    }

    #[test]
    fn test_finalize_commits_sale_and_deducts_stock() {
        // 2 × R$ 18.50 paid with R$ 40.00
        let state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "1", 2.0)],
            tenders: vec![cash(4000)],
            customer: None,
            sale_id: None,
        };

        let outcome = finalize_sale(&state, &draft, now()).unwrap();
        let sale = &outcome.sale;

        assert_eq!(sale.id, "000001");
        assert_eq!(sale.total_cents, 3700);
        assert_eq!(sale.change_cents, 300);
        assert_eq!(outcome.state.product("1").unwrap().stock, 8.0);
        assert_eq!(outcome.state.next_sale_number, 2);
        assert_eq!(outcome.state.sales.len(), 1);
        // original state untouched
        assert_eq!(state.product("1").unwrap().stock, 10.0);
        assert!(state.sales.is_empty());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let state = shop();
        let draft = SaleDraft {
            tenders: vec![cash(1000)],
            ..SaleDraft::default()
        };
        assert!(matches!(
            finalize_sale(&state, &draft, now()).unwrap_err(),
            CoreError::EmptyCart
        ));
    }

    #[test]
    fn test_payment_sufficiency_gate() {
        let state = shop();
        let items = vec![line(&state, "1", 2.0)]; // total 3700

        // One centavo short of the epsilon: rejected, nothing mutated
        let short = SaleDraft {
            items: items.clone(),
            tenders: vec![cash(3698)],
            customer: None,
            sale_id: None,
        };
        let err = finalize_sale(&state, &short, now()).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientPayment { .. }));

        // Exactly at the epsilon boundary: accepted
        let boundary = SaleDraft {
            items,
            tenders: vec![cash(3699)],
            customer: None,
            sale_id: None,
        };
        let outcome = finalize_sale(&state, &boundary, now()).unwrap();
        assert_eq!(outcome.sale.change_cents, 0);
    }

    #[test]
    fn test_oversell_rejected_before_any_mutation() {
        let state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "1", 11.0)], // only 10 in stock
            tenders: vec![cash(100_000)],
            customer: None,
            sale_id: None,
        };

        let err = finalize_sale(&state, &draft, now()).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                code,
                available,
                requested,
            } => {
                assert_eq!(code, "COD-1");
                assert_eq!(available, 10.0);
                assert_eq!(requested, 11.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_services_never_touch_stock() {
        let state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "s1", 3.0)],
            tenders: vec![cash(15000)],
            customer: None,
            sale_id: None,
        };

        let outcome = finalize_sale(&state, &draft, now()).unwrap();
        assert_eq!(outcome.state.product("s1").unwrap().stock, 999.0);
    }

    #[test]
    fn test_fee_snapshot_uses_live_rate_and_share_of_total() {
        let state = shop();
        // R$ 37.00 sale, split: R$ 30.00 crédito (3.5%) + R$ 10.00 dinheiro
        let draft = SaleDraft {
            items: vec![line(&state, "1", 2.0)],
            tenders: vec![
                Tender {
                    method_id: "p3".to_string(),
                    amount_cents: 3000,
                },
                cash(1000),
            ],
            customer: None,
            sale_id: None,
        };

        let sale = finalize_sale(&state, &draft, now()).unwrap().sale;
        assert_eq!(sale.payments.len(), 2);
        assert_eq!(sale.payments[0].method, "Cartão de Crédito");
        // crédito settles 3700×3000/4000 = 2775; fee = 2775 × 3.5% ≈ 97
        assert_eq!(sale.payments[0].fee_cents, 97);
        assert_eq!(sale.payments[1].method, "Dinheiro");
        assert_eq!(sale.payments[1].fee_cents, 0);
    }

    #[test]
    fn test_missing_method_falls_back_to_sentinel() {
        let state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "1", 1.0)],
            tenders: vec![Tender {
                method_id: "deleted-method".to_string(),
                amount_cents: 1850,
            }],
            customer: None,
            sale_id: None,
        };

        let sale = finalize_sale(&state, &draft, now()).unwrap().sale;
        assert_eq!(sale.payments[0].method, crate::FALLBACK_METHOD_NAME);
        assert_eq!(sale.payments[0].fee_cents, 0);
    }

    #[test]
    fn test_sequential_codes_and_prepend_order() {
        let mut state = shop();
        for expected in ["000001", "000002", "000003"] {
            let draft = SaleDraft {
                items: vec![line(&state, "2", 0.5)],
                tenders: vec![cash(925)],
                customer: None,
                sale_id: None,
            };
            let outcome = finalize_sale(&state, &draft, now()).unwrap();
            assert_eq!(outcome.sale.id, expected);
            state = outcome.state;
        }
        // newest first
        let ids: Vec<&str> = state.sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["000003", "000002", "000001"]);
    }

    #[test]
    fn test_edit_restores_before_deducting() {
        let mut state = shop();

        // Sell 6 of product 1 (stock 10 → 4)
        let first = SaleDraft {
            items: vec![line(&state, "1", 6.0)],
            tenders: vec![cash(11100)],
            customer: None,
            sale_id: None,
        };
        state = finalize_sale(&state, &first, now()).unwrap().state;
        assert_eq!(state.product("1").unwrap().stock, 4.0);

        // Edit the sale up to 8: only valid because the 6 come back first
        let edit = SaleDraft {
            items: vec![line(&state, "1", 8.0)],
            tenders: vec![cash(14800)],
            customer: None,
            sale_id: Some("000001".to_string()),
        };
        let outcome = finalize_sale(&state, &edit, now()).unwrap();
        assert_eq!(outcome.state.product("1").unwrap().stock, 2.0);
        assert_eq!(outcome.sale.id, "000001");
        // editing does not consume a new number
        assert_eq!(outcome.state.next_sale_number, 2);
        assert_eq!(outcome.state.sales.len(), 1);

        // but 13 is still too many even counting the return
        let too_many = SaleDraft {
            items: vec![line(&state, "1", 13.0)],
            tenders: vec![cash(24050)],
            customer: None,
            sale_id: Some("000001".to_string()),
        };
        assert!(matches!(
            finalize_sale(&state, &too_many, now()).unwrap_err(),
            CoreError::InsufficientStock { .. }
        ));
    }

    #[test]
    fn test_edit_preserves_timestamp_and_is_idempotent() {
        let mut state = shop();
        let created = now();

        let draft = SaleDraft {
            items: vec![line(&state, "1", 2.0)],
            tenders: vec![cash(3700)],
            customer: None,
            sale_id: None,
        };
        state = finalize_sale(&state, &draft, created).unwrap().state;
        let stock_after_sale = state.product("1").unwrap().stock;

        // Re-submit the identical cart as an edit, much later
        let later = created + chrono::Duration::hours(5);
        let resubmit = SaleDraft {
            items: state.sales[0].items.clone(),
            tenders: vec![cash(3700)],
            customer: None,
            sale_id: Some("000001".to_string()),
        };
        let outcome = finalize_sale(&state, &resubmit, later).unwrap();

        assert_eq!(outcome.sale.timestamp, created);
        assert_eq!(outcome.sale.total_cents, 3700);
        assert_eq!(
            outcome.state.product("1").unwrap().stock,
            stock_after_sale
        );
    }

    #[test]
    fn test_draft_with_unknown_sale_id_commits_as_new() {
        // The sale being edited may have been cancelled meanwhile; the draft
        // then commits as a brand-new sale instead of failing.
        let state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "1", 1.0)],
            tenders: vec![cash(1850)],
            customer: None,
            sale_id: Some("000099".to_string()),
        };

        let outcome = finalize_sale(&state, &draft, now()).unwrap();
        assert_eq!(outcome.sale.id, "000001");
    }

    #[test]
    fn test_cancel_restores_stock_and_removes_sale() {
        let mut state = shop();

        // stock 10, sell 3, cancel: back to 10
        let draft = SaleDraft {
            items: vec![line(&state, "1", 3.0)],
            tenders: vec![cash(5550)],
            customer: None,
            sale_id: None,
        };
        state = finalize_sale(&state, &draft, now()).unwrap().state;
        assert_eq!(state.product("1").unwrap().stock, 7.0);

        let outcome = cancel_sale(&state, "000001").unwrap();
        assert_eq!(outcome.state.product("1").unwrap().stock, 10.0);
        assert!(outcome.state.sales.is_empty());
        assert_eq!(outcome.sale.id, "000001");

        // cancelling again: the sale is gone
        assert!(matches!(
            cancel_sale(&outcome.state, "000001").unwrap_err(),
            CoreError::SaleNotFound(_)
        ));
    }

    #[test]
    fn test_cancel_ignores_services_and_deleted_products() {
        let mut state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "1", 2.0), line(&state, "s1", 1.0)],
            tenders: vec![cash(8700)],
            customer: None,
            sale_id: None,
        };
        state = finalize_sale(&state, &draft, now()).unwrap().state;

        // Delete product 1 from the catalog before cancelling
        state.products.retain(|p| p.id != "1");
        let outcome = cancel_sale(&state, "000001").unwrap();

        // Nothing to restore for the deleted product, service untouched
        assert_eq!(outcome.state.product("s1").unwrap().stock, 999.0);
        assert!(outcome.state.sales.is_empty());
    }

    #[test]
    fn test_customer_is_denormalized_onto_sale() {
        let state = shop();
        let draft = SaleDraft {
            items: vec![line(&state, "1", 1.0)],
            tenders: vec![cash(1850)],
            customer: Some(CustomerRef {
                id: "c1".to_string(),
                name: "Maria".to_string(),
            }),
            sale_id: None,
        };

        let sale = finalize_sale(&state, &draft, now()).unwrap().sale;
        assert_eq!(sale.customer_id.as_deref(), Some("c1"));
        assert_eq!(sale.customer_name.as_deref(), Some("Maria"));
    }
}
