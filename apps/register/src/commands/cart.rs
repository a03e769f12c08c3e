//! # Cart Commands
//!
//! Ringing up: scan, add, weighed amount entry, quantity/price edits.

use tracing::debug;

use pawshop_core::money::Money;
use pawshop_core::types::Product;
use pawshop_core::UnitType;

use super::CommandResult;
use crate::error::ShellError;
use crate::state::AppContext;

/// Scanner path: one unit straight into the cart. A barcode miss reports
/// "not found" and leaves the cart unchanged; weighed products point the
/// operator at amount entry instead of guessing a weight.
pub fn scan(ctx: &mut AppContext, code: &str) -> CommandResult {
    let product = lookup(ctx, code)?;

    if product.unit_type.is_weighed() {
        return Ok(format!(
            "{} is sold by weight ({}/kg). Use 'bulk {} <amount>' or 'add {} <kg>'.",
            product.name,
            product.price(),
            product.code,
            product.code
        ));
    }

    ctx.checkout.cart.add_product(&product, 1.0)?;
    debug!(code = %product.code, "Scanned into cart");
    Ok(format!("+1 {} ({})", product.name, product.price()))
}

/// Adds an explicit quantity of a product.
pub fn add(ctx: &mut AppContext, code: &str, quantity: f64) -> CommandResult {
    let product = lookup(ctx, code)?;
    ctx.checkout.cart.add_product(&product, quantity)?;
    Ok(format!(
        "+{} {}",
        product.unit_type.format_quantity(quantity),
        product.name
    ))
}

/// Weighed entry by target amount: "R$ 10.00 of ração".
pub fn add_amount(ctx: &mut AppContext, code: &str, amount: Money) -> CommandResult {
    let product = lookup(ctx, code)?;
    let quantity = ctx.checkout.cart.add_amount(&product, amount)?;
    Ok(format!(
        "+{} kg {} ({})",
        UnitType::Kg.format_quantity(quantity),
        product.name,
        amount
    ))
}

/// Sets a line's quantity (0 removes the line).
pub fn set_quantity(ctx: &mut AppContext, code: &str, quantity: f64) -> CommandResult {
    let product_id = line_product_id(ctx, code)?;
    ctx.checkout.cart.set_quantity(&product_id, quantity)?;
    Ok(show(ctx))
}

/// Overrides a line's unit price.
pub fn set_price(ctx: &mut AppContext, code: &str, price: Money) -> CommandResult {
    let product_id = line_product_id(ctx, code)?;
    ctx.checkout.cart.override_price(&product_id, price)?;
    Ok(show(ctx))
}

/// Removes a line.
pub fn remove(ctx: &mut AppContext, code: &str) -> CommandResult {
    let product_id = line_product_id(ctx, code)?;
    ctx.checkout.cart.remove_line(&product_id)?;
    Ok(show(ctx))
}

/// Abandons the checkout (cart, tenders, customer, edit context).
pub fn abandon(ctx: &mut AppContext) -> CommandResult {
    ctx.checkout.abort();
    Ok("Checkout cleared".to_string())
}

/// Renders the current cart.
pub fn show(ctx: &AppContext) -> String {
    let session = &ctx.checkout;
    let mut out = String::new();

    match session.editing() {
        Some(sale_id) => out.push_str(&format!("EDITING SALE #{}\n", sale_id)),
        None => out.push_str(&format!("NEW SALE #{}\n", ctx.shop.peek_sale_code())),
    }
    if let Some(customer) = &session.customer {
        out.push_str(&format!("Customer: {}\n", customer.name));
    }

    if session.cart.is_empty() {
        out.push_str("(cart is empty)\n");
        return out;
    }

    for item in &session.cart.items {
        out.push_str(&format!(
            "  {:<8} {:<38} {:>7} x {:>9} = {:>10}\n",
            item.code,
            item.name,
            item.unit_type.format_quantity(item.quantity),
            item.unit_price().to_string(),
            item.line_total().to_string()
        ));
    }
    out.push_str(&format!("TOTAL: {}\n", session.cart.total()));
    out
}

/// Catalog lookup by barcode against the cached shop state.
fn lookup(ctx: &AppContext, code: &str) -> Result<Product, ShellError> {
    ctx.shop
        .product_by_code(code)
        .cloned()
        .ok_or_else(|| ShellError::not_found("Product", code))
}

/// Maps a barcode to the product id of an existing cart line.
fn line_product_id(ctx: &AppContext, code: &str) -> Result<String, ShellError> {
    ctx.checkout
        .cart
        .items
        .iter()
        .find(|i| i.code == code)
        .map(|i| i.product_id.clone())
        .ok_or_else(|| ShellError::not_found("Cart line", code))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppContext;
    use pawshop_core::types::UnitType;
    use pawshop_store::Store;

    fn context_with_catalog() -> AppContext {
        let store = Store::in_memory();
        let products = vec![
            Product {
                id: "1".to_string(),
                code: "ACE001".to_string(),
                name: "Coleira".to_string(),
                category: "Acessórios".to_string(),
                subgroup: None,
                cost_price_cents: 1500,
                price_cents: 3500,
                stock: 10.0,
                unit_type: UnitType::Un,
                color: None,
            },
            Product {
                id: "2".to_string(),
                code: "RAC-KG".to_string(),
                name: "Ração Granel".to_string(),
                category: "Ração".to_string(),
                subgroup: None,
                cost_price_cents: 1200,
                price_cents: 1850,
                stock: 50.0,
                unit_type: UnitType::Kg,
                color: None,
            },
        ];
        store
            .save(pawshop_store::keys::PRODUCTS, &products)
            .unwrap();
        AppContext::new(store)
    }

    #[test]
    fn test_scan_adds_one_unit() {
        let mut ctx = context_with_catalog();
        scan(&mut ctx, "ACE001").unwrap();
        scan(&mut ctx, "ACE001").unwrap();

        assert_eq!(ctx.checkout.cart.items.len(), 1);
        assert_eq!(ctx.checkout.cart.items[0].quantity, 2.0);
    }

    #[test]
    fn test_scan_miss_reports_and_keeps_cart() {
        let mut ctx = context_with_catalog();
        scan(&mut ctx, "ACE001").unwrap();

        let err = scan(&mut ctx, "UNKNOWN").unwrap_err();
        assert_eq!(err.message, "Product not found: UNKNOWN");
        assert_eq!(ctx.checkout.cart.items.len(), 1);
    }

    #[test]
    fn test_scan_weighed_product_does_not_guess() {
        let mut ctx = context_with_catalog();
        let message = scan(&mut ctx, "RAC-KG").unwrap();

        assert!(message.contains("sold by weight"));
        assert!(ctx.checkout.cart.is_empty());
    }

    #[test]
    fn test_bulk_amount_entry() {
        let mut ctx = context_with_catalog();
        add_amount(&mut ctx, "RAC-KG", Money::from_cents(1000)).unwrap();

        assert_eq!(ctx.checkout.cart.total().cents(), 1000);
    }

    #[test]
    fn test_line_edits_by_code() {
        let mut ctx = context_with_catalog();
        add(&mut ctx, "ACE001", 2.0).unwrap();

        set_price(&mut ctx, "ACE001", Money::from_cents(3000)).unwrap();
        assert_eq!(ctx.checkout.cart.total().cents(), 6000);

        set_quantity(&mut ctx, "ACE001", 3.0).unwrap();
        assert_eq!(ctx.checkout.cart.total().cents(), 9000);

        remove(&mut ctx, "ACE001").unwrap();
        assert!(ctx.checkout.cart.is_empty());
    }

    #[test]
    fn test_show_mentions_next_sale_code() {
        let ctx = context_with_catalog();
        assert!(show(&ctx).contains("NEW SALE #000001"));
    }
}
