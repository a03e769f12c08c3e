//! # Product Commands
//!
//! Inventory screen plumbing: list/search, create/update, delete, manual
//! stock adjustments.

use pawshop_core::money::Money;
use pawshop_core::types::{Product, UnitType};
use pawshop_core::validation::validate_search_query;
use pawshop_store::repository::product::generate_product_id;

use super::CommandResult;
use crate::error::ShellError;
use crate::state::AppContext;

/// Form data for creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub code: String,
    pub name: String,
    pub category: String,
    pub subgroup: Option<String>,
    pub unit_type: UnitType,
    pub price: Money,
    pub cost_price: Money,
    pub stock: f64,
}

/// Lists the catalog, optionally filtered by a search query.
pub fn list(ctx: &AppContext, query: &str) -> CommandResult {
    let query = validate_search_query(query)?;
    let products = if query.is_empty() {
        ctx.store.products().all()
    } else {
        ctx.store.products().search(&query)
    };

    if products.is_empty() {
        return Ok("No products".to_string());
    }

    let mut out = format!("{} product(s)\n", products.len());
    for p in &products {
        let low = !p.is_service() && p.stock < 5.0;
        out.push_str(&format!(
            "  {:<8} {:<42} {:<10} {:>10}  estoque {:>8}{}\n",
            p.code,
            p.name,
            p.category,
            p.price().to_string(),
            p.unit_type.format_quantity(p.stock),
            if low { "  [LOW]" } else { "" }
        ));
    }
    Ok(out)
}

/// Creates a product, or updates the one already using the form's code.
pub fn save(ctx: &mut AppContext, form: ProductForm) -> CommandResult {
    let existing = ctx.store.products().find_by_code(&form.code);
    let (id, verb) = match &existing {
        Some(p) => (p.id.clone(), "updated"),
        None => (generate_product_id(), "created"),
    };

    let product = Product {
        id,
        code: form.code.clone(),
        name: form.name,
        category: form.category,
        subgroup: form.subgroup,
        cost_price_cents: form.cost_price.cents(),
        price_cents: form.price.cents(),
        stock: form.stock.max(0.0),
        unit_type: form.unit_type,
        color: existing.and_then(|p| p.color),
    };

    ctx.store.products().upsert(product)?;
    ctx.reload();
    Ok(format!("Product {} {}", form.code, verb))
}

/// Deletes a product by barcode. Confirmation happens in the shell.
pub fn delete(ctx: &mut AppContext, code: &str) -> CommandResult {
    let product = ctx
        .store
        .products()
        .find_by_code(code)
        .ok_or_else(|| ShellError::not_found("Product", code))?;

    ctx.store.products().delete(&product.id)?;
    ctx.reload();
    Ok(format!("Product {} deleted", code))
}

/// Manual stock adjustment (recount, breakage, delivery).
pub fn set_stock(ctx: &mut AppContext, code: &str, stock: f64) -> CommandResult {
    let product = ctx
        .store
        .products()
        .find_by_code(code)
        .ok_or_else(|| ShellError::not_found("Product", code))?;

    ctx.store.products().update_stock(&product.id, stock)?;
    ctx.reload();
    Ok(format!(
        "Stock of {} set to {}",
        code,
        product.unit_type.format_quantity(stock.max(0.0))
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pawshop_store::Store;

    fn form(code: &str, name: &str) -> ProductForm {
        ProductForm {
            code: code.to_string(),
            name: name.to_string(),
            category: "Higiene".to_string(),
            subgroup: None,
            unit_type: UnitType::Un,
            price: Money::from_cents(3200),
            cost_price: Money::from_cents(1800),
            stock: 15.0,
        }
    }

    #[test]
    fn test_save_creates_then_updates_by_code() {
        let mut ctx = AppContext::new(Store::in_memory());

        let message = save(&mut ctx, form("HIG001", "Shampoo Neutro")).unwrap();
        assert!(message.contains("created"));
        assert_eq!(ctx.shop.products.len(), 1);
        let first_id = ctx.shop.products[0].id.clone();

        let mut updated = form("HIG001", "Shampoo Neutro 500ml");
        updated.price = Money::from_cents(2990);
        let message = save(&mut ctx, updated).unwrap();
        assert!(message.contains("updated"));

        assert_eq!(ctx.shop.products.len(), 1);
        assert_eq!(ctx.shop.products[0].id, first_id);
        assert_eq!(ctx.shop.products[0].price_cents, 2990);
    }

    #[test]
    fn test_delete_and_stock_by_code() {
        let mut ctx = AppContext::new(Store::in_memory());
        save(&mut ctx, form("HIG001", "Shampoo")).unwrap();

        set_stock(&mut ctx, "HIG001", 3.0).unwrap();
        assert_eq!(ctx.shop.products[0].stock, 3.0);

        delete(&mut ctx, "HIG001").unwrap();
        assert!(ctx.shop.products.is_empty());
        assert!(delete(&mut ctx, "HIG001").is_err());
    }

    #[test]
    fn test_list_flags_low_stock() {
        let mut ctx = AppContext::new(Store::in_memory());
        let mut low = form("HIG001", "Shampoo");
        low.stock = 2.0;
        save(&mut ctx, low).unwrap();

        let out = list(&ctx, "").unwrap();
        assert!(out.contains("[LOW]"));
    }
}
