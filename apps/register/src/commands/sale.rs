//! # Sale Commands
//!
//! Tendering, finalize/edit/cancel, history and reprints.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use pawshop_core::checkout::{cancel_sale, finalize_sale, CustomerRef, Tender};
use pawshop_core::money::Money;
use pawshop_core::receipt::{render_receipt, ReceiptPrinter};
use pawshop_core::types::PaymentMethod;
use pawshop_core::validation::validate_payment_amount;

use super::CommandResult;
use crate::error::ShellError;
use crate::state::AppContext;

// =============================================================================
// Customer Attachment
// =============================================================================

/// Attaches a customer to the checkout by id or name fragment.
pub fn attach_customer(ctx: &mut AppContext, query: &str) -> CommandResult {
    let customers = ctx.store.customers().all();
    let query_lower = query.to_lowercase();

    let found = customers
        .iter()
        .find(|c| c.id == query)
        .or_else(|| {
            customers
                .iter()
                .find(|c| c.name.to_lowercase().contains(&query_lower))
        })
        .ok_or_else(|| ShellError::not_found("Customer", query))?;

    ctx.checkout.customer = Some(CustomerRef {
        id: found.id.clone(),
        name: found.name.clone(),
    });
    Ok(format!("Customer: {}", found.name))
}

/// Detaches the customer ("Consumidor Final").
pub fn detach_customer(ctx: &mut AppContext) -> CommandResult {
    ctx.checkout.customer = None;
    Ok("Customer detached".to_string())
}

// =============================================================================
// Tendering
// =============================================================================

/// Adds a tender row: method (by id or name) + amount.
pub fn add_tender(ctx: &mut AppContext, method_query: &str, amount: Money) -> CommandResult {
    validate_payment_amount(amount.cents())?;
    let method = resolve_method(&ctx.shop.payment_methods, method_query)?;

    ctx.checkout.tenders.push(Tender {
        method_id: method.id.clone(),
        amount_cents: amount.cents(),
    });
    debug!(method = %method.name, amount = amount.cents(), "Tender added");
    Ok(payments_view(ctx))
}

/// Clears all tender rows.
pub fn clear_tenders(ctx: &mut AppContext) -> CommandResult {
    ctx.checkout.tenders.clear();
    Ok("Tenders cleared".to_string())
}

/// Renders the payment situation: total, tendered rows, remaining or change.
pub fn payments_view(ctx: &AppContext) -> String {
    let total = ctx.checkout.cart.total();
    let paid = Money::from_cents(ctx.checkout.paid_cents());

    let mut out = format!("TOTAL: {}\n", total);
    for tender in &ctx.checkout.tenders {
        let name = ctx
            .shop
            .payment_method(&tender.method_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| pawshop_core::FALLBACK_METHOD_NAME.to_string());
        out.push_str(&format!("  {:<20} {:>10}\n", name, tender.amount().to_string()));
    }

    if paid >= total {
        out.push_str(&format!("CHANGE: {}\n", (paid - total).max_zero()));
    } else {
        out.push_str(&format!("REMAINING: {}\n", total - paid));
    }
    out
}

// =============================================================================
// Finalize / Edit / Cancel
// =============================================================================

/// Finalizes the checkout session: commits the sale (new or edit), persists
/// the next state, prints the receipt and resets the session.
pub fn finalize(ctx: &mut AppContext, printer: &mut dyn ReceiptPrinter) -> CommandResult {
    let draft = ctx.checkout.draft();
    let outcome = finalize_sale(&ctx.shop, &draft, Utc::now())?;
    ctx.commit(outcome.state)?;
    ctx.checkout.clear();

    let sale = outcome.sale;
    info!(
        sale_id = %sale.id,
        total = sale.total_cents,
        items = sale.items.len(),
        "Sale finalized"
    );

    let company = ctx.store.settings().company();
    printer.print(&render_receipt(&sale, &company))?;

    Ok(format!(
        "Sale #{} committed. Total {} | Change {}",
        sale.id,
        sale.total(),
        sale.change()
    ))
}

/// Loads a historical sale into the checkout session for correction.
pub fn begin_edit(ctx: &mut AppContext, sale_id: &str) -> CommandResult {
    let sale = ctx
        .shop
        .sale(sale_id)
        .cloned()
        .ok_or_else(|| ShellError::not_found("Sale", sale_id))?;

    ctx.checkout.begin_edit(&sale);
    Ok(format!(
        "Editing sale #{} ({} lines). Adjust the cart, re-enter payments, then 'finalize'.",
        sale.id,
        sale.items.len()
    ))
}

/// Cancels a sale outright: stock comes back, the record is removed.
///
/// The shell asks "are you sure" BEFORE calling this; here it is
/// unconditional and irreversible.
pub fn cancel(ctx: &mut AppContext, sale_id: &str) -> CommandResult {
    let outcome = cancel_sale(&ctx.shop, sale_id)?;
    ctx.commit(outcome.state)?;

    let aborted_edit = ctx.checkout.abort_if_editing(sale_id);
    info!(sale_id, aborted_edit, "Sale cancelled");

    let mut message = format!(
        "Sale #{} cancelled; stock restored for {} line(s)",
        sale_id,
        outcome.sale.items.len()
    );
    if aborted_edit {
        message.push_str(" (open edit session aborted)");
    }
    Ok(message)
}

// =============================================================================
// History
// =============================================================================

/// One day of history with the summary the cashier expects: transaction
/// count, total and average ticket.
pub fn history(ctx: &AppContext, day: NaiveDate, query: Option<&str>) -> String {
    let query_lower = query.map(str::to_lowercase);
    let sales: Vec<_> = ctx
        .shop
        .sales
        .iter()
        .filter(|s| s.timestamp.date_naive() == day)
        .filter(|s| match &query_lower {
            Some(q) => {
                s.id.to_lowercase().contains(q)
                    || s.customer_name
                        .as_deref()
                        .map(|n| n.to_lowercase().contains(q))
                        .unwrap_or(false)
            }
            None => true,
        })
        .collect();

    if sales.is_empty() {
        return format!("No sales on {}", day.format("%d/%m/%Y"));
    }

    let total: Money = sales.iter().map(|s| s.total()).sum();
    let average = Money::from_cents(total.cents() / sales.len() as i64);

    let mut out = format!(
        "{} sale(s) on {} | total {} | average {}\n",
        sales.len(),
        day.format("%d/%m/%Y"),
        total,
        average
    );
    for sale in sales {
        let methods: Vec<&str> = sale.payments.iter().map(|p| p.method.as_str()).collect();
        out.push_str(&format!(
            "  #{}  {}  {:<20}  {:<28}  {:>10}\n",
            sale.id,
            sale.timestamp.format("%H:%M"),
            sale.customer_name.as_deref().unwrap_or("Consumidor Final"),
            methods.join(", "),
            sale.total().to_string()
        ));
    }
    out
}

/// Reprints a historical receipt.
pub fn reprint(ctx: &AppContext, sale_id: &str, printer: &mut dyn ReceiptPrinter) -> CommandResult {
    let sale = ctx
        .shop
        .sale(sale_id)
        .ok_or_else(|| ShellError::not_found("Sale", sale_id))?;

    let company = ctx.store.settings().company();
    printer.print(&render_receipt(sale, &company))?;
    Ok(format!("Receipt #{} reprinted", sale_id))
}

// =============================================================================
// Internals
// =============================================================================

/// Resolves a payment method by id, exact name or unique name prefix.
fn resolve_method<'a>(
    methods: &'a [PaymentMethod],
    query: &str,
) -> Result<&'a PaymentMethod, ShellError> {
    if let Some(method) = methods.iter().find(|m| m.id == query) {
        return Ok(method);
    }

    let query_lower = query.to_lowercase();
    if let Some(method) = methods
        .iter()
        .find(|m| m.name.to_lowercase() == query_lower)
    {
        return Ok(method);
    }

    let prefixed: Vec<&PaymentMethod> = methods
        .iter()
        .filter(|m| m.name.to_lowercase().starts_with(&query_lower))
        .collect();
    match prefixed.as_slice() {
        [method] => Ok(method),
        [] => Err(ShellError::not_found("Payment method", query)),
        _ => Err(ShellError::validation(format!(
            "Ambiguous payment method '{}': {}",
            query,
            prefixed
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::ConsolePrinter;
    use crate::state::AppContext;
    use pawshop_core::types::{Customer, Product, UnitType};
    use pawshop_store::Store;

    fn context() -> AppContext {
        let store = Store::in_memory();
        let products = vec![Product {
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
        }];
        store
            .save(pawshop_store::keys::PRODUCTS, &products)
            .unwrap();
        store
            .customers()
            .upsert(Customer {
                id: "c1".to_string(),
                name: "Maria Silva".to_string(),
                phone: "(11) 99999-0000".to_string(),
                email: None,
                document: None,
            })
            .unwrap();
        AppContext::new(store)
    }

    fn ring_up(ctx: &mut AppContext, quantity: f64) {
        super::super::cart::add(ctx, "ACE001", quantity).unwrap();
    }

    #[test]
    fn test_full_checkout_flow() {
        let mut ctx = context();
        ring_up(&mut ctx, 2.0); // 7000

        attach_customer(&mut ctx, "maria").unwrap();
        add_tender(&mut ctx, "Dinheiro", Money::from_cents(8000)).unwrap();

        let message = finalize(&mut ctx, &mut ConsolePrinter::new()).unwrap();
        assert!(message.contains("Sale #000001"));
        assert!(message.contains("R$ 10.00")); // change

        // session reset, state persisted
        assert!(ctx.checkout.cart.is_empty());
        assert_eq!(ctx.shop.sales.len(), 1);
        assert_eq!(ctx.shop.product("1").unwrap().stock, 8.0);
        assert_eq!(ctx.shop.sales[0].customer_name.as_deref(), Some("Maria Silva"));
        assert_eq!(ctx.store.load_shop_state().sales.len(), 1);
    }

    #[test]
    fn test_insufficient_payment_keeps_everything() {
        let mut ctx = context();
        ring_up(&mut ctx, 2.0);
        add_tender(&mut ctx, "Pix", Money::from_cents(1000)).unwrap();

        let err = finalize(&mut ctx, &mut ConsolePrinter::new()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PaymentError);

        // cart still loaded, nothing persisted
        assert_eq!(ctx.checkout.cart.items.len(), 1);
        assert!(ctx.shop.sales.is_empty());
        assert_eq!(ctx.shop.product("1").unwrap().stock, 10.0);
    }

    #[test]
    fn test_edit_and_cancel_flow() {
        let mut ctx = context();
        ring_up(&mut ctx, 3.0);
        add_tender(&mut ctx, "Pix", Money::from_cents(10500)).unwrap();
        finalize(&mut ctx, &mut ConsolePrinter::new()).unwrap();
        assert_eq!(ctx.shop.product("1").unwrap().stock, 7.0);

        begin_edit(&mut ctx, "000001").unwrap();
        assert_eq!(ctx.checkout.editing(), Some("000001"));

        // cancelling the sale under edit aborts the edit session
        let message = cancel(&mut ctx, "000001").unwrap();
        assert!(message.contains("edit session aborted"));
        assert!(ctx.checkout.editing().is_none());
        assert_eq!(ctx.shop.product("1").unwrap().stock, 10.0);
        assert!(ctx.shop.sales.is_empty());
    }

    #[test]
    fn test_resolve_method_prefix_and_ambiguity() {
        let ctx = context();

        assert_eq!(
            resolve_method(&ctx.shop.payment_methods, "pix").unwrap().name,
            "Pix"
        );
        assert_eq!(
            resolve_method(&ctx.shop.payment_methods, "p1").unwrap().name,
            "Dinheiro"
        );
        // "Cartão de Débito" and "Cartão de Crédito" share the prefix
        assert!(resolve_method(&ctx.shop.payment_methods, "cartão").is_err());
        assert!(resolve_method(&ctx.shop.payment_methods, "cartão de d").is_ok());
        assert!(resolve_method(&ctx.shop.payment_methods, "nope").is_err());
    }

    #[test]
    fn test_history_summary() {
        let mut ctx = context();
        ring_up(&mut ctx, 1.0);
        add_tender(&mut ctx, "Pix", Money::from_cents(3500)).unwrap();
        finalize(&mut ctx, &mut ConsolePrinter::new()).unwrap();

        let today = Utc::now().date_naive();
        let out = history(&ctx, today, None);
        assert!(out.contains("1 sale(s)"));
        assert!(out.contains("#000001"));

        let none = history(&ctx, today, Some("zzz"));
        assert!(none.contains("No sales"));
    }

    #[test]
    fn test_reprint_unknown_sale() {
        let ctx = context();
        let err = reprint(&ctx, "000404", &mut ConsolePrinter::new()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
