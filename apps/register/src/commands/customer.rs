//! # Customer Commands
//!
//! Customer register plumbing.

use pawshop_core::types::Customer;
use pawshop_store::repository::customer::generate_customer_id;

use super::CommandResult;
use crate::error::ShellError;
use crate::state::AppContext;

/// Lists all customers.
pub fn list(ctx: &AppContext) -> CommandResult {
    let customers = ctx.store.customers().all();
    if customers.is_empty() {
        return Ok("No customers".to_string());
    }

    let mut out = format!("{} customer(s)\n", customers.len());
    for c in &customers {
        out.push_str(&format!(
            "  {}  {:<28} {:<18} {}\n",
            c.id,
            c.name,
            c.phone,
            c.email.as_deref().unwrap_or("-")
        ));
    }
    Ok(out)
}

/// Registers a new customer.
pub fn add(ctx: &mut AppContext, name: &str, phone: &str) -> CommandResult {
    let customer = Customer {
        id: generate_customer_id(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        document: None,
    };
    ctx.store.customers().upsert(customer)?;
    Ok(format!("Customer {} registered", name))
}

/// Deletes a customer by id. Confirmation happens in the shell; historical
/// sales keep the denormalized name on purpose.
pub fn delete(ctx: &mut AppContext, id: &str) -> CommandResult {
    ctx.store.customers().delete(id)?;

    // If the deleted customer is attached to the open checkout, drop it
    if ctx
        .checkout
        .customer
        .as_ref()
        .map(|c| c.id == id)
        .unwrap_or(false)
    {
        ctx.checkout.customer = None;
    }
    Ok(format!("Customer {} deleted", id))
}

/// Finds a customer by id (used by shell helpers).
pub fn get(ctx: &AppContext, id: &str) -> Result<Customer, ShellError> {
    ctx.store
        .customers()
        .get(id)
        .ok_or_else(|| ShellError::not_found("Customer", id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pawshop_core::checkout::CustomerRef;
    use pawshop_store::Store;

    #[test]
    fn test_add_list_delete() {
        let mut ctx = AppContext::new(Store::in_memory());

        add(&mut ctx, "Maria Silva", "(11) 99999-0000").unwrap();
        let out = list(&ctx).unwrap();
        assert!(out.contains("Maria Silva"));

        let id = ctx.store.customers().all()[0].id.clone();
        delete(&mut ctx, &id).unwrap();
        assert_eq!(list(&ctx).unwrap(), "No customers");
    }

    #[test]
    fn test_delete_detaches_from_open_checkout() {
        let mut ctx = AppContext::new(Store::in_memory());
        add(&mut ctx, "Maria", "(11) 99999-0000").unwrap();
        let id = ctx.store.customers().all()[0].id.clone();

        ctx.checkout.customer = Some(CustomerRef {
            id: id.clone(),
            name: "Maria".to_string(),
        });

        delete(&mut ctx, &id).unwrap();
        assert!(ctx.checkout.customer.is_none());
    }

    #[test]
    fn test_phone_required() {
        let mut ctx = AppContext::new(Store::in_memory());
        assert!(add(&mut ctx, "Maria", "  ").is_err());
    }
}
