//! # Settings Commands
//!
//! Payment methods, company identity, user registration and backup.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use pawshop_core::types::FeeRate;
use pawshop_store::{export_backup, import_backup};

use super::CommandResult;
use crate::error::ShellError;
use crate::state::AppContext;

// =============================================================================
// Payment Methods
// =============================================================================

/// Lists the configured payment methods with their fees.
pub fn methods(ctx: &AppContext) -> CommandResult {
    let methods = ctx.store.settings().payment_methods();
    let mut out = format!("{} payment method(s)\n", methods.len());
    for m in &methods {
        out.push_str(&format!(
            "  {}  {} {:<20} taxa {:.2}%\n",
            m.id,
            m.icon,
            m.name,
            m.fee_rate().percentage()
        ));
    }
    Ok(out)
}

/// Adds a payment method with a fee given in percent (e.g. 1.9).
pub fn method_add(ctx: &mut AppContext, name: &str, fee_percent: f64) -> CommandResult {
    let rate = FeeRate::from_percentage(fee_percent);
    let method = ctx.store.settings().add_payment_method(name, rate.bps())?;
    ctx.reload();
    Ok(format!(
        "Method '{}' added (taxa {:.2}%)",
        method.name,
        method.fee_rate().percentage()
    ))
}

/// Removes a payment method by id.
pub fn method_remove(ctx: &mut AppContext, id: &str) -> CommandResult {
    ctx.store.settings().remove_payment_method(id)?;
    ctx.reload();
    Ok(format!("Method {} removed", id))
}

/// Updates a method's fee. Historical sales keep their snapshots.
pub fn method_fee(ctx: &mut AppContext, id: &str, fee_percent: f64) -> CommandResult {
    let rate = FeeRate::from_percentage(fee_percent);
    ctx.store.settings().set_payment_method_fee(id, rate.bps())?;
    ctx.reload();
    Ok(format!("Fee updated to {:.2}% (future sales only)", rate.percentage()))
}

// =============================================================================
// Company Info
// =============================================================================

/// Shows the receipt header data.
pub fn company(ctx: &AppContext) -> CommandResult {
    let company = ctx.store.settings().company();
    Ok(format!(
        "{}\nCNPJ/CPF: {}\n{}\n{}",
        company.name,
        company.document,
        company.address,
        company.phone.as_deref().unwrap_or("-")
    ))
}

/// Edits one field of the company record in place.
pub fn company_set(ctx: &mut AppContext, field: &str, value: &str) -> CommandResult {
    let mut company = ctx.store.settings().company();
    match field {
        "name" => company.name = value.to_string(),
        "document" => company.document = value.to_string(),
        "address" => company.address = value.to_string(),
        "phone" => company.phone = Some(value.to_string()),
        other => {
            return Err(ShellError::usage(format!(
                "Unknown company field '{}' (name, document, address, phone)",
                other
            )))
        }
    }
    ctx.store.settings().save_company(&company)?;
    Ok(format!("Company {} updated", field))
}

// =============================================================================
// Users
// =============================================================================

/// Registers an operator account.
pub fn register_user(
    ctx: &mut AppContext,
    username: &str,
    password: &str,
    confirmation: &str,
) -> CommandResult {
    ctx.store
        .settings()
        .register_user(username, password, confirmation)?;
    Ok(format!("User '{}' registered", username))
}

// =============================================================================
// Backup
// =============================================================================

/// Exports the whole persisted state to a JSON file.
pub fn backup_export(ctx: &AppContext, path: &Path) -> CommandResult {
    let json = export_backup(&ctx.store, Utc::now())?;
    fs::write(path, &json).map_err(|e| {
        ShellError::new(
            crate::error::ErrorCode::StorageError,
            format!("Could not write backup file: {}", e),
        )
    })?;
    info!(path = %path.display(), "Backup written");
    Ok(format!("Backup written to {}", path.display()))
}

/// Restores a backup file, overwriting ALL current data.
///
/// The shell confirms before calling; from here on it is unconditional.
pub fn backup_import(ctx: &mut AppContext, path: &Path) -> CommandResult {
    let raw = fs::read_to_string(path).map_err(|e| {
        ShellError::new(
            crate::error::ErrorCode::StorageError,
            format!("Could not read backup file: {}", e),
        )
    })?;

    let document = import_backup(&ctx.store, &raw)?;
    ctx.checkout.abort();
    ctx.reload();

    Ok(format!(
        "Backup restored: {} products, {} sales, {} customers (taken {})",
        document.products.len(),
        document.sales.len(),
        document.customers.len(),
        document.date.format("%d/%m/%Y %H:%M")
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppContext;
    use pawshop_store::Store;

    #[test]
    fn test_method_lifecycle() {
        let mut ctx = AppContext::new(Store::in_memory());

        method_add(&mut ctx, "Vale Pet", 2.5).unwrap();
        assert_eq!(ctx.shop.payment_methods.len(), 5);

        let id = ctx.shop.payment_methods[4].id.clone();
        method_fee(&mut ctx, &id, 3.0).unwrap();
        assert_eq!(ctx.shop.payment_methods[4].fee_bps, 300);

        method_remove(&mut ctx, &id).unwrap();
        assert_eq!(ctx.shop.payment_methods.len(), 4);
    }

    #[test]
    fn test_company_set() {
        let mut ctx = AppContext::new(Store::in_memory());

        company_set(&mut ctx, "name", "Pawshop Pet & Ração").unwrap();
        assert!(company(&ctx).unwrap().contains("Pawshop Pet & Ração"));

        assert!(company_set(&mut ctx, "cnpj", "x").is_err());
    }

    #[test]
    fn test_backup_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut source = AppContext::new(Store::in_memory());
        method_add(&mut source, "Vale Pet", 2.5).unwrap();
        backup_export(&source, &path).unwrap();

        let mut target = AppContext::new(Store::in_memory());
        let message = backup_import(&mut target, &path).unwrap();
        assert!(message.contains("Backup restored"));
        assert_eq!(target.shop.payment_methods.len(), 5);
    }

    #[test]
    fn test_backup_import_missing_file() {
        let mut ctx = AppContext::new(Store::in_memory());
        assert!(backup_import(&mut ctx, Path::new("/nonexistent/backup.json")).is_err());
    }
}
