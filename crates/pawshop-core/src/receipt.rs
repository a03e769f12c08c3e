//! # Receipt
//!
//! Plain-text projection of a committed sale, and the print surface the
//! register hands it to.
//!
//! Rendering is pure: the same sale and company info always produce the
//! same text, and nothing here feeds back into shop state. The print action
//! itself (a browser dialog, a thermal driver, a console) lives behind
//! [`ReceiptPrinter`], implemented outside this crate.
//!
//! ## Layout (40 columns)
//! ```text
//!               PAWSHOP PET
//!        CNPJ/CPF: 00.000.000/0001-00
//!        Rua dos Pets, 123 - Centro
//! ----------------------------------------
//! VENDA #000042        14/03/2026 15:30
//! ----------------------------------------
//! Ração Golden Adulto Frango (Granel)
//!   0.541 kg x R$ 18.50        R$ 10.00
//! Shampoo Neutro 500ml
//!   1 un x R$ 32.00            R$ 32.00
//! ----------------------------------------
//! TOTAL                        R$ 42.00
//! Dinheiro                     R$ 50.00
//! TROCO                        R$ 8.00
//! ----------------------------------------
//!               *000042*
//!       OBRIGADO PELA PREFERENCIA!
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::{CompanyInfo, Sale};

/// Receipt column width (40-column thermal paper).
pub const RECEIPT_WIDTH: usize = 40;

// =============================================================================
// Print Surface
// =============================================================================

/// Print failure reported by a [`ReceiptPrinter`] implementation.
#[derive(Debug, Error)]
#[error("printer unavailable: {0}")]
pub struct PrintError(pub String);

/// The surface a rendered receipt is pushed to.
///
/// The core renders; the app decides what "print" means (console, file,
/// system dialog). Implementations must not feed anything back into state.
pub trait ReceiptPrinter {
    fn print(&mut self, rendered: &str) -> Result<(), PrintError>;
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a sale as a printable plain-text receipt.
pub fn render_receipt(sale: &Sale, company: &CompanyInfo) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RECEIPT_WIDTH);

    // Header: company identity
    out.push_str(&center(&company.name.to_uppercase()));
    out.push_str(&center(&format!("CNPJ/CPF: {}", company.document)));
    out.push_str(&center(&company.address));
    if let Some(phone) = &company.phone {
        out.push_str(&center(phone));
    }
    out.push_str(&rule);
    out.push('\n');

    // Sale identity line
    let stamp = sale.timestamp.format("%d/%m/%Y %H:%M");
    out.push_str(&spread(&format!("VENDA #{}", sale.id), &stamp.to_string()));
    if let Some(customer) = &sale.customer_name {
        out.push_str(&spread("CLIENTE", customer));
    }
    out.push_str(&rule);
    out.push('\n');

    // Itemized lines: name, then quantity × unit price = line total
    for item in &sale.items {
        out.push_str(&item.name);
        out.push('\n');
        let qty = item.unit_type.format_quantity(item.quantity);
        let unit = match item.unit_type {
            crate::types::UnitType::Kg => "kg",
            crate::types::UnitType::Un => "un",
        };
        let left = format!("  {} {} x {}", qty, unit, item.unit_price());
        out.push_str(&spread(&left, &item.line_total().to_string()));
    }
    out.push_str(&rule);
    out.push('\n');

    // Totals and payment breakdown
    out.push_str(&spread("TOTAL", &sale.total().to_string()));
    for payment in &sale.payments {
        out.push_str(&spread(
            &payment.method,
            &Money::from_cents(payment.amount_cents).to_string(),
        ));
    }
    if sale.change().is_positive() {
        out.push_str(&spread("TROCO", &sale.change().to_string()));
    }
    out.push_str(&rule);
    out.push('\n');

    // Scannable sale code and footer
    out.push_str(&center(&format!("*{}*", sale.id)));
    out.push_str(&center("OBRIGADO PELA PREFERENCIA!"));

    out
}

/// Centers a line within the receipt width.
fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= RECEIPT_WIDTH {
        return format!("{}\n", text);
    }
    let pad = (RECEIPT_WIDTH - len) / 2;
    format!("{}{}\n", " ".repeat(pad), text)
}

/// Left text, right text, padded apart to the receipt width.
fn spread(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    if used >= RECEIPT_WIDTH {
        return format!("{} {}\n", left, right);
    }
    format!("{}{}{}\n", left, " ".repeat(RECEIPT_WIDTH - used), right)
}

// =============================================================================
// Unit Tests
// =============================================================================
