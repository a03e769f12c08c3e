//! # Console Printer
//!
//! The register's print surface: the rendered receipt goes to the terminal
//! between cut marks. Swapping in a real thermal driver means implementing
//! [`ReceiptPrinter`] somewhere else; nothing upstream changes.

use pawshop_core::receipt::{PrintError, ReceiptPrinter, RECEIPT_WIDTH};

/// Prints receipts to stdout.
#[derive(Debug, Default)]
pub struct ConsolePrinter;

impl ConsolePrinter {
    /// Creates a console printer.
    pub fn new() -> Self {
        ConsolePrinter
    }
}

impl ReceiptPrinter for ConsolePrinter {
    fn print(&mut self, rendered: &str) -> Result<(), PrintError> {
        let cut = "=".repeat(RECEIPT_WIDTH);
        println!("{}", cut);
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
        println!("{}", cut);
        Ok(())
    }
}
