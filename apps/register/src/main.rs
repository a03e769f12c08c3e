//! # Pawshop Register Entry Point
//!
//! Binary wrapper; the actual bootstrap lives in lib.rs for testability.

use std::process;

fn main() {
    if let Err(e) = pawshop_register::run() {
        eprintln!("pawshop-register: {}", e);
        process::exit(1);
    }
}
