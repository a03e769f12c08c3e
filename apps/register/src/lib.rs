//! # Pawshop Register Library
//!
//! Core library for the Pawshop POS register application.
//! This is the entry point that wires storage, state and the shell.
//!
//! ## Module Organization
//! ```text
//! pawshop_register/
//! ├── lib.rs          ◄─── You are here (bootstrap & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppContext (store + cached shop state)
//! │   ├── session.rs  ◄─── Operator login session
//! │   └── checkout.rs ◄─── In-progress cart/tenders/edit context
//! ├── commands/
//! │   ├── cart.rs     ◄─── Scan/add/bulk/qty/price commands
//! │   ├── sale.rs     ◄─── Tender/finalize/edit/cancel/history
//! │   ├── product.rs  ◄─── Inventory CRUD
//! │   ├── customer.rs ◄─── Customer CRUD
//! │   ├── report.rs   ◄─── Financial report rendering
//! │   └── config.rs   ◄─── Methods/company/users/backup
//! ├── shell.rs        ◄─── Line REPL + confirmation gates
//! ├── printer.rs      ◄─── Console receipt printer
//! └── error.rs        ◄─── ShellError for command results
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Determine the data directory (env override or platform app-data dir)
//! 3. Open the store and load shop state
//! 4. Resume any persisted operator session
//! 5. Run the shell loop

pub mod commands;
pub mod error;
pub mod printer;
pub mod shell;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pawshop_store::{Store, StoreConfig};

use crate::state::AppContext;

/// Environment variable overriding the data directory (shared with the
/// `seed` binary).
pub const DATA_DIR_ENV: &str = "PAWSHOP_DATA_DIR";

/// Boots the register and runs the shell until the operator quits.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug for verbose output; default keeps the screen quiet
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = resolve_data_dir();
    info!(dir = %data_dir.display(), "Starting Pawshop register");

    let store = Store::open(StoreConfig::new(&data_dir))?;
    let mut ctx = AppContext::new(store);

    shell::run(&mut ctx)?;

    info!("Register closed");
    Ok(())
}

/// Environment override first, then the platform app-data directory, then a
/// local folder as the last resort.
fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    ProjectDirs::from("com", "pawshop", "pawshop-pos")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./pawshop-data"))
}
