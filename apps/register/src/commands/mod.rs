//! # Command Handlers
//!
//! One module per screen of the original register. Every handler takes the
//! [`crate::state::AppContext`], validates, delegates to pawshop-core /
//! pawshop-store, and returns the text to show the operator.
//!
//! Handlers never prompt: confirmation of destructive actions (delete,
//! cancel sale, restore backup) happens in the shell BEFORE the handler is
//! called, and the handlers perform the mutation unconditionally.

pub mod cart;
pub mod config;
pub mod customer;
pub mod product;
pub mod report;
pub mod sale;

use crate::error::ShellError;

/// What every command returns: text for the operator.
pub type CommandResult = Result<String, ShellError>;
