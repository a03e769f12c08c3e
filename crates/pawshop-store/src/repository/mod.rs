//! # Repositories
//!
//! Per-collection operations over the key-value store. Each repository
//! load-modifies-saves its whole collection; with a single local operator
//! that unit-of-work granularity is the concurrency model (see the
//! crate-level notes in `backend`).

pub mod customer;
pub mod product;
pub mod sale;
pub mod settings;
