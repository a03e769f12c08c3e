//! # State Module
//!
//! Session-lifetime state for the register app.
//!
//! ## State Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Register State                                    │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────────┐  │
//! │  │  AppContext  │  │ CheckoutSession  │  │       Session            │  │
//! │  │              │  │                  │  │                          │  │
//! │  │ Store handle │  │ cart, tenders,   │  │ logged-in operator       │  │
//! │  │ + cached     │  │ customer, edit   │  │ (persisted so a restart  │  │
//! │  │ ShopState    │  │ context          │  │  resumes the session)    │  │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY: none needed. One operator, one thread, and every       │
//! │  command runs to completion before the next line is read.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod session;

pub use checkout::CheckoutSession;
pub use session::Session;

use pawshop_core::ShopState;
use pawshop_store::{Store, StoreResult};

/// Everything a command handler can touch.
#[derive(Debug)]
pub struct AppContext {
    /// Persistence handle.
    pub store: Store,

    /// Cached mirror of the persisted engine state. Commands treat this as
    /// the truth and write through [`AppContext::commit`].
    pub shop: ShopState,

    /// Logged-in operator.
    pub session: Session,

    /// The in-progress checkout (cart, tenders, customer, edit context).
    pub checkout: CheckoutSession,
}

impl AppContext {
    /// Loads state from the store and resumes any persisted session.
    pub fn new(store: Store) -> Self {
        let shop = store.load_shop_state();
        let session = Session::resume(&store);
        AppContext {
            store,
            shop,
            session,
            checkout: CheckoutSession::new(),
        }
    }

    /// Persists an engine-produced next state and adopts it as current.
    pub fn commit(&mut self, next: ShopState) -> StoreResult<()> {
        self.store.save_shop_state(&next)?;
        self.shop = next;
        Ok(())
    }

    /// Re-reads the shop state after repository-level writes (CRUD screens,
    /// backup import).
    pub fn reload(&mut self) {
        self.shop = self.store.load_shop_state();
    }
}
