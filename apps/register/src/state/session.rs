//! # Operator Session
//!
//! Login state, persisted so that reopening the register resumes the
//! session (the stored value is just the username).

use tracing::info;

use pawshop_core::auth::{needs_registration, verify_credentials};
use pawshop_store::{Store, StoreResult};

use crate::error::ShellError;

/// The logged-in operator, if any.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<String>,
}

impl Session {
    /// Resumes a persisted session, if one exists.
    pub fn resume(store: &Store) -> Self {
        Session {
            current_user: store.load_session(),
        }
    }

    /// The logged-in operator's username.
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Whether someone is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Whether the login screen should offer registration instead (no users
    /// exist yet - first run).
    pub fn needs_registration(store: &Store) -> bool {
        needs_registration(&store.load_users())
    }

    /// Checks credentials and opens a session.
    pub fn login(
        &mut self,
        store: &Store,
        username: &str,
        password: &str,
    ) -> Result<(), ShellError> {
        let users = store.load_users();
        if !verify_credentials(&users, username, password) {
            return Err(ShellError::auth("Invalid username or password"));
        }

        store.save_session(username)?;
        self.current_user = Some(username.to_string());
        info!(username, "Operator logged in");
        Ok(())
    }

    /// Ends the session.
    pub fn logout(&mut self, store: &Store) -> StoreResult<()> {
        if let Some(username) = self.current_user.take() {
            info!(username = %username, "Operator logged out");
        }
        store.clear_session()
    }
}
