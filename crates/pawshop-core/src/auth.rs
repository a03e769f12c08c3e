//! # Credential Check
//!
//! Plaintext username/password matching for the login gate. Hardening this
//! (hashing, lockout, roles) is an explicit non-goal; the check exists so
//! the register can refuse a session, nothing more.

use crate::types::Credential;

/// Returns true when the pair matches a stored credential exactly.
pub fn verify_credentials(users: &[Credential], username: &str, password: &str) -> bool {
    users
        .iter()
        .any(|u| u.username == username && u.password == password)
}

/// First run: no users registered yet, so the login screen must switch to
/// admin registration.
pub fn needs_registration(users: &[Credential]) -> bool {
    users.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<Credential> {
        vec![Credential {
            username: "admin".to_string(),
            password: "segredo".to_string(),
        }]
    }

    #[test]
    fn test_verify_credentials() {
        let users = users();
        assert!(verify_credentials(&users, "admin", "segredo"));
        assert!(!verify_credentials(&users, "admin", "errada"));
        assert!(!verify_credentials(&users, "outro", "segredo"));
        assert!(!verify_credentials(&[], "admin", "segredo"));
    }

    #[test]
    fn test_needs_registration_only_when_empty() {
        assert!(needs_registration(&[]));
        assert!(!needs_registration(&users()));
    }
}
