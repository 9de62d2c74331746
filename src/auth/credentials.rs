use crate::stores::admin_store::AdminStore;
use crate::utils::auth::constant_time_eq;
use std::sync::Arc;

/// Decides whether a username/password pair belongs to an administrator
///
/// `AdminSession` only talks to this trait, so a hashing implementation can
/// replace `PlaintextVerifier` without touching the session logic.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Compares against passwords stored as plaintext in the admin store
pub struct PlaintextVerifier {
    admins: Arc<AdminStore>,
}

impl PlaintextVerifier {
    pub fn new(admins: Arc<AdminStore>) -> Self {
        Self { admins }
    }
}

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, username: &str, password: &str) -> bool {
        match self.admins.get(username) {
            Some(account) => constant_time_eq(password, &account.password),
            None => false,
        }
    }
}
