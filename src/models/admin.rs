/// Administrator credentials as stored in the log
///
/// The password is kept in plaintext; only `PlaintextVerifier` reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl AdminAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
