use crate::auth::credentials::CredentialVerifier;
use crate::core::error::ReservationError;
use crate::utils::time::{current_timestamp, is_expired};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;
use rand::Rng;

/// Bytes of randomness in a session token
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn { username: String },
}

/// Authentication state of one caller
#[derive(Debug, Clone)]
pub struct AdminSession {
    state: SessionState,
}

impl AdminSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::LoggedOut,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// A failed attempt leaves the current state untouched
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<(), ReservationError> {
        if !verifier.verify(username, password) {
            return Err(ReservationError::AuthFailure);
        }

        self.state = SessionState::LoggedIn {
            username: username.to_string(),
        };
        Ok(())
    }

    pub fn logout(&mut self) {
        self.state = SessionState::LoggedOut;
    }

    /// Gate for admin-only operations; returns the logged-in username
    pub fn require_logged_in(&self) -> Result<&str, ReservationError> {
        match &self.state {
            SessionState::LoggedIn { username } => Ok(username.as_str()),
            SessionState::LoggedOut => Err(ReservationError::Unauthorized),
        }
    }
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new()
    }
}

struct SessionEntry {
    session: AdminSession,
    last_seen: i64,
}

/// Live admin sessions keyed by an opaque random token
///
/// The token travels in a cookie; a caller without a known token is
/// treated as logged out.
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    cookie_name: String,
}

impl SessionStore {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            cookie_name: cookie_name.into(),
        }
    }

    /// Store a session under a fresh token and return the token
    pub fn insert(&self, session: AdminSession) -> String {
        let token = new_token();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                session,
                last_seen: current_timestamp(),
            },
        );
        token
    }

    /// Look up a session, refreshing its idle timer
    ///
    /// Unknown tokens yield a logged-out session.
    pub fn get(&self, token: &str) -> AdminSession {
        match self.sessions.get_mut(token) {
            Some(mut entry) => {
                entry.last_seen = current_timestamp();
                entry.session.clone()
            }
            None => AdminSession::new(),
        }
    }

    /// Session for the caller that sent `jar`
    pub fn from_jar(&self, jar: &CookieJar) -> AdminSession {
        match self.token_from_jar(jar) {
            Some(token) => self.get(&token),
            None => AdminSession::new(),
        }
    }

    pub fn remove(&self, token: &str) -> Option<AdminSession> {
        self.sessions.remove(token).map(|(_, entry)| entry.session)
    }

    pub fn token_from_jar(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.cookie_name)
            .map(|cookie| cookie.value().to_string())
    }

    /// Cookie carrying `token`, scoped to the whole site and hidden from scripts
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .build()
    }

    /// Pass to `CookieJar::remove` to expire the session cookie
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), String::new()))
            .path("/")
            .build()
    }

    /// Drop sessions idle for longer than `timeout` seconds
    pub fn cleanup_expired(&self, timeout: i64) -> usize {
        let now = current_timestamp();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| !is_expired(entry.last_seen, timeout, now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    fn backdate(&self, token: &str, seconds: i64) {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            entry.last_seen -= seconds;
        }
    }
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
