use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "admin_token";
pub const TOKEN_EXPIRES_KEY: &str = "token_expires";
pub const USERNAME_KEY: &str = "admin_username";

/// Every key owned by the session; cleared together.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, TOKEN_EXPIRES_KEY, USERNAME_KEY];

pub const DEFAULT_USERNAME: &str = "Admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Snapshot of the persisted session record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub expires_at_ms: i64,
    pub username: Option<String>,
}

impl Session {
    /// Reads the session keys. A missing or unparseable expiry reads as `0`.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let expires_at_ms = store.get(TOKEN_EXPIRES_KEY).and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0);

        Self {
            token: store.get(TOKEN_KEY).filter(|t| !t.is_empty()),
            expires_at_ms,
            username: store.get(USERNAME_KEY).filter(|u| !u.is_empty()),
        }
    }

    #[must_use]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.token.is_some() && self.expires_at_ms > now_ms
    }

    #[must_use]
    pub fn state_at(&self, now_ms: i64) -> SessionState {
        if self.is_valid_at(now_ms) { SessionState::Authenticated } else { SessionState::Unauthenticated }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }
}
