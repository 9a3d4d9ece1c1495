use crate::domain::session::{SESSION_KEYS, Session, SessionState, TOKEN_EXPIRES_KEY, TOKEN_KEY, USERNAME_KEY};
use crate::storage::{KeyValueStore, StorageError};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use time::OffsetDateTime;

pub const LOGOUT_PROMPT: &str = "确定要退出登录吗？";

pub trait Clock: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
    }
}

/// Client-side navigation to the login page.
pub trait Navigator: Send + Sync + fmt::Debug {
    fn to_login(&self, login_url: &str);
}

/// Interactive yes/no prompt.
pub trait Confirmation: Send + Sync + fmt::Debug {
    fn confirm(&self, question: &str) -> bool;
}

/// Owns the persisted bearer token and gates protected pages.
///
/// Expiry is evaluated lazily on each check; nothing runs in the background.
#[derive(Clone, Debug)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    navigator: Arc<dyn Navigator>,
    confirmation: Arc<dyn Confirmation>,
    login_url: String,
    /// Set once a rejection has sent the user to login; cleared by `establish`.
    expired: Arc<AtomicBool>,
}

impl SessionService {
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        confirmation: Arc<dyn Confirmation>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            navigator,
            confirmation,
            login_url: login_url.into(),
            expired: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    #[must_use]
    pub fn session(&self) -> Session {
        Session::load(self.store.as_ref())
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session().state_at(self.clock.now_ms())
    }

    #[must_use]
    pub fn has_valid_session(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    #[must_use]
    pub fn username(&self) -> String {
        self.session().display_name().to_string()
    }

    /// `Authorization: Bearer <token>` when a token is stored, else an empty map.
    ///
    /// The token is attached even if it has expired; the server decides.
    #[must_use]
    pub fn authorization_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(token) = self.session().token else {
            return headers;
        };

        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => tracing::warn!("Stored token is not a valid header value, sending request unauthenticated"),
        }
        headers
    }

    /// Page guard. Navigates to the login page and returns `false` when the
    /// caller must abort its initialization.
    #[must_use]
    pub fn require_session(&self) -> bool {
        if self.has_valid_session() {
            return true;
        }
        tracing::info!("No valid session, redirecting to login");
        self.navigator.to_login(&self.login_url);
        false
    }

    /// Removes every session key. Idempotent.
    ///
    /// # Errors
    /// Returns the first storage failure; the remaining keys are still attempted.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let mut first_err = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(error = %e, key, "Failed to remove session key");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Asks for confirmation, then clears the session and navigates to login.
    /// Returns `false` if the user cancelled; nothing changes in that case.
    ///
    /// # Errors
    /// Returns an error if the session could not be cleared.
    pub fn logout(&self) -> Result<bool, StorageError> {
        if !self.confirmation.confirm(LOGOUT_PROMPT) {
            tracing::debug!("Logout cancelled");
            return Ok(false);
        }
        self.clear_session()?;
        tracing::info!("Logged out");
        self.navigator.to_login(&self.login_url);
        Ok(true)
    }

    /// Forced logout after the API rejected the token. Concurrent rejections
    /// of the same session navigate only once.
    pub(crate) fn expire(&self) {
        if let Err(e) = self.clear_session() {
            tracing::warn!(error = %e, "Session could not be fully cleared after rejection");
        }
        if !self.expired.swap(true, Ordering::SeqCst) {
            self.navigator.to_login(&self.login_url);
        }
    }

    /// Records a freshly issued token. Token and expiry are written together.
    ///
    /// # Errors
    /// Returns an error if the session could not be persisted; any partial write is rolled back.
    pub fn establish(&self, token: &str, expires_in_secs: i64, username: &str) -> Result<(), StorageError> {
        let expires_at_ms = self.clock.now_ms().saturating_add(expires_in_secs.saturating_mul(1_000));

        let written = self
            .store
            .set(TOKEN_KEY, token)
            .and_then(|()| self.store.set(TOKEN_EXPIRES_KEY, &expires_at_ms.to_string()))
            .and_then(|()| self.store.set(USERNAME_KEY, username));

        if let Err(e) = written {
            let _ = self.clear_session();
            return Err(e);
        }
        self.expired.store(false, Ordering::SeqCst);
        tracing::info!(username, expires_at_ms, "Session established");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FixedClock(AtomicI64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Debug, Default)]
    struct RecordingNavigator {
        visits: AtomicUsize,
        last: Mutex<Option<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn to_login(&self, login_url: &str) {
            self.visits.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(login_url.to_string());
        }
    }

    #[derive(Debug)]
    struct Answer(AtomicBool);

    impl Confirmation for Answer {
        fn confirm(&self, _question: &str) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct Harness {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        navigator: Arc<RecordingNavigator>,
        service: SessionService,
    }

    fn harness(confirm: bool) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock(AtomicI64::new(1_000_000)));
        let navigator = Arc::new(RecordingNavigator::default());
        let service = SessionService::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            Arc::new(Answer(AtomicBool::new(confirm))),
            "/login.html",
        )
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
        Harness { store, clock, navigator, service }
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let h = harness(true);
        h.store.set(TOKEN_KEY, "tok").unwrap();
        h.store.set(TOKEN_EXPIRES_KEY, "1000000").unwrap();
        assert!(!h.service.has_valid_session());

        h.store.set(TOKEN_EXPIRES_KEY, "999999").unwrap();
        assert!(!h.service.has_valid_session());
    }

    #[test]
    fn test_future_token_is_valid_and_sent() {
        let h = harness(true);
        h.store.set(TOKEN_KEY, "tok").unwrap();
        h.store.set(TOKEN_EXPIRES_KEY, "1000001").unwrap();

        assert!(h.service.has_valid_session());
        let headers = h.service.authorization_headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[test]
    fn test_expiry_detected_lazily() {
        let h = harness(true);
        h.service.establish("tok", 60, "ops").unwrap();
        assert!(h.service.has_valid_session());

        assert_eq!(h.service.state(), SessionState::Authenticated);

        h.clock.0.store(1_000_000 + 60_000, Ordering::SeqCst);
        assert!(!h.service.has_valid_session());
        assert_eq!(h.service.state(), SessionState::Unauthenticated);
        // Nothing was cleared; the record simply no longer counts.
        assert_eq!(h.store.get(TOKEN_KEY).as_deref(), Some("tok"));
    }

    #[test]
    fn test_missing_token_gives_no_headers() {
        let h = harness(true);
        assert!(h.service.authorization_headers().is_empty());
    }

    #[test]
    fn test_clear_then_invalid() {
        let h = harness(true);
        h.service.establish("tok", 3600, "ops").unwrap();
        h.service.clear_session().unwrap();
        h.service.clear_session().unwrap();

        assert!(!h.service.has_valid_session());
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_require_session_redirects() {
        let h = harness(true);
        assert!(!h.service.require_session());
        assert_eq!(h.navigator.visits.load(Ordering::SeqCst), 1);
        assert_eq!(h.navigator.last.lock().unwrap().as_deref(), Some("/login.html"));

        h.service.establish("tok", 3600, "ops").unwrap();
        assert!(h.service.require_session());
        assert_eq!(h.navigator.visits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logout_cancelled_keeps_state() {
        let h = harness(false);
        h.service.establish("tok", 3600, "ops").unwrap();

        assert!(!h.service.logout().unwrap());
        assert!(h.service.has_valid_session());
        assert_eq!(h.navigator.visits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_logout_confirmed_clears_and_redirects() {
        let h = harness(true);
        h.service.establish("tok", 3600, "ops").unwrap();

        assert!(h.service.logout().unwrap());
        assert!(h.store.is_empty());
        assert_eq!(h.navigator.visits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_repeated_rejection_navigates_once() {
        let h = harness(true);
        h.service.establish("tok", 3600, "ops").unwrap();
        h.service.expire();
        h.service.expire();
        assert!(h.store.is_empty());
        assert_eq!(h.navigator.visits.load(Ordering::SeqCst), 1);

        h.service.establish("tok2", 3600, "ops").unwrap();
        h.service.expire();
        assert_eq!(h.navigator.visits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_username_defaults() {
        let h = harness(true);
        assert_eq!(h.service.username(), "Admin");
        h.service.establish("tok", 3600, "ops").unwrap();
        assert_eq!(h.service.username(), "ops");
    }
}
