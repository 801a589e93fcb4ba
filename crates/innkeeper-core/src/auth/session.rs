use std::sync::{Arc, Weak};
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::store::KeyValueStore;

/// Store key holding the bearer credential
pub const TOKEN_KEY: &str = "token";

/// Store key holding the RFC 3339 expiry of the persisted token
pub const EXPIRES_AT_KEY: &str = "token_expires_at";

/// Session length granted after a successful login, in hours.
/// Matches the validity window the hotel API issues tokens for.
pub const DEFAULT_SESSION_HOURS: i64 = 2;

/// How a persisted token is treated when the application starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Any stored token counts as a live session. No expiry timer is armed.
    #[default]
    Optimistic,
    /// Honour the stored expiry: drop a lapsed token, re-arm the timer otherwise.
    EnforceExpiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

#[derive(Default)]
struct SessionInner {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    expiry_task: Option<JoinHandle<()>>,
    // Bumped on every login/logout; an expiry task only acts on its own generation
    generation: u64,
}

impl SessionInner {
    fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn cancel_expiry(&mut self) {
        if let Some(task) = self.expiry_task.take() {
            task.abort();
            debug!(generation = self.generation, "Cancelled pending session expiry");
        }
    }
}

struct Shared {
    store: Arc<dyn KeyValueStore>,
    inner: Mutex<SessionInner>,
    state_tx: watch::Sender<SessionState>,
}

impl Shared {
    fn clear(&self, inner: &mut SessionInner) {
        inner.cancel_expiry();
        inner.generation += 1;
        inner.token = None;
        inner.expires_at = None;

        for key in [TOKEN_KEY, EXPIRES_AT_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(error = %e, key, "Failed to remove persisted session key");
            }
        }

        self.state_tx.send_if_modified(|state| {
            let changed = *state != SessionState::LoggedOut;
            *state = SessionState::LoggedOut;
            changed
        });
    }

    fn expire(&self, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            debug!(generation, current = inner.generation, "Ignoring stale session expiry");
            return;
        }
        // This task is the one running; detach rather than abort it
        inner.expiry_task.take();
        self.clear(&mut inner);
        info!("Session expired, logged out");
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.inner.get_mut().cancel_expiry();
    }
}

/// The single source of truth for whether staff are signed in.
///
/// Construct one per process and hand clones to whatever needs it; clones
/// share state. [`login`](Self::login) arms a one-shot expiry task that logs
/// the session out when the token lapses. Any later `login` or `logout`
/// cancels that task, so overlapping sessions never see a stale expiry.
///
/// `login`, and `restore` under [`RestorePolicy::EnforceExpiry`], spawn onto
/// the ambient tokio runtime and must be called from within one.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<Shared>,
}

impl SessionManager {
    /// Start logged out without consulting the store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::LoggedOut);
        Self {
            shared: Arc::new(Shared {
                store,
                inner: Mutex::new(SessionInner::default()),
                state_tx,
            }),
        }
    }

    /// Hydrate from whatever a previous run left in the store.
    pub fn restore(store: Arc<dyn KeyValueStore>, policy: RestorePolicy) -> Self {
        let manager = Self::new(store);

        let token = match manager.shared.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token, starting logged out");
                None
            }
        };

        let Some(token) = token else {
            debug!("No persisted token found");
            return manager;
        };

        let expires_at = manager.stored_expiry();

        match policy {
            RestorePolicy::Optimistic => {
                let mut inner = manager.shared.inner.lock();
                inner.token = Some(token);
                inner.expires_at = expires_at;
                drop(inner);
                manager.shared.state_tx.send_replace(SessionState::LoggedIn);
                debug!("Restored persisted session without expiry check");
            }
            RestorePolicy::EnforceExpiry => match expires_at {
                Some(expires_at) if expires_at > Utc::now() => {
                    debug!(%expires_at, "Restored persisted session, re-arming expiry");
                    manager.login(token, expires_at);
                }
                _ => {
                    info!(?expires_at, "Persisted session has lapsed, discarding");
                    manager.logout();
                }
            },
        }

        manager
    }

    fn stored_expiry(&self) -> Option<DateTime<Utc>> {
        match self.shared.store.get(EXPIRES_AT_KEY) {
            Ok(Some(raw)) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    warn!(error = %e, value = %raw, "Ignoring unparseable persisted expiry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted expiry");
                None
            }
        }
    }

    /// Record a freshly issued token and schedule its automatic logout.
    ///
    /// No check is made that `expires_at` lies in the future; a lapsed expiry
    /// fires on the next turn of the runtime. An empty token is treated as a
    /// logout.
    pub fn login(&self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        let token = token.into();
        if token.is_empty() {
            warn!("Login called with an empty token, logging out instead");
            self.logout();
            return;
        }

        let remaining = remaining_until(expires_at);

        let mut inner = self.shared.inner.lock();
        inner.cancel_expiry();
        inner.generation += 1;

        if let Err(e) = self.shared.store.set(TOKEN_KEY, &token) {
            warn!(error = %e, "Failed to persist token");
        }
        if let Err(e) = self.shared.store.set(EXPIRES_AT_KEY, &expires_at.to_rfc3339()) {
            warn!(error = %e, "Failed to persist token expiry");
        }

        inner.token = Some(token);
        inner.expires_at = Some(expires_at);
        inner.expiry_task = Some(self.schedule_expiry(inner.generation, remaining));

        info!(%expires_at, remaining_ms = remaining.as_millis() as u64, "Logged in");
        drop(inner);
        self.shared.state_tx.send_replace(SessionState::LoggedIn);
    }

    /// [`login`](Self::login) with an ISO-8601 / RFC 3339 expiry string.
    pub fn login_iso(&self, token: impl Into<String>, expires_at: &str) -> Result<()> {
        let expires_at = DateTime::parse_from_rfc3339(expires_at)
            .with_context(|| format!("Invalid expiry timestamp: {}", expires_at))?
            .with_timezone(&Utc);
        self.login(token, expires_at);
        Ok(())
    }

    /// [`login`](Self::login) for a session lasting `duration` from now.
    pub fn login_for(&self, token: impl Into<String>, duration: Duration) {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(duration)
            .unwrap_or_else(|| now + Duration::hours(DEFAULT_SESSION_HOURS));
        self.login(token, expires_at);
    }

    /// Forget the token and cancel any pending expiry. Safe to call repeatedly.
    pub fn logout(&self) {
        let mut inner = self.shared.inner.lock();
        let was_authenticated = inner.is_authenticated();
        self.shared.clear(&mut inner);
        if was_authenticated {
            info!("Logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.inner.lock().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    /// Token for the `Authorization` header of outgoing requests
    pub fn current_token(&self) -> Option<String> {
        let inner = self.shared.inner.lock();
        inner.token.clone().filter(|t| !t.is_empty())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.shared.inner.lock().expires_at
    }

    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at().map(|expiry| expiry - Utc::now())
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.time_until_expiry().map(|d| d.num_minutes().max(0))
    }

    /// Watch login/logout transitions, including timer-driven expiry.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state_tx.subscribe()
    }

    fn schedule_expiry(&self, generation: u64, delay: StdDuration) -> JoinHandle<()> {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        // Fixed now, not when the task is first polled
        let deadline = Instant::now() + delay;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(shared) = shared.upgrade() {
                shared.expire(generation);
            }
        })
    }
}

/// Milliseconds from now until `expires_at`, clamped at zero.
fn remaining_until(expires_at: DateTime<Utc>) -> StdDuration {
    let millis = (expires_at - Utc::now()).num_milliseconds();
    StdDuration::from_millis(millis.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;

    const TWO_HOURS: StdDuration = StdDuration::from_secs(2 * 60 * 60);

    fn memory_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    /// Let spawned expiry tasks observe the clock.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_sets_token_and_persists() {
        let store = memory_store();
        let session = SessionManager::new(store.clone());
        assert!(!session.is_authenticated());

        session.login_for("abc123", Duration::hours(DEFAULT_SESSION_HOURS));

        assert!(session.is_authenticated());
        assert_eq!(session.current_token().as_deref(), Some("abc123"));
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
        assert!(store.get(EXPIRES_AT_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_everything_and_is_idempotent() {
        let store = memory_store();
        let session = SessionManager::new(store.clone());

        session.logout();
        assert!(!session.is_authenticated());

        session.login_for("abc123", Duration::hours(2));
        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_token(), None);
        assert_eq!(session.expires_at(), None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(EXPIRES_AT_KEY).unwrap(), None);

        session.logout();
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_two_hours() {
        let store = memory_store();
        let session = SessionManager::new(store.clone());
        session.login("abc123", Utc::now() + Duration::hours(2));

        tokio::time::advance(TWO_HOURS - StdDuration::from_secs(1)).await;
        settle().await;
        assert!(session.is_authenticated());

        tokio::time::advance(StdDuration::from_secs(1)).await;
        settle().await;
        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_cancels_pending_expiry() {
        let session = SessionManager::new(memory_store());
        let mut rx = session.subscribe();

        session.login("abc123", Utc::now() + Duration::hours(2));
        session.logout();
        let _ = rx.borrow_and_update();

        tokio::time::advance(TWO_HOURS).await;
        settle().await;

        assert!(!session.is_authenticated());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_login_supersedes_first_timer() {
        let session = SessionManager::new(memory_store());

        session.login("first", Utc::now() + Duration::hours(1));
        session.login("second", Utc::now() + Duration::hours(2));

        // First login's original deadline passes without effect
        tokio::time::advance(StdDuration::from_secs(60 * 60)).await;
        settle().await;
        assert!(session.is_authenticated());
        assert_eq!(session.current_token().as_deref(), Some("second"));

        tokio::time::advance(StdDuration::from_secs(60 * 60)).await;
        settle().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_deadline_fixed_at_login() {
        let session = SessionManager::new(memory_store());
        session.login("abc123", Utc::now() + Duration::minutes(10));

        // The expiry task has not been polled yet when the clock moves
        tokio::time::advance(StdDuration::from_secs(10 * 60)).await;
        settle().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_logout_does_not_notify() {
        let session = SessionManager::new(memory_store());
        let mut rx = session.subscribe();

        session.logout();
        assert!(!rx.has_changed().unwrap());

        session.login_for("abc123", Duration::hours(2));
        session.logout();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionState::LoggedOut);

        session.logout();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_generation_is_ignored() {
        let session = SessionManager::new(memory_store());
        session.login("abc123", Utc::now() + Duration::hours(2));

        let stale = session.shared.inner.lock().generation - 1;
        session.shared.expire(stale);

        assert!(session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_expiry_fires_immediately() {
        let session = SessionManager::new(memory_store());
        session.login("abc123", Utc::now() - Duration::minutes(5));

        // Held until the runtime gets a turn
        assert!(session.is_authenticated());

        settle().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_token_login_is_logout() {
        let session = SessionManager::new(memory_store());
        session.login_for("abc123", Duration::hours(2));

        session.login("", Utc::now() + Duration::hours(2));

        assert!(!session.is_authenticated());
        assert_eq!(session.current_token(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_iso() {
        let session = SessionManager::new(memory_store());
        let expiry = (Utc::now() + Duration::hours(2)).to_rfc3339();

        session.login_iso("abc123", &expiry).unwrap();
        assert!(session.is_authenticated());
        assert!(matches!(session.minutes_until_expiry(), Some(119) | Some(120)));

        assert!(session.login_iso("abc123", "next tuesday").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_sees_timer_expiry() {
        let session = SessionManager::new(memory_store());
        let mut rx = session.subscribe();
        assert_eq!(*rx.borrow(), SessionState::LoggedOut);

        session.login("abc123", Utc::now() + Duration::minutes(10));
        assert_eq!(*rx.borrow_and_update(), SessionState::LoggedIn);

        tokio::time::advance(StdDuration::from_secs(10 * 60)).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SessionState::LoggedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_restore_trusts_persisted_token() {
        let lapsed = (Utc::now() - Duration::hours(5)).to_rfc3339();
        let store = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "abc123".to_string()),
            (EXPIRES_AT_KEY, lapsed),
        ]));

        let session = SessionManager::restore(store, RestorePolicy::Optimistic);
        assert!(session.is_authenticated());
        assert_eq!(session.current_token().as_deref(), Some("abc123"));

        // No timer is reconstructed
        tokio::time::advance(TWO_HOURS * 10).await;
        settle().await;
        assert!(session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_without_token_is_logged_out() {
        let session = SessionManager::restore(memory_store(), RestorePolicy::Optimistic);
        assert!(!session.is_authenticated());
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enforced_restore_discards_lapsed_token() {
        let lapsed = (Utc::now() - Duration::minutes(1)).to_rfc3339();
        let store = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "abc123".to_string()),
            (EXPIRES_AT_KEY, lapsed),
        ]));

        let session = SessionManager::restore(store.clone(), RestorePolicy::EnforceExpiry);
        assert!(!session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enforced_restore_discards_token_without_expiry() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123")]));
        let session = SessionManager::restore(store, RestorePolicy::EnforceExpiry);
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enforced_restore_rearms_timer() {
        let expiry = (Utc::now() + Duration::minutes(30)).to_rfc3339();
        let store = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "abc123".to_string()),
            (EXPIRES_AT_KEY, expiry),
        ]));

        let session = SessionManager::restore(store, RestorePolicy::EnforceExpiry);
        assert!(session.is_authenticated());

        tokio::time::advance(StdDuration::from_secs(30 * 60)).await;
        settle().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_state() {
        let session = SessionManager::new(memory_store());
        let view = session.clone();

        session.login_for("abc123", Duration::hours(2));
        assert!(view.is_authenticated());

        view.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_policy_serde() {
        assert_eq!(
            serde_json::to_string(&RestorePolicy::EnforceExpiry).unwrap(),
            "\"enforce_expiry\""
        );
        let parsed: RestorePolicy = serde_json::from_str("\"optimistic\"").unwrap();
        assert_eq!(parsed, RestorePolicy::Optimistic);
    }
}
