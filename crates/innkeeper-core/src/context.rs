//! Process-wide wiring: one config, one session, one HTTP client.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{KeyValueStore, SessionManager};
use crate::config::Config;
use crate::dashboard::is_auth_failure;
use crate::models::LoginForm;
use crate::routes::{self, Route};

/// Built once at startup and passed to everything that needs the session.
pub struct AppContext {
    pub config: Config,
    pub session: SessionManager,
    api: ApiClient,
}

impl AppContext {
    /// Restore the session from the configured token store.
    pub fn new(config: Config) -> Result<Self> {
        let store = config.token_store()?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = SessionManager::restore(store, config.restore_policy);
        let api = ApiClient::new(config.api_url())?;
        debug!(
            api_url = %api.base_url(),
            authenticated = session.is_authenticated(),
            "Application context ready"
        );
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// Authenticate against the API and start a session of the configured length.
    pub async fn login(&self, form: &LoginForm) -> Result<()> {
        let token = self.api.authenticate(form).await?;
        self.session.login_for(token, self.config.session_duration());
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Route guard for the view layer
    pub fn resolve(&self, path: &str) -> Route {
        routes::resolve(path, self.session.is_authenticated())
    }

    /// Client carrying the current token
    pub fn api(&self) -> Result<ApiClient> {
        let token = self
            .session
            .current_token()
            .ok_or(ApiError::NotAuthenticated)?;
        Ok(self.api.with_token(token))
    }

    /// Run an authenticated call, ending the session if the server rejects the token.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let api = self.api()?;
        let result = call(api).await;
        if let Err(ref e) = result {
            if is_auth_failure(e) && self.session.is_authenticated() {
                warn!("Server rejected the session token, logging out");
                self.session.logout();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStore, TOKEN_KEY};

    fn context(store: Arc<MemoryStore>) -> AppContext {
        let config = Config {
            api_url: Some("http://127.0.0.1:9/api".to_string()),
            ..Config::default()
        };
        AppContext::with_store(config, store).unwrap()
    }

    #[tokio::test]
    async fn test_restores_persisted_token() {
        let ctx = context(Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123")])));
        assert!(ctx.session.is_authenticated());
        assert_eq!(ctx.resolve("/dashboard/rooms"), Route::Rooms);
    }

    #[tokio::test]
    async fn test_api_requires_session() {
        let ctx = context(Arc::new(MemoryStore::new()));
        let err = ctx.api().err().unwrap();
        assert!(is_auth_failure(&err));
        assert_eq!(ctx.resolve("/dashboard/rooms"), Route::Login);
    }

    #[tokio::test]
    async fn test_unauthorized_response_ends_session() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123")]));
        let ctx = context(store.clone());

        let result: Result<()> = ctx
            .authorized(|_api| async { Err(anyhow::Error::from(ApiError::Unauthorized)) })
            .await;

        assert!(result.is_err());
        assert!(!ctx.session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_failures_keep_session() {
        let ctx = context(Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123")])));

        let result: Result<()> = ctx
            .authorized(|_api| async { Err(anyhow::Error::from(ApiError::ServerError("down".into()))) })
            .await;

        assert!(result.is_err());
        assert!(ctx.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_authorized_hands_out_token() {
        let ctx = context(Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123")])));
        let base = ctx
            .authorized(|api| async move { Ok(api.base_url().to_string()) })
            .await
            .unwrap();
        assert_eq!(base, "http://127.0.0.1:9/api/");
    }
}
