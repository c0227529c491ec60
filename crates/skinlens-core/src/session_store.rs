//! Session store trait and typed session facade
//!
//! The `SessionStore` trait abstracts the persistent key-value storage that
//! holds the client's credentials, so the HTTP client and the route guard can
//! be handed an in-memory store in tests and a file-backed store in the CLI.
//!
//! Three keys are used:
//! - `access_token`: short-lived bearer credential
//! - `refresh_token`: longer-lived credential used to mint new access tokens
//! - `adminToken`: marker set by the admin login

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{Result, types::TokenPair};

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key of the admin marker
pub const ADMIN_TOKEN_KEY: &str = "adminToken";

/// Persistent key-value storage for session credentials
///
/// Implementations:
/// - `MemorySessionStore`: process-local map (tests, embedding)
/// - `FileSessionStore`: JSON file on disk, survives restarts
///
/// # Example
/// ```no_run
/// # use skinlens_core::session_store::SessionStore;
/// # async fn example(store: &dyn SessionStore) -> skinlens_core::Result<()> {
/// store.set("access_token", "abc").await?;
/// assert_eq!(store.get("access_token").await?.as_deref(), Some("abc"));
/// store.remove("access_token").await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    /// - `Error::SessionStore` if the backing storage can't be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// - `Error::SessionStore` / `Error::Io` if the value can't be persisted
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Point-in-time copy of the session credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub admin_token: Option<String>,
}

impl SessionSnapshot {
    pub fn has_user_session(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_admin_session(&self) -> bool {
        self.admin_token.is_some()
    }
}

/// Typed facade over a [`SessionStore`]
///
/// Empty strings read back as absent, so a blanked-out token never ends up in
/// an `Authorization` header.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        self.read(ACCESS_TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.read(REFRESH_TOKEN_KEY).await
    }

    pub async fn admin_token(&self) -> Result<Option<String>> {
        self.read(ADMIN_TOKEN_KEY).await
    }

    /// Store both tokens after a successful login or registration
    pub async fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access).await?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh).await?;
        debug!("Stored access and refresh tokens");
        Ok(())
    }

    /// Replace the access token after a refresh
    pub async fn set_access_token(&self, access: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, access).await
    }

    /// Replace the refresh token when the server rotates it
    pub async fn set_refresh_token(&self, refresh: &str) -> Result<()> {
        self.store.set(REFRESH_TOKEN_KEY, refresh).await
    }

    pub async fn set_admin_token(&self, token: &str) -> Result<()> {
        self.store.set(ADMIN_TOKEN_KEY, token).await
    }

    pub async fn clear_admin_token(&self) -> Result<()> {
        self.store.remove(ADMIN_TOKEN_KEY).await
    }

    /// Remove both user tokens (logout, refresh failure)
    ///
    /// The admin marker is left alone.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY).await?;
        self.store.remove(REFRESH_TOKEN_KEY).await?;
        debug!("Cleared access and refresh tokens");
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        Ok(SessionSnapshot {
            access_token: self.access_token().await?,
            refresh_token: self.refresh_token().await?,
            admin_token: self.admin_token().await?,
        })
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get(key).await?.filter(|value| !value.is_empty()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
