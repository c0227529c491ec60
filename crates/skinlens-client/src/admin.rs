//! Admin session
//!
//! Admin sign-in is checked locally against the configured admin credentials.
//! A successful check stores a random marker under `adminToken`; the route
//! guard only looks at its presence.

use skinlens_core::{Session, types::Credentials, validation::validate_credentials};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    fn matches(&self, credentials: &Credentials) -> bool {
        self.email.eq_ignore_ascii_case(credentials.email.trim())
            && self.password == credentials.password
    }
}

pub struct AdminAuth {
    credentials: Option<AdminCredentials>,
    session: Session,
}

impl AdminAuth {
    pub fn new(credentials: Option<AdminCredentials>, session: Session) -> Self {
        Self {
            credentials,
            session,
        }
    }

    /// Check the credentials and mark the session as admin
    ///
    /// # Errors
    /// - `ClientError::Validation` if email or password is empty
    /// - `ClientError::Authentication` if no admin account is configured or
    ///   the credentials don't match
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        validate_credentials(credentials)?;

        let Some(expected) = &self.credentials else {
            return Err(ClientError::Authentication(
                "Admin login is not configured".to_string(),
            ));
        };

        if !expected.matches(credentials) {
            warn!("Rejected admin login for {}", credentials.email);
            return Err(ClientError::Authentication("Invalid credentials".to_string()));
        }

        let token = Uuid::new_v4().to_string();
        self.session.set_admin_token(&token).await?;
        info!("Admin signed in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.clear_admin_token().await?;
        info!("Admin signed out");
        Ok(())
    }

    pub async fn is_signed_in(&self) -> Result<bool> {
        Ok(self.session.admin_token().await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinlens_session::MemorySessionStore;
    use std::sync::Arc;

    fn auth(credentials: Option<AdminCredentials>) -> AdminAuth {
        AdminAuth::new(credentials, Session::new(Arc::new(MemorySessionStore::new())))
    }

    #[tokio::test]
    async fn test_login_stores_admin_token() {
        let admin = auth(Some(AdminCredentials::new("admin@skinlens.test", "s3cret")));

        admin
            .login(&Credentials::new("Admin@SkinLens.test", "s3cret"))
            .await
            .unwrap();

        assert!(admin.is_signed_in().await.unwrap());
        let token = admin.session.admin_token().await.unwrap().unwrap();
        assert!(Uuid::parse_str(&token).is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let admin = auth(Some(AdminCredentials::new("admin@skinlens.test", "s3cret")));

        let err = admin
            .login(&Credentials::new("admin@skinlens.test", "guess"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!admin.is_signed_in().await.unwrap());
    }

    #[tokio::test]
    async fn test_unconfigured_admin() {
        let err = auth(None)
            .login(&Credentials::new("admin@skinlens.test", "s3cret"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_logout_keeps_user_tokens() {
        let admin = auth(Some(AdminCredentials::new("admin@skinlens.test", "s3cret")));
        admin.session.set_access_token("user-access").await.unwrap();
        admin
            .login(&Credentials::new("admin@skinlens.test", "s3cret"))
            .await
            .unwrap();

        admin.logout().await.unwrap();

        assert!(!admin.is_signed_in().await.unwrap());
        assert_eq!(
            admin.session.access_token().await.unwrap().as_deref(),
            Some("user-access")
        );
    }
}
