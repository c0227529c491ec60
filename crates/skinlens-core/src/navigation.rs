//! Navigation targets
//!
//! The HTTP client and the route guard never move the user themselves; they
//! produce a [`Redirect`] and hand it to whatever front end is attached.

use serde::{Deserialize, Serialize};

/// User login/registration view
pub const AUTH_ROUTE: &str = "/auth";

/// Admin login view
pub const ADMIN_LOGIN_ROUTE: &str = "/admin/login";

/// A request to send the user to another view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Destination path
    pub to: String,

    /// Location the user was trying to reach, for post-login return
    pub from: Option<String>,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            from: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Receives redirects produced outside the UI layer
pub trait Navigator: Send + Sync {
    fn redirect(&self, redirect: Redirect);
}

/// Navigator for headless use; redirects are dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect(&self, redirect: Redirect) {
        tracing::debug!("Dropping redirect to {}", redirect.to);
    }
}
