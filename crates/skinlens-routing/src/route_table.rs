//! Guarded views
//!
//! Maps application paths to the session they require. Paths that match no
//! rule are public.

use serde::{Deserialize, Serialize};

/// Session a view requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    /// Signed-in user (access token present)
    User,
    /// Admin session (admin marker present)
    Admin,
}

/// A guarded path prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Matches the path itself and anything below it, e.g. `/results`
    /// matches `/results` and `/results/12` but not `/resultsx`
    pub prefix: String,
    pub access: Access,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, access: Access) -> Self {
        Self {
            prefix: prefix.into(),
            access,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let prefix = self.prefix.trim_end_matches('/');
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Ordered set of guarded views; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Create an empty table (every path public)
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rules(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn add_rule(&mut self, rule: RouteRule) {
        self.rules.push(rule);
    }

    /// Access required for `location`; query string and fragment are ignored
    pub fn access_for(&self, location: &str) -> Access {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);

        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.access)
            .unwrap_or(Access::Public)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RouteTable {
    /// The application's guarded views
    ///
    /// - `/analysis`, `/results`: user session
    /// - `/admin/dashboard`: admin session
    fn default() -> Self {
        Self::with_rules(vec![
            RouteRule::new("/analysis", Access::User),
            RouteRule::new("/results", Access::User),
            RouteRule::new("/admin/dashboard", Access::Admin),
        ])
    }
}
