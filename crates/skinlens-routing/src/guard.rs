//! Route guard
//!
//! A pure predicate over a session snapshot: admin views need the admin
//! marker, user views need an access token. A refused visit becomes a
//! redirect to the matching login view that remembers where the user was
//! going.

use skinlens_core::{
    Redirect, Result, Session, SessionSnapshot,
    navigation::{ADMIN_LOGIN_ROUTE, AUTH_ROUTE},
};
use tracing::debug;

use crate::route_table::{Access, RouteTable};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide whether `snapshot` may see a view requiring `access`
    ///
    /// # Examples
    /// ```
    /// use skinlens_core::SessionSnapshot;
    /// use skinlens_routing::{Access, GuardDecision, RouteGuard};
    ///
    /// let signed_out = SessionSnapshot::default();
    /// match RouteGuard::evaluate(&signed_out, Access::Admin, "/admin/dashboard") {
    ///     GuardDecision::Redirect(redirect) => assert_eq!(redirect.to, "/admin/login"),
    ///     GuardDecision::Allow => unreachable!(),
    /// }
    /// ```
    pub fn evaluate(snapshot: &SessionSnapshot, access: Access, location: &str) -> GuardDecision {
        let target = match access {
            Access::Admin if !snapshot.has_admin_session() => ADMIN_LOGIN_ROUTE,
            Access::User if !snapshot.has_user_session() => AUTH_ROUTE,
            _ => return GuardDecision::Allow,
        };

        debug!("Redirecting {} to {}", location, target);
        GuardDecision::Redirect(Redirect::to(target).with_from(location))
    }

    /// Check `location` against the route table and a snapshot
    pub fn check_snapshot(&self, snapshot: &SessionSnapshot, location: &str) -> GuardDecision {
        Self::evaluate(snapshot, self.table.access_for(location), location)
    }

    /// Check `location` against the live session
    ///
    /// # Errors
    /// - Session store read failures
    pub async fn check(&self, session: &Session, location: &str) -> Result<GuardDecision> {
        let snapshot = session.snapshot().await?;
        Ok(self.check_snapshot(&snapshot, location))
    }
}
