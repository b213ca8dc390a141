//! Access control over a session snapshot
//!
//! Every answer is derived from the snapshot and the permission table at
//! call time; nothing is cached between reads. These checks gate what the
//! console shows. The backend re-checks every request on its own.

use crate::errors::{ConsoleError, Result};
use crate::rbac::navigation::{self, MenuItem, LOGIN_PATH, MENU};
use crate::rbac::{PermissionTable, Role, RoleRequirement};
use crate::session::{Session, SessionStore};

/// Outcome of guarding a navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    /// Authenticated but not allowed here; send the operator to `fallback`.
    Forbidden { fallback: &'static str },
}

pub struct AccessControl<'a> {
    session: Session,
    table: &'a PermissionTable,
}

impl<'a> AccessControl<'a> {
    pub fn new(session: Session, table: &'a PermissionTable) -> Self {
        AccessControl { session, table }
    }

    /// Snapshot the store's current session.
    pub fn for_store(store: &SessionStore, table: &'a PermissionTable) -> Self {
        Self::new(store.session(), table)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current role, `None` when unauthenticated or the role is unknown.
    pub fn role(&self) -> Option<Role> {
        self.session.claims.as_ref().and_then(|c| c.role().ok())
    }

    /// True iff the current role satisfies `required`.
    ///
    /// # Example
    ///
    /// ```
    /// use hrpay_core::rbac::{AccessControl, PermissionTable, Role};
    /// use hrpay_core::session::Session;
    ///
    /// let anonymous = AccessControl::new(Session::anonymous(), PermissionTable::builtin());
    /// assert!(!anonymous.check_role(Role::Admin));
    /// ```
    pub fn check_role(&self, required: impl Into<RoleRequirement>) -> bool {
        let required = required.into();
        self.role()
            .map(|role| required.is_satisfied_by(role))
            .unwrap_or(false)
    }

    pub fn check_permission(&self, tag: &str) -> bool {
        self.role()
            .map(|role| self.table.allows(role, tag))
            .unwrap_or(false)
    }

    /// Grant strings of the current role.
    pub fn permissions(&self) -> Vec<&str> {
        self.role()
            .map(|role| self.table.grants_for(role))
            .unwrap_or_default()
    }

    /// Landing route for the current session.
    ///
    /// Unauthenticated sessions are an `Auth` error; a role outside the
    /// known set is `UnknownRole`.
    pub fn dashboard_path(&self) -> Result<&'static str> {
        let claims = self
            .session
            .claims
            .as_ref()
            .ok_or_else(|| ConsoleError::Auth("not logged in".to_string()))?;
        Ok(claims.role()?.dashboard_path())
    }

    pub fn guard_route(&self, path: &str) -> RouteDecision {
        let rule = match navigation::rule_for(path) {
            Some(rule) => rule,
            None => return RouteDecision::Allow,
        };

        if !self.session.is_authenticated {
            return RouteDecision::RedirectToLogin;
        }

        match self.role() {
            Some(role) if rule.roles.contains(&role) => RouteDecision::Allow,
            Some(role) => RouteDecision::Forbidden { fallback: role.dashboard_path() },
            None => {
                tracing::warn!(
                    "session role {:?} is not recognized, denying {}",
                    self.session.claims.as_ref().and_then(|c| c.role.clone()),
                    path
                );
                RouteDecision::Forbidden { fallback: LOGIN_PATH }
            }
        }
    }

    /// Menu entries the current session may see, in display order.
    pub fn visible_menu(&self) -> Vec<&'static MenuItem> {
        MENU.iter()
            .filter(|item| self.check_permission(item.permission))
            .collect()
    }
}
