//! Console roles and their landing routes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ConsoleError, Result};

/// Coarse-grained access class carried in the token's `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Hr,
    Manager,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Hr, Role::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Hr => "HR",
            Role::Manager => "MANAGER",
        }
    }

    /// Landing route after login. Total over every role.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Hr => "/hr/dashboard",
            Role::Manager => "/manager/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConsoleError;

    /// Exact backend spelling only. Anything else, `admin` and ` HR ` included,
    /// is `UnknownRole`, so a backend that changes its role enum shows up as
    /// an error, not a guess.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "HR" => Ok(Role::Hr),
            "MANAGER" => Ok(Role::Manager),
            _ => Err(ConsoleError::UnknownRole(s.to_string())),
        }
    }
}

/// Map a raw role string to its dashboard route.
///
/// # Example
///
/// ```
/// use hrpay_core::rbac::dashboard_path;
///
/// assert_eq!(dashboard_path("MANAGER").unwrap(), "/manager/dashboard");
/// assert!(dashboard_path("UNKNOWN").is_err());
/// ```
pub fn dashboard_path(role: &str) -> Result<&'static str> {
    Ok(role.parse::<Role>()?.dashboard_path())
}

/// Role condition for a UI section: one role or any of several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    One(Role),
    AnyOf(Vec<Role>),
}

impl RoleRequirement {
    pub fn is_satisfied_by(&self, role: Role) -> bool {
        match self {
            RoleRequirement::One(required) => *required == role,
            RoleRequirement::AnyOf(roles) => roles.contains(&role),
        }
    }
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        RoleRequirement::One(role)
    }
}

impl From<Vec<Role>> for RoleRequirement {
    fn from(roles: Vec<Role>) -> Self {
        RoleRequirement::AnyOf(roles)
    }
}

impl From<&[Role]> for RoleRequirement {
    fn from(roles: &[Role]) -> Self {
        RoleRequirement::AnyOf(roles.to_vec())
    }
}

impl<const N: usize> From<[Role; N]> for RoleRequirement {
    fn from(roles: [Role; N]) -> Self {
        RoleRequirement::AnyOf(roles.to_vec())
    }
}
