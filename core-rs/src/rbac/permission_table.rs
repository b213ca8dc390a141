//! Role → permission table
//!
//! Business policy lives here as data. The built-in table can be replaced
//! from the `permissions` section of the config file.
//!
//! Grant syntax:
//! - `*` grants every tag
//! - `payslips.*` grants every tag under `payslips.`
//! - anything else must match the tag exactly

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::errors::{ConsoleError, Result};
use crate::rbac::Role;

pub const DASHBOARD_VIEW: &str = "dashboard.view";
pub const USERS_VIEW: &str = "users.view";
pub const USERS_CREATE: &str = "users.create";
pub const USERS_CREATE_ADMIN: &str = "users.create_admin";
pub const EMPLOYEES_VIEW: &str = "employees.view";
pub const EMPLOYEES_ONBOARD: &str = "employees.onboard";
pub const CTC_MANAGE: &str = "ctc.manage";
pub const PAYSLIPS_VIEW: &str = "payslips.view";
pub const PAYSLIPS_GENERATE: &str = "payslips.generate";
pub const STATS_VIEW: &str = "stats.view";

/// ADMIN and HR grant everything; MANAGER is read-only.
const BUILTIN_GRANTS: &[(Role, &[&str])] = &[
    (Role::Admin, &["*"]),
    (Role::Hr, &["*"]),
    (
        Role::Manager,
        &[DASHBOARD_VIEW, EMPLOYEES_VIEW, PAYSLIPS_VIEW, STATS_VIEW],
    ),
];

static BUILTIN_TABLE: Lazy<PermissionTable> = Lazy::new(|| {
    let grants = BUILTIN_GRANTS
        .iter()
        .map(|(role, tags)| (*role, tags.iter().map(|t| Grant::literal(t)).collect()))
        .collect();
    PermissionTable { grants }
});

#[derive(Debug, Clone)]
enum Matcher {
    All,
    Exact,
    Pattern(Regex),
}

/// One entry of a role's grant list.
#[derive(Debug, Clone)]
pub struct Grant {
    raw: String,
    matcher: Matcher,
}

impl Grant {
    /// Parse a grant string, compiling wildcard patterns.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConsoleError::Config("permission grant cannot be empty".to_string()));
        }

        let matcher = if raw == "*" {
            Matcher::All
        } else if raw.contains('*') {
            let pattern = raw
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            Matcher::Pattern(Regex::new(&format!("^{}$", pattern))?)
        } else {
            Matcher::Exact
        };

        Ok(Grant { raw: raw.to_string(), matcher })
    }

    /// Grants without a partial wildcard never need a regex.
    fn literal(raw: &str) -> Self {
        let matcher = if raw == "*" { Matcher::All } else { Matcher::Exact };
        Grant { raw: raw.to_string(), matcher }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, tag: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Exact => self.raw == tag,
            Matcher::Pattern(re) => re.is_match(tag),
        }
    }
}

/// Fixed role → grants mapping.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    grants: BTreeMap<Role, Vec<Grant>>,
}

impl PermissionTable {
    /// Build a table from configuration data.
    ///
    /// Roles missing from `grants` get no permissions.
    pub fn from_grants(grants: &BTreeMap<Role, Vec<String>>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for (role, tags) in grants {
            let parsed = tags
                .iter()
                .map(|t| Grant::parse(t))
                .collect::<Result<Vec<_>>>()?;
            table.insert(*role, parsed);
        }
        Ok(PermissionTable { grants: table })
    }

    /// The built-in policy.
    pub fn builtin() -> &'static PermissionTable {
        &BUILTIN_TABLE
    }

    pub fn allows(&self, role: Role, tag: &str) -> bool {
        self.grants
            .get(&role)
            .map(|grants| grants.iter().any(|g| g.matches(tag)))
            .unwrap_or(false)
    }

    /// Raw grant strings for `role`, in table order.
    pub fn grants_for(&self, role: Role) -> Vec<&str> {
        self.grants
            .get(&role)
            .map(|grants| grants.iter().map(Grant::as_str).collect())
            .unwrap_or_default()
    }

    /// Export back to configuration form.
    pub fn to_grants(&self) -> BTreeMap<Role, Vec<String>> {
        self.grants
            .iter()
            .map(|(role, grants)| (*role, grants.iter().map(|g| g.raw.clone()).collect()))
            .collect()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        BUILTIN_TABLE.clone()
    }
}
