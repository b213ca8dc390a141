//! RBAC (Role-Based Access Control) module
//!
//! Provides role parsing, the role → permission table, route guards and
//! menu gating for the console shell.
//!
//! All of this is presentation gating. Claims come from an unverified
//! token, so none of it is an authorization boundary: the backend decides.

pub mod access;
pub mod navigation;
pub mod permission_table;
pub mod role;

pub use access::{AccessControl, RouteDecision};
pub use navigation::{normalize_path, MenuItem, RouteRule, LOGIN_PATH, MENU, ROUTES};
pub use permission_table::{Grant, PermissionTable};
pub use role::{dashboard_path, Role, RoleRequirement};
