//! API module
//!
//! Backend REST client and view-bound request scopes.

pub mod client;
pub mod endpoints;
pub mod scope;

pub use client::ApiClient;
pub use endpoints::{EmployeeStat, UserStat};
pub use scope::{ScopeHandle, ViewScope};
