//! # HR/Payroll Console Core
//!
//! Client-side core of a role-based HR/payroll administration console
//! (admin, HR and manager dashboards).
//!
//! ## Core Principle
//!
//! **The backend is the authorization boundary.** Tokens are decoded here
//! without signature verification, and every role or permission check in
//! this crate only decides what the console *shows*. The backend validates
//! the bearer token on every request it serves.
//!
//! ## Architecture
//!
//! ```text
//!   token ──► session ──► rbac ──► shell (menu, routes)
//!                │                   │
//!                ▼                   ▼
//!               api  ─────────────► modal (confirm / alert)
//! ```
//!
//! - [`token`]: bearer payload → [`Claims`], empty claims on any failure
//! - [`session`]: explicitly constructed session store over a token storage slot
//! - [`rbac`]: role checks, permission table, route guards, menu gating
//! - [`modal`]: dialog coordinator returning deferred results
//! - [`api`]: backend REST client bound to the session
//! - [`console`]: the above wired together for a front-end

pub mod api;
pub mod config;
pub mod console;
pub mod errors;
pub mod forms;
pub mod modal;
pub mod rbac;
pub mod session;
pub mod token;

pub use api::{ApiClient, EmployeeStat, ScopeHandle, UserStat, ViewScope};
pub use config::AppConfig;
pub use console::Console;
pub use errors::{ConsoleError, Result};
pub use forms::{CtcEntry, LoginForm, NewEmployee, NewUser, PayslipRequest};
pub use modal::{AlertConfig, AlertOutcome, ConfirmConfig, ModalManager, ModalResponse, Variant};
pub use rbac::{AccessControl, PermissionTable, Role, RoleRequirement, RouteDecision};
pub use session::{FileStorage, MemoryStorage, Session, SessionStore, TokenStorage};
pub use token::Claims;

/// Version of the console core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
