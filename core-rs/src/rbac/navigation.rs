//! Route and menu tables for the console shell

use crate::rbac::permission_table::{
    CTC_MANAGE, EMPLOYEES_ONBOARD, EMPLOYEES_VIEW, PAYSLIPS_GENERATE, PAYSLIPS_VIEW, STATS_VIEW,
    USERS_CREATE, USERS_CREATE_ADMIN, USERS_VIEW,
};
use crate::rbac::Role;

pub const LOGIN_PATH: &str = "/login";

/// Protected path prefix and the roles allowed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: &'static str,
    pub roles: &'static [Role],
}

impl RouteRule {
    /// Segment-aware prefix match: `/users` covers `/users/create`, not `/usersettings`.
    pub fn covers(&self, path: &str) -> bool {
        path == self.prefix
            || path
                .strip_prefix(self.prefix)
                .map(|rest| rest.starts_with('/'))
                .unwrap_or(false)
    }
}

pub const ROUTES: &[RouteRule] = &[
    RouteRule { prefix: "/admin", roles: &[Role::Admin] },
    RouteRule { prefix: "/hr", roles: &[Role::Hr] },
    RouteRule { prefix: "/manager", roles: &[Role::Manager] },
    RouteRule { prefix: "/users", roles: &[Role::Admin, Role::Hr] },
    RouteRule { prefix: "/ctc", roles: &[Role::Admin, Role::Hr] },
    RouteRule { prefix: "/employees", roles: &[Role::Admin, Role::Hr, Role::Manager] },
    RouteRule { prefix: "/payslips", roles: &[Role::Admin, Role::Hr, Role::Manager] },
    RouteRule { prefix: "/stats", roles: &[Role::Admin, Role::Hr, Role::Manager] },
];

/// Most specific rule covering `path`, `None` for public paths.
///
/// `path` is matched in its [`normalize_path`] form, so `/Users?tab=1` is
/// guarded like `/users`.
pub fn rule_for(path: &str) -> Option<&'static RouteRule> {
    let path = normalize_path(path);
    ROUTES
        .iter()
        .filter(|r| r.covers(&path))
        .max_by_key(|r| r.prefix.len())
}

/// Canonical route form: query and fragment dropped, percent-escapes
/// decoded, ASCII lowercased, empty `.` and `..` segments resolved.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(|c| c == '?' || c == '#').next().unwrap_or("");

    let mut decoded = path.to_string();
    while decoded.contains('%') {
        let next = percent_decode(&decoded);
        if next == decoded {
            break;
        }
        decoded = next;
    }
    let decoded = decoded.to_ascii_lowercase();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escaped = input
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(byte) = escaped {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Sidebar entry, shown when the session holds `permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub permission: &'static str,
}

pub const MENU: &[MenuItem] = &[
    MenuItem { label: "Create User", path: "/users/create", permission: USERS_CREATE },
    MenuItem { label: "Create Admin User", path: "/users/admin/create", permission: USERS_CREATE_ADMIN },
    MenuItem { label: "Users", path: "/users", permission: USERS_VIEW },
    MenuItem { label: "Onboard Employee", path: "/employees/onboard", permission: EMPLOYEES_ONBOARD },
    MenuItem { label: "Employees", path: "/employees", permission: EMPLOYEES_VIEW },
    MenuItem { label: "CTC", path: "/ctc", permission: CTC_MANAGE },
    MenuItem { label: "Payslips", path: "/payslips", permission: PAYSLIPS_VIEW },
    MenuItem { label: "Generate Payslips", path: "/payslips/generate", permission: PAYSLIPS_GENERATE },
    MenuItem { label: "Statistics", path: "/stats", permission: STATS_VIEW },
];
