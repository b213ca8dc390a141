//! Backend REST paths

pub const LOGIN: &str = "/admin/login";
pub const CREATE_USER: &str = "/admin/create-user";
pub const CREATE_ADMIN_USER: &str = "/user/admin/create";
pub const LIST_USERS: &str = "/user/all";
pub const LIST_EMPLOYEES: &str = "/onboard-employee/employees";
pub const ONBOARD_EMPLOYEE: &str = "/onboard-employee/add";
pub const ADD_CTC: &str = "/ctc/add";
pub const PAYSLIPS: &str = "/payroll/payslips";
pub const GENERATE_PAYSLIPS: &str = "/payroll/payslips/generate";
pub const PAYROLL_STATS: &str = "/payroll/stats";

/// `GET /stats/users/{kind}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStat {
    Total,
    Hr,
    Managers,
}

impl UserStat {
    pub fn path(&self) -> &'static str {
        match self {
            UserStat::Total => "/stats/users/total",
            UserStat::Hr => "/stats/users/hr",
            UserStat::Managers => "/stats/users/managers",
        }
    }
}

/// `GET /stats/employees/{kind}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeStat {
    Total,
    Active,
    Inactive,
}

impl EmployeeStat {
    pub fn path(&self) -> &'static str {
        match self {
            EmployeeStat::Total => "/stats/employees/total",
            EmployeeStat::Active => "/stats/employees/active",
            EmployeeStat::Inactive => "/stats/employees/inactive",
        }
    }
}
