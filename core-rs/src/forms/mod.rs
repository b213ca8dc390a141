//! Form payloads and client-side validation
//!
//! Each form validates before the API client sends it; a failed validation
//! is a `ConsoleError::Validation` and no request goes out.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ConsoleError, Result};
use crate::rbac::Role;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<()> {
    require("Email", value)?;
    let valid = EMAIL_PATTERN
        .as_ref()
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false);
    if !valid {
        return Err(ConsoleError::Validation(format!("'{}' is not a valid email address", value)));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConsoleError::Validation(format!("{} must be a non-negative amount", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        require("Username", &self.username)?;
        require("Password", &self.password)
    }
}

/// Console account (ADMIN, HR or MANAGER).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Only checked locally, never sent.
    #[serde(skip)]
    pub confirm_password: String,
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        require("Username", &self.username)?;
        require_email(&self.email)?;
        require("Password", &self.password)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ConsoleError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.password != self.confirm_password {
            return Err(ConsoleError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub department: String,
    pub designation: String,
    pub date_of_joining: NaiveDate,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<()> {
        require("First name", &self.first_name)?;
        require("Last name", &self.last_name)?;
        require_email(&self.email)?;
        require("Department", &self.department)?;
        require("Designation", &self.designation)
    }
}

/// Cost-to-company components for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtcEntry {
    pub employee_id: String,
    pub basic_salary: f64,
    pub hra: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub effective_from: NaiveDate,
}

impl CtcEntry {
    pub fn validate(&self) -> Result<()> {
        require("Employee", &self.employee_id)?;
        require_amount("Basic salary", self.basic_salary)?;
        require_amount("HRA", self.hra)?;
        require_amount("Allowances", self.allowances)?;
        require_amount("Deductions", self.deductions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRequest {
    pub employee_id: String,
    pub month: u32,
    pub year: i32,
}

impl PayslipRequest {
    pub fn validate(&self) -> Result<()> {
        require("Employee", &self.employee_id)?;
        if !(1..=12).contains(&self.month) {
            return Err(ConsoleError::Validation(format!("Month {} is out of range", self.month)));
        }
        if self.year < 2000 {
            return Err(ConsoleError::Validation(format!("Year {} is out of range", self.year)));
        }
        Ok(())
    }
}
