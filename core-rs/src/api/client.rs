//! Backend API client
//!
//! Thin typed wrapper over the HR/payroll REST backend:
//! - attaches `Authorization: Bearer <token>` from the session store
//! - validates forms before anything is sent
//! - maps failures into the console error taxonomy
//!
//! The backend is the authorization boundary. It re-validates the token on
//! every call; a 401 here ends the local session, a 403 leaves it alone.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::api::endpoints::{self, EmployeeStat, UserStat};
use crate::config::ApiSettings;
use crate::errors::{ConsoleError, Result};
use crate::forms::{CtcEntry, LoginForm, NewEmployee, NewUser, PayslipRequest};
use crate::session::{Session, SessionStore};

/// Longest backend error body quoted back to the operator.
const MAX_ERROR_BODY: usize = 200;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, session: Arc<SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(ApiClient {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Authenticate against the backend and start a session with the issued token.
    pub async fn login(&self, form: &LoginForm) -> Result<Session> {
        form.validate()?;

        let url = format!("{}{}", self.base_url, endpoints::LOGIN);
        tracing::debug!(%url, "POST login");
        let response = self.http.post(&url).json(form).send().await?;
        let status = response.status();
        let body = parse_body(&response.text().await?);

        if !status.is_success() {
            let detail = error_detail(&body).unwrap_or_else(|| "invalid credentials".to_string());
            return Err(ConsoleError::Auth(format!("login rejected ({}): {}", status.as_u16(), detail)));
        }

        let token = extract_token(&body)
            .ok_or_else(|| ConsoleError::Auth("login response carried no token".to_string()))?;
        self.session.login(&token)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<JsonValue> {
        user.validate()?;
        self.send(Method::POST, endpoints::CREATE_USER, Some(user)).await
    }

    pub async fn create_admin_user(&self, user: &NewUser) -> Result<JsonValue> {
        user.validate()?;
        self.send(Method::POST, endpoints::CREATE_ADMIN_USER, Some(user)).await
    }

    pub async fn list_users(&self) -> Result<Vec<JsonValue>> {
        let body = self.send(Method::GET, endpoints::LIST_USERS, None::<&()>).await?;
        Ok(extract_list(body))
    }

    pub async fn list_employees(&self) -> Result<Vec<JsonValue>> {
        let body = self.send(Method::GET, endpoints::LIST_EMPLOYEES, None::<&()>).await?;
        Ok(extract_list(body))
    }

    pub async fn onboard_employee(&self, employee: &NewEmployee) -> Result<JsonValue> {
        employee.validate()?;
        self.send(Method::POST, endpoints::ONBOARD_EMPLOYEE, Some(employee)).await
    }

    pub async fn add_ctc(&self, entry: &CtcEntry) -> Result<JsonValue> {
        entry.validate()?;
        self.send(Method::POST, endpoints::ADD_CTC, Some(entry)).await
    }

    pub async fn list_payslips(&self) -> Result<Vec<JsonValue>> {
        let body = self.send(Method::GET, endpoints::PAYSLIPS, None::<&()>).await?;
        Ok(extract_list(body))
    }

    pub async fn generate_payslips(&self, request: &PayslipRequest) -> Result<JsonValue> {
        request.validate()?;
        self.send(Method::POST, endpoints::GENERATE_PAYSLIPS, Some(request)).await
    }

    pub async fn payroll_stats(&self) -> Result<JsonValue> {
        self.send(Method::GET, endpoints::PAYROLL_STATS, None::<&()>).await
    }

    pub async fn user_stat(&self, stat: UserStat) -> Result<u64> {
        let body = self.send(Method::GET, stat.path(), None::<&()>).await?;
        extract_count(&body)
    }

    pub async fn employee_stat(&self, stat: EmployeeStat) -> Result<u64> {
        let body = self.send(Method::GET, stat.path(), None::<&()>).await?;
        extract_count(&body)
    }

    /// Protected call. Without a session token nothing is sent.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<JsonValue> {
        let token = self
            .session
            .token()
            .ok_or_else(|| ConsoleError::Auth("not logged in".to_string()))?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "request");

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = parse_body(&response.text().await?);

        if status.is_success() {
            return Ok(body);
        }

        let detail = error_detail(&body).unwrap_or_else(|| status.to_string());
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::info!(%url, "backend rejected session token");
                if let Err(e) = self.session.logout() {
                    tracing::warn!("could not clear rejected session: {}", e);
                }
                Err(ConsoleError::Auth(format!("HTTP 401: {}", detail)))
            }
            StatusCode::FORBIDDEN => Err(ConsoleError::Forbidden(format!("HTTP 403: {}", detail))),
            _ => Err(ConsoleError::Network(format!("HTTP {}: {}", status.as_u16(), detail))),
        }
    }
}

fn parse_body(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

/// Human-readable reason from an error body.
fn error_detail(body: &JsonValue) -> Option<String> {
    let text = match body {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(obj) => ["message", "error", "detail"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))?
            .to_string(),
        _ => return None,
    };
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_ERROR_BODY).collect())
}

/// Token from a login response: `token`, `accessToken` or `jwt`, top level or under `data`.
pub(crate) fn extract_token(body: &JsonValue) -> Option<String> {
    const KEYS: [&str; 3] = ["token", "accessToken", "jwt"];
    let find = |v: &JsonValue| {
        KEYS.iter()
            .find_map(|k| v.get(*k).and_then(|t| t.as_str()))
            .map(str::to_string)
    };
    match body {
        JsonValue::String(s) if s.split('.').count() == 3 => Some(s.clone()),
        _ => find(body).or_else(|| body.get("data").and_then(find)),
    }
}

/// List payload: a bare array, or an array under `data`/`items`.
pub(crate) fn extract_list(body: JsonValue) -> Vec<JsonValue> {
    match body {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut obj) => ["data", "items"]
            .iter()
            .find_map(|k| match obj.remove(*k) {
                Some(JsonValue::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Count payload: a bare number, or a number under `count`/`total`/`value`/`data`.
pub(crate) fn extract_count(body: &JsonValue) -> Result<u64> {
    let number = match body {
        JsonValue::Number(_) => Some(body),
        JsonValue::Object(obj) => ["count", "total", "value", "data"]
            .iter()
            .find_map(|k| obj.get(*k).filter(|v| v.is_number())),
        _ => None,
    };
    number
        .and_then(|n| n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)))
        .ok_or_else(|| ConsoleError::Network(format!("unexpected stats response: {}", body)))
}
