//! Identity claims carried in a bearer token payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::{ConsoleError, Result};
use crate::rbac::Role;

/// Decoded token payload.
///
/// Claims are read-only once decoded. `Claims::default()` is the "empty"
/// value handed out for any token that cannot be decoded, and it is treated
/// as "not authenticated" everywhere in the crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Role string exactly as the backend sent it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Build claims from a parsed JSON payload.
    ///
    /// Only a JSON object is accepted. Identifier fields tolerate numbers
    /// (`"userId": 17`), timestamps tolerate fractional seconds. Unrecognized
    /// fields are ignored. `username` falls back to `sub`.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ConsoleError::Decode("payload is not a JSON object".to_string()))?;

        let text = |key: &str| -> Option<String> {
            match obj.get(key)? {
                JsonValue::String(s) => Some(s.clone()),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };
        let seconds = |key: &str| -> Option<i64> { obj.get(key)?.as_f64().map(|v| v as i64) };

        let sub = text("sub");
        let username = text("username").or_else(|| sub.clone());

        Ok(Claims {
            sub,
            username,
            email: text("email"),
            name: text("name"),
            user_id: text("userId").or_else(|| text("id")),
            role: text("role"),
            iat: seconds("iat"),
            exp: seconds("exp"),
        })
    }

    /// True when no recognized field was present.
    pub fn is_empty(&self) -> bool {
        *self == Claims::default()
    }

    /// Parse the role string into the closed role set.
    pub fn role(&self) -> Result<Role> {
        match &self.role {
            Some(raw) => raw.parse(),
            None => Err(ConsoleError::UnknownRole("<none>".to_string())),
        }
    }

    /// Name to greet the operator with.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("unknown")
    }

    /// True when `exp` is present and is not after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => exp <= now.timestamp(),
            None => false,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}
