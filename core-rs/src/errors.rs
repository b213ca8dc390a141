//! Error types for the HR/payroll console core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Malformed bearer token. Never fatal: callers of `token::decode` see empty claims.
    #[error("Token decode error: {0}")]
    Decode(String),

    /// Login rejected, no session, or the backend refused the session token (401).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Valid session without the right to do this: a missing permission or a 403.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Form-level problem detected before any request is sent.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(String),
}

impl ConsoleError {
    /// Message shown to the operator in an alert.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Auth(msg) => format!("Authentication failed: {}", msg),
            ConsoleError::Forbidden(msg) => format!("You are not allowed to do this ({}).", msg),
            ConsoleError::Network(msg) => format!("Request failed: {}", msg),
            ConsoleError::Validation(msg) => msg.clone(),
            ConsoleError::UnknownRole(role) => {
                format!("Your account role '{}' is not supported by this console.", role)
            }
            other => other.to_string(),
        }
    }

    /// True when the only sensible recovery is a fresh login. A `Forbidden`
    /// session stays valid, logging in again would not help.
    pub fn requires_login(&self) -> bool {
        matches!(self, ConsoleError::Auth(_))
    }
}

impl From<regex::Error> for ConsoleError {
    fn from(err: regex::Error) -> Self {
        ConsoleError::RegexError(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
