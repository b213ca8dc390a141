/**
 * app_config.rs
 * Parser for .hrpay.yaml console configuration
 *
 * Format:
 * ```yaml
 * apiVersion: hrpay/v1
 * kind: Console
 * api:
 *   baseUrl: http://localhost:8080
 *   timeoutSecs: 30
 * session:
 *   storageKey: token
 *   rejectExpired: true
 *   dir: .hrpay/session
 * modal:
 *   autoCloseDelayMs: 3000
 * permissions:          # optional, replaces the built-in table
 *   ADMIN: ["*"]
 *   HR: ["*"]
 *   MANAGER: [dashboard.view, employees.view]
 * ```
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{ConsoleError, Result};
use crate::rbac::{PermissionTable, Role};

pub const CONFIG_API_VERSION: &str = "hrpay/v1";
pub const CONFIG_KIND: &str = "Console";
pub const CONFIG_FILE_NAME: &str = ".hrpay.yaml";

/// Environment variable overriding `api.baseUrl`.
pub const API_URL_ENV: &str = "HRPAY_API_URL";

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings { base_url: "http://localhost:8080".to_string(), timeout_secs: 30 }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session storage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Fixed key the token is stored under.
    pub storage_key: String,
    /// Refuse to restore or accept tokens whose `exp` has passed.
    pub reject_expired: bool,
    /// Directory for file-backed storage (CLI only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings { storage_key: "token".to_string(), reject_expired: true, dir: None }
    }
}

/// Dialog defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModalSettings {
    pub auto_close_delay_ms: u64,
}

impl Default for ModalSettings {
    fn default() -> Self {
        ModalSettings { auto_close_delay_ms: 3000 }
    }
}

impl ModalSettings {
    pub fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.auto_close_delay_ms)
    }
}

/// .hrpay.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub modal: ModalSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeMap<Role, Vec<String>>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_version: CONFIG_API_VERSION.to_string(),
            kind: CONFIG_KIND.to_string(),
            api: ApiSettings::default(),
            session: SessionSettings::default(),
            modal: ModalSettings::default(),
            permissions: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            ConsoleError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_yaml::from_str(&content).map_err(|e| {
            ConsoleError::Config(format!("Invalid {} YAML: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise, then apply environment overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            AppConfig::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(&url);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn apply_api_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api.base_url = url.trim_end_matches('/').to_string();
        }
    }

    /// Validate configuration
    ///
    /// Ensures:
    /// - apiVersion is "hrpay/v1" and kind is "Console"
    /// - api.baseUrl is an http(s) URL and the timeout is non-zero
    /// - session.storageKey is non-empty
    /// - any permissions override parses
    pub fn validate(&self) -> Result<()> {
        if self.api_version != CONFIG_API_VERSION {
            return Err(ConsoleError::Config(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                CONFIG_API_VERSION, self.api_version
            )));
        }

        if self.kind != CONFIG_KIND {
            return Err(ConsoleError::Config(format!(
                "Invalid kind: expected '{}', got '{}'",
                CONFIG_KIND, self.kind
            )));
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "api.baseUrl must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConsoleError::Config("api.timeoutSecs must be positive".to_string()));
        }

        if self.session.storage_key.trim().is_empty() {
            return Err(ConsoleError::Config("session.storageKey cannot be empty".to_string()));
        }

        self.permission_table()?;
        Ok(())
    }

    /// Permission table: the override if present, the built-in table otherwise.
    pub fn permission_table(&self) -> Result<PermissionTable> {
        match &self.permissions {
            Some(grants) => PermissionTable::from_grants(grants),
            None => Ok(PermissionTable::default()),
        }
    }

    /// Directory for file-backed session storage, relative to `base`.
    pub fn session_dir(&self, base: &Path) -> PathBuf {
        match &self.session.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base.join(".hrpay").join("session"),
        }
    }

    /// Save configuration to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}
