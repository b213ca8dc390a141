//! Console context
//!
//! Wires one session store, permission table, modal manager and API client
//! together for a front-end. Built explicitly at startup and shut down
//! explicitly; nothing here is global.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::errors::{ConsoleError, Result};
use crate::modal::{AlertConfig, AlertOutcome, ModalManager, ModalPresenter, ModalResponse, ScrollLock, Variant};
use crate::rbac::{AccessControl, PermissionTable};
use crate::session::{Session, SessionStore, TokenStorage};

pub struct Console {
    config: AppConfig,
    session: Arc<SessionStore>,
    permissions: PermissionTable,
    modals: ModalManager,
    api: ApiClient,
}

impl Console {
    /// Build the context and restore any stored session.
    pub fn start(
        config: AppConfig,
        storage: Arc<dyn TokenStorage>,
        presenter: Arc<dyn ModalPresenter>,
        scroll: Arc<dyn ScrollLock>,
    ) -> Result<Self> {
        config.validate()?;
        let permissions = config.permission_table()?;
        let session = Arc::new(SessionStore::new(storage, config.session.clone()));
        let api = ApiClient::new(&config.api, session.clone())?;
        let modals = ModalManager::new(presenter, scroll);

        session.init();

        Ok(Console { config, session, permissions, modals, api })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.session.session()
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Access checks against the session as it is right now.
    pub fn access(&self) -> AccessControl<'_> {
        AccessControl::for_store(&self.session, &self.permissions)
    }

    pub fn modals(&self) -> &ModalManager {
        &self.modals
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Gate an action on a permission tag: `Auth` without a session,
    /// `Forbidden` when the role lacks the tag.
    pub fn require_permission(&self, tag: &str) -> Result<()> {
        let access = self.access();
        if !access.session().is_authenticated {
            return Err(ConsoleError::Auth("not logged in".to_string()));
        }
        if !access.check_permission(tag) {
            return Err(ConsoleError::Forbidden(format!("permission '{}' not granted", tag)));
        }
        Ok(())
    }

    /// Surface an error to the operator as an alert.
    pub fn report(&self, err: &ConsoleError) -> ModalResponse<AlertOutcome> {
        tracing::warn!("{}", err);
        let title = match err {
            ConsoleError::Validation(_) => "Check the form",
            ConsoleError::Auth(_) => "Authentication failed",
            ConsoleError::Forbidden(_) => "Not allowed",
            ConsoleError::Network(_) => "Request failed",
            _ => "Error",
        };
        self.modals
            .show_alert(AlertConfig::new(title, err.user_message()).variant(Variant::Danger))
    }

    /// Short success notice that closes by itself.
    pub fn notify(&self, title: &str, message: impl Into<String>) -> ModalResponse<AlertOutcome> {
        self.modals.show_alert(
            AlertConfig::new(title, message)
                .variant(Variant::Success)
                .auto_close(self.config.modal.auto_close_delay()),
        )
    }

    /// Withdraw open dialogs and drop in-memory session state.
    pub fn shutdown(&self) {
        self.modals.shutdown();
        self.session.teardown();
    }
}
