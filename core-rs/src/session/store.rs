//! Session store
//!
//! Owns the one [`Session`] value of a running console. It is constructed
//! explicitly and handed to whoever needs it; there is no global instance.
//!
//! Lifecycle:
//! ```text
//!   new() ──► initial (loading) ──init()──► authenticated | anonymous
//!                                   login() ──► authenticated
//!                                  logout() ──► anonymous
//!                                teardown() ──► initial (loading)
//! ```
//!
//! Every transition takes the state lock once and replaces the token and the
//! session together, so a login can never leave claims that disagree with the
//! stored token.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::SessionSettings;
use crate::errors::{ConsoleError, Result};
use crate::session::TokenStorage;
use crate::token::{self, Claims};

/// Snapshot of the operator's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub claims: Option<Claims>,
    pub loading: bool,
}

impl Session {
    /// Value before the stored token has been looked at.
    pub fn initial() -> Self {
        Session { is_authenticated: false, claims: None, loading: true }
    }

    /// Settled, logged-out value.
    pub fn anonymous() -> Self {
        Session { is_authenticated: false, claims: None, loading: false }
    }

    pub fn authenticated(claims: Claims) -> Self {
        Session { is_authenticated: true, claims: Some(claims), loading: false }
    }
}

#[derive(Debug)]
struct State {
    session: Session,
    /// Token the current claims were decoded from.
    token: Option<String>,
    initialized: bool,
}

impl State {
    fn initial() -> Self {
        State { session: Session::initial(), token: None, initialized: false }
    }

    fn anonymous() -> Self {
        State { session: Session::anonymous(), token: None, initialized: true }
    }

    fn authenticated(token: String, claims: Claims) -> Self {
        State { session: Session::authenticated(claims), token: Some(token), initialized: true }
    }
}

pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    settings: SessionSettings,
    state: Mutex<State>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TokenStorage>, settings: SessionSettings) -> Self {
        SessionStore { storage, settings, state: Mutex::new(State::initial()) }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn storage_key(&self) -> &str {
        &self.settings.storage_key
    }

    /// Restore the session from storage. Runs once; later calls return the
    /// current session.
    pub fn init(&self) -> Session {
        let mut state = self.lock();
        if state.initialized {
            return state.session.clone();
        }

        *state = match self.storage.load(&self.settings.storage_key) {
            Ok(Some(stored)) => self.restore(stored),
            Ok(None) => State::anonymous(),
            Err(e) => {
                tracing::warn!("could not read stored session token: {}", e);
                State::anonymous()
            }
        };

        tracing::debug!(authenticated = state.session.is_authenticated, "session initialized");
        state.session.clone()
    }

    fn restore(&self, stored: String) -> State {
        let claims = token::decode(&stored);
        if claims.is_empty() {
            tracing::debug!("stored token carries no claims, starting anonymous");
            return State::anonymous();
        }

        if self.settings.reject_expired && claims.is_expired_at(Utc::now()) {
            tracing::info!("stored token expired, login required");
            if let Err(e) = self.storage.clear(&self.settings.storage_key) {
                tracing::warn!("could not clear expired token: {}", e);
            }
            return State::anonymous();
        }

        State::authenticated(stored, claims)
    }

    /// Current session.
    ///
    /// An authenticated session is only reported while storage still holds
    /// the token its claims came from; otherwise the store falls back to
    /// anonymous.
    pub fn session(&self) -> Session {
        let mut state = self.lock();
        self.verify(&mut state);
        state.session.clone()
    }

    /// Bearer token for backend calls, `None` when not logged in.
    pub fn token(&self) -> Option<String> {
        let mut state = self.lock();
        self.verify(&mut state);
        state.token.clone()
    }

    fn verify(&self, state: &mut State) {
        if !state.session.is_authenticated {
            return;
        }

        let stored = match self.storage.load(&self.settings.storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("could not read session token: {}", e);
                None
            }
        };

        if stored != state.token {
            tracing::info!("session token no longer in storage, dropping session");
            *state = State::anonymous();
        }
    }

    /// Start a session from a freshly issued token.
    ///
    /// A token without claims is rejected and nothing is stored.
    pub fn login(&self, token: &str) -> Result<Session> {
        let token = token.trim();
        let claims = token::decode(token);
        if claims.is_empty() {
            return Err(ConsoleError::Auth("received token carries no identity".to_string()));
        }
        if self.settings.reject_expired && claims.is_expired_at(Utc::now()) {
            return Err(ConsoleError::Auth("received token is already expired".to_string()));
        }

        let mut state = self.lock();
        self.storage.store(&self.settings.storage_key, token)?;
        *state = State::authenticated(token.to_string(), claims);

        if let Some(claims) = &state.session.claims {
            tracing::info!(user = claims.display_name(), role = ?claims.role, "logged in");
        }
        Ok(state.session.clone())
    }

    /// End the session. In-memory state is reset even if clearing storage fails.
    pub fn logout(&self) -> Result<()> {
        let mut state = self.lock();
        let cleared = self.storage.clear(&self.settings.storage_key);
        *state = State::anonymous();
        tracing::info!("logged out");
        cleared
    }

    /// Drop in-memory state without touching storage, as on application unload.
    pub fn teardown(&self) {
        *self.lock() = State::initial();
    }
}
