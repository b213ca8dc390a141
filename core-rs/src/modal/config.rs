//! Dialog request configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub type ModalId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    Confirm,
    Alert,
}

impl ModalKind {
    pub(crate) fn index(self) -> usize {
        match self {
            ModalKind::Confirm => 0,
            ModalKind::Alert => 1,
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalKind::Confirm => f.write_str("confirm"),
            ModalKind::Alert => f.write_str("alert"),
        }
    }
}

/// Visual tone of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

/// How an alert ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertOutcome {
    /// Button, Escape or overlay click.
    Dismissed,
    AutoClosed,
    /// Withdrawn without the user seeing it through (shutdown, view unmounted).
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmConfig {
    pub title: String,
    pub message: String,
    pub variant: Variant,
    pub confirm_text: String,
    pub cancel_text: String,
    pub close_on_overlay: bool,
    pub close_on_escape: bool,
}

impl ConfirmConfig {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        ConfirmConfig {
            title: title.into(),
            message: message.into(),
            variant: Variant::Warning,
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            close_on_overlay: true,
            close_on_escape: true,
        }
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn buttons(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_text = confirm.into();
        self.cancel_text = cancel.into();
        self
    }

    pub fn close_on_overlay(mut self, enabled: bool) -> Self {
        self.close_on_overlay = enabled;
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    pub title: String,
    pub message: String,
    pub variant: Variant,
    pub button_text: String,
    pub auto_close: bool,
    pub auto_close_delay: Duration,
    pub close_on_overlay: bool,
    pub close_on_escape: bool,
}

impl AlertConfig {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        AlertConfig {
            title: title.into(),
            message: message.into(),
            variant: Variant::Info,
            button_text: "OK".to_string(),
            auto_close: false,
            auto_close_delay: Duration::from_millis(3000),
            close_on_overlay: true,
            close_on_escape: true,
        }
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = text.into();
        self
    }

    /// Close by itself after `delay` unless dismissed first.
    pub fn auto_close(mut self, delay: Duration) -> Self {
        self.auto_close = true;
        self.auto_close_delay = delay;
        self
    }

    pub fn close_on_overlay(mut self, enabled: bool) -> Self {
        self.close_on_overlay = enabled;
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }
}

/// What a presenter draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub id: ModalId,
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
    pub variant: Variant,
    /// Button labels, primary first.
    pub buttons: Vec<String>,
}

impl ModalView {
    pub(crate) fn confirm(id: ModalId, config: &ConfirmConfig) -> Self {
        ModalView {
            id,
            kind: ModalKind::Confirm,
            title: config.title.clone(),
            message: config.message.clone(),
            variant: config.variant,
            buttons: vec![config.confirm_text.clone(), config.cancel_text.clone()],
        }
    }

    pub(crate) fn alert(id: ModalId, config: &AlertConfig) -> Self {
        ModalView {
            id,
            kind: ModalKind::Alert,
            title: config.title.clone(),
            message: config.message.clone(),
            variant: config.variant,
            buttons: vec![config.button_text.clone()],
        }
    }
}
