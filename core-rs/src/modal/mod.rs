//! Modal module
//!
//! Confirm/alert dialog coordination with deferred results:
//! - ModalManager: per-kind state machine with a FIFO queue
//! - ModalResponse: future resolved by the user's action
//! - ModalPresenter / ScrollLock: seams to the front-end

pub mod config;
pub mod manager;
pub mod presenter;
pub mod response;

pub use config::{AlertConfig, AlertOutcome, ConfirmConfig, ModalId, ModalKind, ModalView, Variant};
pub use manager::ModalManager;
pub use presenter::{ModalPresenter, NoScrollLock, ScrollLock};
pub use response::ModalResponse;
