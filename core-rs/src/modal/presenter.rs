//! Seams between the modal manager and whatever draws the dialogs

use crate::modal::{ModalId, ModalView};

/// Draws and removes dialogs.
///
/// Called after the manager has released its lock, so an implementation may
/// call back into the manager (for example to resolve a dialog right away).
pub trait ModalPresenter: Send + Sync {
    fn present(&self, view: &ModalView);

    fn close(&self, id: ModalId);
}

/// Suppresses background scrolling while any dialog is open.
///
/// The manager calls `suppress` once when the first dialog opens and
/// `restore` once when the last one closes. Called with the manager lock
/// held: implementations must not call back into the manager.
pub trait ScrollLock: Send + Sync {
    fn suppress(&self);

    fn restore(&self);
}

/// Scroll lock for front-ends with nothing to scroll.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScrollLock;

impl ScrollLock for NoScrollLock {
    fn suppress(&self) {}

    fn restore(&self) {}
}
