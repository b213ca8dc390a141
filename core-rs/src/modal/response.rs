//! Deferred dialog results

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::modal::manager::WeakModalManager;
use crate::modal::ModalId;

/// Result of a dialog that resolves once the user acts.
///
/// Await it to get the answer. If the manager goes away before the dialog
/// resolves, the cancel value is produced (`false` for confirms,
/// `AlertOutcome::Cancelled` for alerts). Dropping an unresolved response
/// withdraws its dialog: an open one is closed, a queued one is never shown.
#[derive(Debug)]
pub struct ModalResponse<T> {
    id: ModalId,
    rx: oneshot::Receiver<T>,
    cancel_value: T,
    manager: Option<WeakModalManager>,
    settled: bool,
}

impl<T: Copy> ModalResponse<T> {
    pub(crate) fn new(id: ModalId, rx: oneshot::Receiver<T>, cancel_value: T) -> Self {
        ModalResponse { id, rx, cancel_value, manager: None, settled: false }
    }

    pub(crate) fn bound_to(mut self, manager: WeakModalManager) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn id(&self) -> ModalId {
        self.id
    }

    /// Non-blocking check: `None` while the dialog is still pending.
    pub fn try_result(&mut self) -> Option<T> {
        let result = match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(self.cancel_value),
        };
        self.settled |= result.is_some();
        result
    }
}

impl<T: Copy + Unpin> Future for ModalResponse<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let cancel_value = self.cancel_value;
        let poll = Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(cancel_value));
        if poll.is_ready() {
            self.settled = true;
        }
        poll
    }
}

impl<T> Drop for ModalResponse<T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Some(manager) = self.manager.take().and_then(|m| m.upgrade()) {
            if manager.withdraw(self.id) {
                tracing::debug!(id = self.id, "dialog withdrawn, caller went away");
            }
        }
    }
}
