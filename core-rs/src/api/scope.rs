//! View-bound request lifetimes
//!
//! A [`ViewScope`] lives as long as the view that issued requests. When the
//! view closes (explicitly or by dropping the scope), work bound to it is
//! abandoned instead of delivering results into a view that no longer exists.

use std::future::Future;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewScope {
    closed: watch::Sender<bool>,
}

/// Cloneable handle for binding work from spawned tasks.
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    closed: watch::Receiver<bool>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        ViewScope { closed }
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle { closed: self.closed.subscribe() }
    }

    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Run `fut` unless the view closes first; `None` when abandoned.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        self.handle().run(fut).await
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.closed.send_replace(true);
    }
}

impl ScopeHandle {
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let mut closed = self.closed.clone();
        if *closed.borrow_and_update() {
            return None;
        }

        tokio::select! {
            output = fut => Some(output),
            // Err means the scope itself is gone, which also closes the view
            _ = closed.wait_for(|c| *c) => {
                tracing::debug!("view closed, abandoning request");
                None
            }
        }
    }
}
