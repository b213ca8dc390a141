//! Modal manager
//!
//! One coordinator for every confirm and alert dialog of the console.
//! Callers ask for a dialog and get a [`ModalResponse`] back; the UI reports
//! what the user did through [`ModalManager::confirm`], [`ModalManager::cancel`],
//! [`ModalManager::dismiss`], [`ModalManager::escape`] and
//! [`ModalManager::overlay_click`].
//!
//! Per kind the manager is a small state machine:
//! ```text
//!   Idle ──show──► Pending ──resolve──► Idle (or next queued request)
//! ```
//! A request for a kind that is already pending waits in a FIFO queue and is
//! shown when the current one resolves. Each request resolves exactly once;
//! later resolution attempts return `false` and change nothing.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::modal::{
    AlertConfig, AlertOutcome, ConfirmConfig, ModalId, ModalKind, ModalPresenter, ModalResponse,
    ModalView, ScrollLock,
};

enum Responder {
    Confirm(oneshot::Sender<bool>),
    Alert(oneshot::Sender<AlertOutcome>),
}

impl Responder {
    /// True once the caller dropped its response.
    fn is_abandoned(&self) -> bool {
        match self {
            Responder::Confirm(tx) => tx.is_closed(),
            Responder::Alert(tx) => tx.is_closed(),
        }
    }
}

/// What the user (or the timer) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Confirm,
    Cancel,
    Dismiss,
    AutoClose,
    Withdraw,
}

struct Request {
    view: ModalView,
    responder: Responder,
    close_on_overlay: bool,
    close_on_escape: bool,
    auto_close: Option<std::time::Duration>,
}

impl Request {
    fn id(&self) -> ModalId {
        self.view.id
    }

    /// Deliver the answer for `resolution`. `false` if it does not apply to this kind.
    fn accepts(&self, resolution: Resolution) -> bool {
        match (&self.responder, resolution) {
            (Responder::Confirm(_), Resolution::Confirm | Resolution::Cancel | Resolution::Withdraw) => true,
            (Responder::Alert(_), Resolution::Cancel | Resolution::Dismiss | Resolution::AutoClose | Resolution::Withdraw) => true,
            _ => false,
        }
    }

    fn respond(self, resolution: Resolution) {
        // A dropped receiver means the caller went away; nothing to deliver to
        match self.responder {
            Responder::Confirm(tx) => {
                let _ = tx.send(resolution == Resolution::Confirm);
            }
            Responder::Alert(tx) => {
                let outcome = match resolution {
                    Resolution::AutoClose => AlertOutcome::AutoClosed,
                    Resolution::Withdraw => AlertOutcome::Cancelled,
                    _ => AlertOutcome::Dismissed,
                };
                let _ = tx.send(outcome);
            }
        }
    }
}

struct Active {
    request: Request,
    timer: Option<JoinHandle<()>>,
    /// Opening order across kinds; Escape targets the highest.
    opened: u64,
}

#[derive(Default)]
struct Slot {
    active: Option<Active>,
    queue: VecDeque<Request>,
}

#[derive(Default)]
struct Inner {
    slots: [Slot; 2],
    next_id: ModalId,
    opened_counter: u64,
    scroll_suppressed: bool,
    /// Presenter calls not made yet, in lock order.
    outbox: VecDeque<Effect>,
    /// Some caller is making the outbox calls right now.
    draining: bool,
}

impl Inner {
    fn any_active(&self) -> bool {
        self.slots.iter().any(|s| s.active.is_some())
    }
}

/// Presenter calls collected under the lock, made after it is released.
///
/// They go through one outbox so the presenter sees them in the order the
/// state changed, whichever thread made the change.
enum Effect {
    Present(ModalView),
    Close(ModalId),
}

#[derive(Clone)]
pub struct ModalManager {
    inner: Arc<Mutex<Inner>>,
    presenter: Arc<dyn ModalPresenter>,
    scroll: Arc<dyn ScrollLock>,
}

impl ModalManager {
    pub fn new(presenter: Arc<dyn ModalPresenter>, scroll: Arc<dyn ScrollLock>) -> Self {
        ModalManager {
            inner: Arc::new(Mutex::new(Inner::default())),
            presenter,
            scroll,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn downgrade(&self) -> WeakModalManager {
        WeakModalManager {
            inner: Arc::downgrade(&self.inner),
            presenter: self.presenter.clone(),
            scroll: self.scroll.clone(),
        }
    }

    /// Ask the user to confirm. Resolves `true` on confirm, `false` on cancel.
    pub fn show_confirm(&self, config: ConfirmConfig) -> ModalResponse<bool> {
        let (tx, rx) = oneshot::channel();
        let id = self.enqueue(|id| Request {
            view: ModalView::confirm(id, &config),
            responder: Responder::Confirm(tx),
            close_on_overlay: config.close_on_overlay,
            close_on_escape: config.close_on_escape,
            auto_close: None,
        });
        ModalResponse::new(id, rx, false).bound_to(self.downgrade())
    }

    /// Tell the user something. Resolves when dismissed or auto-closed.
    ///
    /// Auto-close needs a tokio runtime; without one the alert stays until
    /// dismissed.
    pub fn show_alert(&self, config: AlertConfig) -> ModalResponse<AlertOutcome> {
        let (tx, rx) = oneshot::channel();
        let id = self.enqueue(|id| Request {
            view: ModalView::alert(id, &config),
            responder: Responder::Alert(tx),
            close_on_overlay: config.close_on_overlay,
            close_on_escape: config.close_on_escape,
            auto_close: config.auto_close.then_some(config.auto_close_delay),
        });
        ModalResponse::new(id, rx, AlertOutcome::Cancelled).bound_to(self.downgrade())
    }

    fn enqueue(&self, build: impl FnOnce(ModalId) -> Request) -> ModalId {
        let mut effects = Vec::new();
        let mut inner = self.lock();
        inner.next_id += 1;
        let request = build(inner.next_id);
        let id = request.id();
        let kind = request.view.kind;

        if inner.slots[kind.index()].active.is_none() {
            self.activate(&mut inner, request, &mut effects);
        } else {
            tracing::debug!(id, %kind, "dialog busy, request queued");
            inner.slots[kind.index()].queue.push_back(request);
        }

        self.commit(inner, effects);
        id
    }

    fn activate(&self, inner: &mut Inner, request: Request, effects: &mut Vec<Effect>) {
        if !inner.scroll_suppressed {
            self.scroll.suppress();
            inner.scroll_suppressed = true;
        }

        inner.opened_counter += 1;
        let opened = inner.opened_counter;
        let timer = request.auto_close.and_then(|delay| self.spawn_auto_close(request.id(), delay));

        effects.push(Effect::Present(request.view.clone()));
        let kind = request.view.kind;
        inner.slots[kind.index()].active = Some(Active { request, timer, opened });
    }

    fn spawn_auto_close(&self, id: ModalId, delay: std::time::Duration) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(id, "no async runtime, alert will not auto-close");
                return None;
            }
        };

        let manager = self.clone();
        Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            manager.resolve(id, Resolution::AutoClose);
        }))
    }

    fn resolve(&self, id: ModalId, resolution: Resolution) -> bool {
        let mut effects = Vec::new();
        let mut inner = self.lock();
        let resolved = self.take(&mut inner, id, resolution, &mut effects);
        self.commit(inner, effects);

        match resolved {
            Some(request) => {
                request.respond(resolution);
                true
            }
            None => false,
        }
    }

    /// Remove `id` (active or queued) if `resolution` applies to it.
    fn take(
        &self,
        inner: &mut Inner,
        id: ModalId,
        resolution: Resolution,
        effects: &mut Vec<Effect>,
    ) -> Option<Request> {
        for kind in [ModalKind::Confirm, ModalKind::Alert] {
            let slot = &mut inner.slots[kind.index()];

            let is_active = slot.active.as_ref().map(|a| a.request.id() == id).unwrap_or(false);
            if is_active {
                if !slot.active.as_ref().map(|a| a.request.accepts(resolution)).unwrap_or(false) {
                    return None;
                }
                let active = slot.active.take()?;
                if let Some(timer) = active.timer {
                    if resolution != Resolution::AutoClose {
                        timer.abort();
                    }
                }
                effects.push(Effect::Close(id));
                tracing::debug!(id, %kind, ?resolution, "dialog resolved");

                self.advance(inner, kind, effects);
                return Some(active.request);
            }

            // Queued requests can only be withdrawn, never answered unseen
            if matches!(resolution, Resolution::Cancel | Resolution::Withdraw) {
                if let Some(pos) = slot.queue.iter().position(|r| r.id() == id) {
                    return slot.queue.remove(pos);
                }
            }
        }
        None
    }

    /// Show the next live queued request of `kind`, or release the scroll lock.
    fn advance(&self, inner: &mut Inner, kind: ModalKind, effects: &mut Vec<Effect>) {
        while let Some(next) = inner.slots[kind.index()].queue.pop_front() {
            if next.responder.is_abandoned() {
                tracing::debug!(id = next.id(), "skipping abandoned dialog request");
                continue;
            }
            self.activate(inner, next, effects);
            return;
        }

        if !inner.any_active() && inner.scroll_suppressed {
            self.scroll.restore();
            inner.scroll_suppressed = false;
        }
    }

    /// Queue `effects` behind earlier ones and release the lock. Unless
    /// another caller is already draining the outbox, drain it here, making
    /// each presenter call with the lock released.
    fn commit<'a>(&'a self, mut inner: MutexGuard<'a, Inner>, effects: Vec<Effect>) {
        inner.outbox.extend(effects);
        if inner.draining {
            return;
        }
        inner.draining = true;

        loop {
            let effect = match inner.outbox.pop_front() {
                Some(effect) => effect,
                None => {
                    inner.draining = false;
                    return;
                }
            };
            drop(inner);

            match effect {
                Effect::Present(view) => self.presenter.present(&view),
                Effect::Close(id) => self.presenter.close(id),
            }
            inner = self.lock();
        }
    }

    /// Drop a request whose caller no longer waits for it, active or queued.
    pub(crate) fn withdraw(&self, id: ModalId) -> bool {
        self.resolve(id, Resolution::Withdraw)
    }

    /// Confirm button of a confirm dialog.
    pub fn confirm(&self, id: ModalId) -> bool {
        self.resolve(id, Resolution::Confirm)
    }

    /// Cancel path: cancel button, or withdrawing a request (also a queued one)
    /// when the requesting view goes away.
    pub fn cancel(&self, id: ModalId) -> bool {
        self.resolve(id, Resolution::Cancel)
    }

    /// Button of an alert.
    pub fn dismiss(&self, id: ModalId) -> bool {
        self.resolve(id, Resolution::Dismiss)
    }

    /// Escape key: cancels the most recently opened dialog if it allows it.
    pub fn escape(&self) -> bool {
        let target = {
            let inner = self.lock();
            inner
                .slots
                .iter()
                .filter_map(|s| s.active.as_ref())
                .max_by_key(|a| a.opened)
                .filter(|a| a.request.close_on_escape)
                .map(|a| a.request.id())
        };
        match target {
            Some(id) => self.cancel(id),
            None => false,
        }
    }

    /// Click on the backdrop of dialog `id`.
    pub fn overlay_click(&self, id: ModalId) -> bool {
        let enabled = {
            let inner = self.lock();
            inner
                .slots
                .iter()
                .filter_map(|s| s.active.as_ref())
                .any(|a| a.request.id() == id && a.request.close_on_overlay)
        };
        enabled && self.cancel(id)
    }

    /// Active dialog of `kind`, if any.
    pub fn active(&self, kind: ModalKind) -> Option<ModalId> {
        self.lock().slots[kind.index()].active.as_ref().map(|a| a.request.id())
    }

    pub fn is_pending(&self, kind: ModalKind) -> bool {
        self.active(kind).is_some()
    }

    pub fn queued(&self, kind: ModalKind) -> usize {
        self.lock().slots[kind.index()].queue.len()
    }

    /// Withdraw every active and queued dialog, as when the console shuts down.
    pub fn shutdown(&self) {
        let mut effects = Vec::new();
        let mut withdrawn = Vec::new();
        let mut inner = self.lock();
        for slot in inner.slots.iter_mut() {
            if let Some(active) = slot.active.take() {
                if let Some(timer) = active.timer {
                    timer.abort();
                }
                effects.push(Effect::Close(active.request.id()));
                withdrawn.push(active.request);
            }
            withdrawn.extend(slot.queue.drain(..));
        }
        if inner.scroll_suppressed {
            self.scroll.restore();
            inner.scroll_suppressed = false;
        }
        self.commit(inner, effects);

        if !withdrawn.is_empty() {
            tracing::debug!(count = withdrawn.len(), "withdrawing open dialogs");
        }
        for request in withdrawn {
            request.respond(Resolution::Withdraw);
        }
    }
}

/// Non-owning manager handle kept by a [`ModalResponse`] so that dropping
/// the response withdraws its dialog.
pub(crate) struct WeakModalManager {
    inner: Weak<Mutex<Inner>>,
    presenter: Arc<dyn ModalPresenter>,
    scroll: Arc<dyn ScrollLock>,
}

impl WeakModalManager {
    pub(crate) fn upgrade(&self) -> Option<ModalManager> {
        Some(ModalManager {
            inner: self.inner.upgrade()?,
            presenter: self.presenter.clone(),
            scroll: self.scroll.clone(),
        })
    }
}

impl fmt::Debug for WeakModalManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakModalManager").finish_non_exhaustive()
    }
}
