// Modal Manager Contract Tests
//
// These tests verify INVARIANTS that MUST NEVER BREAK regardless of implementation.
//
// **Problem**: double resolution and premature scroll restore are easy to reintroduce
// **Solution**: contracts for exactly-once resolution, FIFO queueing and the scroll toggle

use hrpay_core::modal::{
    AlertConfig, AlertOutcome, ConfirmConfig, ModalId, ModalKind, ModalManager, ModalPresenter,
    ModalView, ScrollLock,
};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct NullPresenter;

impl ModalPresenter for NullPresenter {
    fn present(&self, _view: &ModalView) {}
    fn close(&self, _id: ModalId) {}
}

/// Tracks lock depth; must only ever be 0 or 1.
#[derive(Default)]
struct DepthScroll {
    depth: AtomicI64,
    toggles: AtomicUsize,
}

impl ScrollLock for DepthScroll {
    fn suppress(&self) {
        self.depth.fetch_add(1, Ordering::SeqCst);
        self.toggles.fetch_add(1, Ordering::SeqCst);
    }

    fn restore(&self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
        self.toggles.fetch_add(1, Ordering::SeqCst);
    }
}

fn manager() -> (ModalManager, Arc<DepthScroll>) {
    let scroll = Arc::new(DepthScroll::default());
    (ModalManager::new(Arc::new(NullPresenter), scroll.clone()), scroll)
}

/// WHY: Cancel resolves false, confirm resolves true, exactly once
/// REASON: Callers branch on the answer; a second resolution would run both branches
#[tokio::test]
async fn confirm_resolves_exactly_once() {
    let (manager, _) = manager();

    let cancelled = manager.show_confirm(ConfirmConfig::new("Delete", "Remove?"));
    let id = cancelled.id();
    assert!(manager.cancel(id));
    assert!(!manager.confirm(id), "second resolution must be a no-op");
    assert!(!cancelled.await);

    let confirmed = manager.show_confirm(ConfirmConfig::new("Delete", "Remove?"));
    let id = confirmed.id();
    assert!(manager.confirm(id));
    assert!(!manager.cancel(id), "second resolution must be a no-op");
    assert!(confirmed.await);
}

/// WHY: Auto-close alerts resolve on their own within the configured window
#[tokio::test(start_paused = true)]
async fn alert_auto_closes_within_delay() {
    let (manager, _) = manager();
    let started = tokio::time::Instant::now();
    let response = manager.show_alert(AlertConfig::new("Saved", "").auto_close(Duration::from_millis(3000)));

    let outcome = tokio::time::timeout(Duration::from_millis(3100), response).await;
    assert_eq!(outcome.unwrap(), AlertOutcome::AutoClosed);
    assert!(started.elapsed() >= Duration::from_millis(3000));
}

/// WHY: Manual dismissal cancels the pending auto-close
/// REASON: The timer firing later would resolve the same alert a second time
#[tokio::test(start_paused = true)]
async fn manual_dismiss_wins_over_auto_close() {
    let (manager, scroll) = manager();
    let response = manager.show_alert(AlertConfig::new("Saved", "").auto_close(Duration::from_millis(3000)));
    let id = response.id();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(manager.dismiss(id));
    assert_eq!(response.await, AlertOutcome::Dismissed);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(scroll.toggles.load(Ordering::SeqCst), 2);
    assert!(!manager.is_pending(ModalKind::Alert));
}

/// WHY: A request while one is pending is queued FIFO, never overwritten
/// REASON: Overwriting left the first caller waiting forever
#[tokio::test]
async fn busy_kind_queues_in_order() {
    let (manager, _) = manager();
    let responses: Vec<_> = (0..3)
        .map(|i| manager.show_confirm(ConfirmConfig::new(format!("Q{}", i), "")))
        .collect();

    for response in &responses {
        assert_eq!(manager.active(ModalKind::Confirm), Some(response.id()));
        manager.confirm(response.id());
    }
    for response in responses {
        assert!(response.await);
    }
}

/// WHY: Scroll is suppressed while any modal is open and restored once at the end
/// REASON: Per-modal toggling restores scroll while another dialog is still up
#[tokio::test]
async fn scroll_lock_follows_any_modal_open() {
    let (manager, scroll) = manager();

    let confirm = manager.show_confirm(ConfirmConfig::new("Q", ""));
    let alert = manager.show_alert(AlertConfig::new("A", ""));
    let queued = manager.show_alert(AlertConfig::new("B", ""));
    assert_eq!(scroll.depth.load(Ordering::SeqCst), 1);

    manager.cancel(confirm.id());
    assert_eq!(scroll.depth.load(Ordering::SeqCst), 1, "alert still open");

    manager.dismiss(alert.id());
    assert_eq!(scroll.depth.load(Ordering::SeqCst), 1, "queued alert took over");

    manager.dismiss(queued.id());
    assert_eq!(scroll.depth.load(Ordering::SeqCst), 0);
    assert_eq!(scroll.toggles.load(Ordering::SeqCst), 2);
}

/// WHY: Escape is the cancel path and resolves exactly once
#[tokio::test]
async fn escape_is_cancel() {
    let (manager, _) = manager();
    let response = manager.show_confirm(ConfirmConfig::new("Q", ""));
    let id = response.id();

    assert!(manager.escape());
    assert!(!manager.escape());
    assert!(!manager.confirm(id));
    assert!(!response.await);
}

/// WHY: Dropping an unresolved response withdraws its dialog, open or queued
/// REASON: A view that unmounts mid-dialog must not block later dialogs of that kind
/// BREAKS: The next confirm would wait behind a dialog nobody can answer
#[tokio::test]
async fn unmounted_caller_releases_the_dialog() {
    let (manager, scroll) = manager();

    let unmounted = manager.show_confirm(ConfirmConfig::new("Unmounted", ""));
    drop(unmounted);
    assert_eq!(manager.active(ModalKind::Confirm), None);
    assert_eq!(scroll.depth.load(Ordering::SeqCst), 0);

    let live = manager.show_confirm(ConfirmConfig::new("Live", ""));
    assert_eq!(manager.active(ModalKind::Confirm), Some(live.id()));
    assert_eq!(manager.queued(ModalKind::Confirm), 0);

    let queued = manager.show_confirm(ConfirmConfig::new("Queued", ""));
    assert_eq!(manager.queued(ModalKind::Confirm), 1);
    drop(queued);
    assert_eq!(manager.queued(ModalKind::Confirm), 0);

    assert!(manager.confirm(live.id()));
    assert!(live.await);
    assert_eq!(scroll.depth.load(Ordering::SeqCst), 0);
}
