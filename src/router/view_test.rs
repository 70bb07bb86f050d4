use std::sync::atomic::{AtomicUsize, Ordering};

use futures::executor::block_on;

use super::*;

fn counting_loader(calls: Arc<AtomicUsize>, kind: ViewKind) -> LazyView {
    LazyView::new("counted", move || {
        calls.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok(kind)).boxed()
    })
}

// =============================================================
// Eager and empty bindings
// =============================================================

#[test]
fn eager_binding_resolves_immediately() {
    let binding = ViewBinding::Eager(ViewKind::Home);
    assert_eq!(block_on(binding.load()), Ok(ViewKind::Home));
}

#[test]
fn empty_binding_fails_to_load() {
    assert!(ViewBinding::None.is_none());
    assert!(block_on(ViewBinding::None.load()).is_err());
}

// =============================================================
// Lazy bindings
// =============================================================

#[test]
fn lazy_binding_loads_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let binding = ViewBinding::Lazy(counting_loader(calls.clone(), ViewKind::Groups));
    assert_eq!(block_on(binding.load()), Ok(ViewKind::Groups));
    assert_eq!(block_on(binding.load()), Ok(ViewKind::Groups));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn lazy_binding_is_not_started_until_requested() {
    let calls = Arc::new(AtomicUsize::new(0));
    let lazy = counting_loader(calls.clone(), ViewKind::Groups);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!lazy.is_loaded());
    let _ = block_on(lazy.resolve());
    assert!(lazy.is_loaded());
}

#[test]
fn clones_share_the_same_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let lazy = counting_loader(calls.clone(), ViewKind::Accounts);
    let twin = lazy.clone();
    let _ = block_on(lazy.resolve());
    let _ = block_on(twin.resolve());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_load_is_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let lazy = LazyView::new("flaky", move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        let result = if attempt == 0 {
            Err(ViewLoadError::Failed { bundle: "flaky".to_owned(), reason: "offline".to_owned() })
        } else {
            Ok(ViewKind::Transactions)
        };
        future::ready(result).boxed()
    });
    assert!(block_on(lazy.resolve()).is_err());
    assert_eq!(block_on(lazy.resolve()), Ok(ViewKind::Transactions));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn pending_load_is_not_loaded() {
    let lazy = LazyView::new("stuck", || future::pending().boxed());
    let handle = lazy.resolve();
    assert!(handle.peek().is_none());
    assert!(!lazy.is_loaded());
}

#[test]
fn debug_shows_bundle_name() {
    let lazy = LazyView::ready("accounts", ViewKind::Accounts);
    assert!(format!("{lazy:?}").contains("accounts"));
    assert_eq!(lazy.bundle(), "accounts");
}
