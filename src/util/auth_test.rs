use super::*;
use crate::config::AppConfig;
use crate::router::routes::{ledger_table, ACCOUNTS};
use crate::session::{FixedClock, MemorySlot, SessionStore, SessionToken};

const NOW: i64 = 1_700_000_000;

fn gate(slot: MemorySlot) -> NavigationGate<MemorySlot, FixedClock> {
    let table = Arc::new(ledger_table().unwrap());
    NavigationGate::new(table, SessionStore::new(slot), FixedClock(NOW), &AppConfig::default()).unwrap()
}

// =============================================================
// current_href
// =============================================================

#[test]
fn current_href_joins_search_with_or_without_question_mark() {
    assert_eq!(current_href("/login", "?to=x"), "/login?to=x");
    assert_eq!(current_href("/login", "to=x"), "/login?to=x");
    assert_eq!(current_href("/accounts", ""), "/accounts");
}

// =============================================================
// gate_action
// =============================================================

#[test]
fn public_route_renders() {
    let action = gate_action(&gate(MemorySlot::default()), "/");
    assert!(matches!(action, GateAction::Render(ref m) if m.path == "/"));
}

#[test]
fn missing_session_redirects_without_clearing() {
    let action = gate_action(&gate(MemorySlot::default()), "/accounts");
    let GateAction::Redirect { href, clear_session } = action else {
        panic!("expected redirect");
    };
    assert!(href.starts_with("/login?to="));
    assert!(!clear_session);
}

#[test]
fn expired_session_redirects_and_clears() {
    let gate = gate(MemorySlot::default());
    gate.store().set(&SessionToken::new("old", NOW - 1));
    assert!(matches!(gate_action(&gate, "/groups"), GateAction::Redirect { clear_session: true, .. }));
}

#[test]
fn malformed_session_redirects_and_clears() {
    let gate = gate(MemorySlot::with_raw("not json"));
    assert!(matches!(gate_action(&gate, "/transactions"), GateAction::Redirect { clear_session: true, .. }));
}

#[test]
fn valid_session_renders_guarded_route() {
    let gate = gate(MemorySlot::default());
    gate.store().set(&SessionToken::new("fresh", NOW + 60));
    let action = gate_action(&gate, "/accounts");
    assert!(matches!(action, GateAction::Render(ref m) if m.name.as_deref() == Some(ACCOUNTS)));
}

#[test]
fn unknown_path_is_not_found() {
    assert_eq!(gate_action(&gate(MemorySlot::default()), "/nope/nothing"), GateAction::NotFound);
}

#[test]
fn gate_action_never_writes_the_store() {
    let gate = gate(MemorySlot::with_raw("not json"));
    let _ = gate_action(&gate, "/accounts");
    assert_eq!(gate.store().slot().read().as_deref(), Some("not json"));
}

// =============================================================
// should_clear_session
// =============================================================

#[test]
fn only_expired_or_malformed_sessions_are_cleared() {
    assert!(should_clear_session(Validity::Expired));
    assert!(should_clear_session(Validity::Malformed));
    assert!(!should_clear_session(Validity::Missing));
    assert!(!should_clear_session(Validity::Valid));
}

// =============================================================
// require_token / api_error_message
// =============================================================

#[test]
fn require_token_returns_stored_valid_token() {
    let gate = gate(MemorySlot::default());
    gate.store().set(&SessionToken::new("fresh", NOW + 60));
    assert_eq!(require_token(&gate).map(|t| t.access_token), Ok("fresh".to_owned()));
}

#[test]
fn require_token_rejects_expired_token() {
    let gate = gate(MemorySlot::default());
    gate.store().set(&SessionToken::new("old", NOW - 60));
    assert_eq!(require_token(&gate), Err(ApiError::Unauthenticated));
}

#[test]
fn unauthenticated_api_error_clears_session() {
    let gate = gate(MemorySlot::default());
    gate.store().set(&SessionToken::new("fresh", NOW + 60));
    let message = api_error_message(&gate, &ApiError::Unauthenticated);
    assert!(message.contains("sign in"));
    assert_eq!(gate.store().get(), None);
}

#[test]
fn other_api_errors_keep_session() {
    let gate = gate(MemorySlot::default());
    gate.store().set(&SessionToken::new("fresh", NOW + 60));
    let message = api_error_message(&gate, &ApiError::Transport("offline".to_owned()));
    assert_eq!(message, "request failed: offline");
    assert!(gate.store().get().is_some());
}
