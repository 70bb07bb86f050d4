use futures::FutureExt as _;
use futures::future;

use super::*;
use crate::router::location::Location;
use crate::router::routes::ledger_table;
use crate::router::table::RouteSpec;
use crate::router::view::{ViewBinding, ViewKind};
use crate::session::{FixedClock, MemorySlot, SessionToken};

const NOW: i64 = 1_700_000_000;

fn gate_with(slot: MemorySlot, now: i64) -> NavigationGate<MemorySlot, FixedClock> {
    let table = Arc::new(ledger_table().unwrap());
    NavigationGate::new(table, SessionStore::new(slot), FixedClock(now), &AppConfig::default()).unwrap()
}

fn gate_with_token(expires_in: i64) -> NavigationGate<MemorySlot, FixedClock> {
    let gate = gate_with(MemorySlot::default(), NOW);
    gate.store().set(&SessionToken::new("tkn", expires_in));
    gate
}

fn redirect(decision: Decision) -> Redirect {
    match decision {
        Decision::Redirected(redirect) => redirect,
        Decision::Admitted(matched) => panic!("expected redirect, admitted {}", matched.path),
    }
}

fn id_params(id: &str) -> Params {
    [("id".to_owned(), serde_json::json!(id))].into_iter().collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn login_path_comes_from_config() {
    assert_eq!(gate_with(MemorySlot::default(), NOW).login_path(), "/login");
}

#[test]
fn missing_login_route_is_rejected() {
    let table = Arc::new(RouteTable::new(vec![RouteSpec::new("/").named("home").eager(ViewKind::Home)]).unwrap());
    let result = NavigationGate::new(table, SessionStore::new(MemorySlot::default()), FixedClock(NOW), &AppConfig::default());
    assert!(matches!(result, Err(RouteError::UnknownName { .. })));
}

#[test]
fn guarded_login_route_is_rejected() {
    let table = Arc::new(
        RouteTable::new(vec![RouteSpec::new("login").named("login").needs_auth(true).eager(ViewKind::Login)]).unwrap(),
    );
    let result = NavigationGate::new(table, SessionStore::new(MemorySlot::default()), FixedClock(NOW), &AppConfig::default());
    assert!(matches!(result, Err(RouteError::InvalidDeclaration(_))));
}

// =============================================================
// Unguarded targets
// =============================================================

#[test]
fn unguarded_targets_admit_regardless_of_session() {
    let slots = [
        MemorySlot::default(),
        MemorySlot::with_raw("garbage"),
        MemorySlot::with_raw(r#"{"access_token":"t","expires_in":1}"#),
    ];
    for slot in slots {
        let gate = gate_with(slot, NOW);
        for path in ["/", "/login", "/login?to=x"] {
            assert!(gate.evaluate(&NavigationTarget::path(path)).unwrap().is_admitted(), "{path}");
        }
    }
}

// =============================================================
// Guarded targets
// =============================================================

#[test]
fn valid_token_admits_guarded_target() {
    let gate = gate_with_token(NOW + 60);
    let decision = gate.evaluate(&NavigationTarget::path("/accounts/4/edit")).unwrap();
    let Decision::Admitted(matched) = decision else {
        panic!("expected admission");
    };
    assert_eq!(matched.name.as_deref(), Some("account-edit"));
}

#[test]
fn token_expiring_now_admits() {
    let gate = gate_with_token(NOW);
    assert!(gate.evaluate(&NavigationTarget::path("/groups")).unwrap().is_admitted());
}

#[test]
fn absent_token_redirects_with_intent() {
    let gate = gate_with(MemorySlot::default(), NOW);
    let redirect = redirect(gate.evaluate(&NavigationTarget::path("/accounts/9")).unwrap());
    assert_eq!(redirect.cause, Validity::Missing);
    assert_eq!(redirect.path, "/login");
    assert_eq!(redirect.intent, IntendedDestination::named("account", id_params("9")));
    assert_eq!(gate.carrier().decode(Some(&redirect.payload)), redirect.intent);
}

#[test]
fn malformed_token_redirects() {
    for raw in ["not json", r#"{"access_token":"t","expires_in":"x"}"#, r#"{"access_token":"t"}"#] {
        let gate = gate_with(MemorySlot::with_raw(raw), NOW);
        let redirect = redirect(gate.evaluate(&NavigationTarget::path("/transactions")).unwrap());
        assert_eq!(redirect.cause, Validity::Malformed, "{raw}");
        assert_eq!(redirect.intent, IntendedDestination::named("transactions", Params::new()));
    }
}

#[test]
fn expired_token_redirects() {
    let gate = gate_with_token(NOW - 1);
    let redirect = redirect(gate.evaluate(&NavigationTarget::path("/groups")).unwrap());
    assert_eq!(redirect.cause, Validity::Expired);
}

#[test]
fn named_target_is_guarded_too() {
    let gate = gate_with(MemorySlot::default(), NOW);
    let redirect = redirect(gate.evaluate(&NavigationTarget::named("account", id_params("2"))).unwrap());
    assert_eq!(redirect.intent, IntendedDestination::named("account", id_params("2")));
}

#[test]
fn gate_does_not_touch_the_store() {
    let gate = gate_with_token(NOW - 10);
    let before = gate.store().slot().read();
    let _ = gate.evaluate(&NavigationTarget::path("/accounts")).unwrap();
    assert_eq!(gate.store().slot().read(), before);
}

#[test]
fn redirect_href_without_payload_is_login_path() {
    let redirect = Redirect {
        path: "/login".to_owned(),
        param: "to".to_owned(),
        intent: IntendedDestination::named("home", Params::new()),
        payload: String::new(),
        cause: Validity::Missing,
    };
    assert_eq!(redirect.href(), "/login");
}

// =============================================================
// Unresolved targets
// =============================================================

#[test]
fn unknown_path_is_an_error() {
    let gate = gate_with(MemorySlot::default(), NOW);
    let err = gate.evaluate(&NavigationTarget::path("/nowhere")).unwrap_err();
    assert_eq!(err, RouteError::Unresolved { path: "/nowhere".to_owned() });
}

#[test]
fn unknown_name_is_an_error() {
    let gate = gate_with(MemorySlot::default(), NOW);
    assert!(gate.evaluate(&NavigationTarget::named("ghost", Params::new())).is_err());
}

// =============================================================
// Independence from view loading
// =============================================================

#[test]
fn decision_does_not_wait_for_a_stuck_bundle() {
    let table = Arc::new(
        RouteTable::new(vec![
            RouteSpec::new("login").named("login").eager(ViewKind::Login),
            RouteSpec::new("/").named("home").eager(ViewKind::Home),
            RouteSpec::new("vault")
                .named("vault")
                .needs_auth(true)
                .view(ViewBinding::lazy("vault", || future::pending().boxed())),
        ])
        .unwrap(),
    );
    let denied = NavigationGate::new(
        table.clone(),
        SessionStore::new(MemorySlot::default()),
        FixedClock(NOW),
        &AppConfig::default(),
    )
    .unwrap();
    let admitted = NavigationGate::new(
        table.clone(),
        SessionStore::new(MemorySlot::with_raw(r#"{"access_token":"t","expires_in":1800000000}"#)),
        FixedClock(NOW),
        &AppConfig::default(),
    )
    .unwrap();

    let target = NavigationTarget::path("/vault");
    let Decision::Admitted(matched) = admitted.evaluate(&target).unwrap() else {
        panic!("expected admission");
    };
    let mut load = table.load_view(&matched);
    assert!((&mut load).now_or_never().is_none());

    for _ in 0..3 {
        assert!(admitted.evaluate(&target).unwrap().is_admitted());
        assert!(!denied.evaluate(&target).unwrap().is_admitted());
    }
}

// =============================================================
// Latest intent wins
// =============================================================

#[test]
fn only_latest_attempt_is_current() {
    let gate = gate_with(MemorySlot::default(), NOW);
    let first = gate.attempts().begin();
    assert!(gate.attempts().is_current(first));
    let second = gate.attempts().begin();
    assert!(!gate.attempts().is_current(first));
    assert!(gate.attempts().is_current(second));
}

// =============================================================
// End to end
// =============================================================

#[test]
fn expired_session_is_sent_to_login_and_resumed_after_refresh() {
    let gate = gate_with_token(NOW - 1);

    let redirect = redirect(gate.evaluate(&NavigationTarget::path("/accounts")).unwrap());
    assert_eq!(redirect.path, "/login");
    assert_eq!(redirect.payload, r#"{"name":"accounts","params":{}}"#);

    // The login view receives the decoded query value.
    let login = Location::parse(&redirect.href());
    assert_eq!(login.path, "/login");
    let raw_intent = login.query_value(gate.intent_param()).map(str::to_owned);
    assert_eq!(raw_intent.as_deref(), Some(r#"{"name":"accounts","params":{}}"#));
    assert!(gate.evaluate(&NavigationTarget::path(&redirect.href())).unwrap().is_admitted());

    // Successful login exchange stores a fresh token.
    gate.store().set(&SessionToken::new("fresh", NOW + 300));

    let resume = gate.resume_href(raw_intent.as_deref());
    assert_eq!(resume, "/accounts");
    let Decision::Admitted(matched) = gate.evaluate(&NavigationTarget::path(&resume)).unwrap() else {
        panic!("expected admission after login");
    };
    assert_eq!(matched.path, "/accounts");
}
