use super::*;
use crate::router::table::RouteSpec;
use crate::router::view::ViewKind;

fn carrier() -> IntentCarrier {
    IntentCarrier::new(IntendedDestination::named("home", Params::new()))
}

fn table() -> RouteTable {
    RouteTable::new(vec![
        RouteSpec::new("/").named("home").eager(ViewKind::Home),
        RouteSpec::new("accounts").named("accounts").eager(ViewKind::Accounts).children(vec![
            RouteSpec::new(":id").named("account").eager(ViewKind::Account),
        ]),
        RouteSpec::new("raw/:slug").eager(ViewKind::Groups),
    ])
    .unwrap()
}

fn id_params(id: &str) -> Params {
    [("id".to_owned(), serde_json::json!(id))].into_iter().collect()
}

// =============================================================
// encode / decode
// =============================================================

#[test]
fn encode_named_destination() {
    let raw = carrier().encode(&IntendedDestination::named("accounts", Params::new()));
    assert_eq!(raw, r#"{"name":"accounts","params":{}}"#);
}

#[test]
fn named_destination_round_trips() {
    let mut params = id_params("7");
    params.insert("filter".to_owned(), serde_json::json!({"group": 3, "tags": ["a", null, true]}));
    let destination = IntendedDestination::named("account", params);
    let c = carrier();
    assert_eq!(c.decode(Some(&c.encode(&destination))), destination);
}

#[test]
fn path_destination_round_trips() {
    let destination = IntendedDestination::Path { path: "/raw/x".to_owned() };
    let c = carrier();
    assert_eq!(c.encode(&destination), r#"{"path":"/raw/x"}"#);
    assert_eq!(c.decode(Some(&c.encode(&destination))), destination);
}

#[test]
fn params_default_to_empty() {
    assert_eq!(
        carrier().decode(Some(r#"{"name":"groups"}"#)),
        IntendedDestination::named("groups", Params::new())
    );
}

#[test]
fn missing_payload_decodes_to_fallback() {
    let c = carrier();
    assert_eq!(c.decode(None), *c.fallback());
    assert_eq!(c.decode(Some("   ")), *c.fallback());
}

#[test]
fn malformed_payload_decodes_to_fallback() {
    let c = carrier();
    assert_eq!(c.decode(Some("{not json")), *c.fallback());
    assert_eq!(c.decode(Some(r#"{"params":{}}"#)), *c.fallback());
    assert_eq!(c.decode(Some("42")), *c.fallback());
    assert!(c.try_decode("42").is_err());
}

// =============================================================
// from_match
// =============================================================

#[test]
fn from_match_uses_name_and_params() {
    let matched = table().resolve("/accounts/9").unwrap();
    assert_eq!(IntendedDestination::from_match(&matched), IntendedDestination::named("account", id_params("9")));
}

#[test]
fn from_match_without_name_uses_path() {
    let matched = table().resolve("/raw/abc").unwrap();
    assert_eq!(
        IntendedDestination::from_match(&matched),
        IntendedDestination::Path { path: "/raw/abc".to_owned() }
    );
}

// =============================================================
// resume_href
// =============================================================

#[test]
fn resume_to_named_destination() {
    let href = carrier().resume_href(&table(), Some(r#"{"name":"account","params":{"id":"5"}}"#));
    assert_eq!(href, "/accounts/5");
}

#[test]
fn resume_without_payload_goes_home() {
    assert_eq!(carrier().resume_href(&table(), None), "/");
}

#[test]
fn resume_to_unknown_route_goes_home() {
    assert_eq!(carrier().resume_href(&table(), Some(r#"{"name":"ghost","params":{}}"#)), "/");
}

#[test]
fn resume_rejects_foreign_paths() {
    let t = table();
    let c = carrier();
    assert_eq!(c.resume_href(&t, Some(r#"{"path":"//evil.example/accounts"}"#)), "/");
    assert_eq!(c.resume_href(&t, Some(r#"{"path":"https://evil.example/"}"#)), "/");
    assert_eq!(c.resume_href(&t, Some(r#"{"path":"/raw/ok"}"#)), "/raw/ok");
}

#[test]
fn resume_with_unresolvable_fallback_uses_root() {
    let c = IntentCarrier::new(IntendedDestination::named("missing", Params::new()));
    assert_eq!(c.resume_href(&table(), None), "/");
}
