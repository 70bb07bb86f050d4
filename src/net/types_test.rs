use super::*;
use serde_json::json;

fn group(can_overdraw: bool) -> Group {
    Group { id: 1, name: "Staff".to_owned(), description: None, can_overdraw }
}

// =============================================================
// Group / Account
// =============================================================

#[test]
fn group_permits_negative_balance_only_when_overdraw_allowed() {
    assert!(group(true).permits_balance(-10.0));
    assert!(!group(false).permits_balance(-0.01));
    assert!(group(false).permits_balance(0.0));
}

#[test]
fn group_accepts_camel_and_snake_overdraw_flag() {
    let camel: Group = serde_json::from_value(json!({"id": 2, "name": "A", "canOverdraw": true})).unwrap();
    let snake: Group = serde_json::from_value(json!({"id": 2, "name": "A", "can_overdraw": true})).unwrap();
    assert!(camel.can_overdraw);
    assert!(snake.can_overdraw);
}

#[test]
fn account_without_group_or_zero_group_has_none() {
    let missing: Account = serde_json::from_value(json!({"id": 3, "name": "Bob", "saldo": 1.5})).unwrap();
    let zeroed: Account =
        serde_json::from_value(json!({"id": 3, "name": "Bob", "group": {"id": 0, "name": ""}})).unwrap();
    assert_eq!(missing.group, None);
    assert_eq!(zeroed.group, None);
}

#[test]
fn account_decodes_nested_group_and_chip_id() {
    let account: Account = serde_json::from_value(json!({
        "id": 3,
        "name": "Bob",
        "saldo": -2.0,
        "nfcChipId": "04:A2",
        "group": {"id": 7, "name": "Guests", "canOverdraw": false}
    }))
    .unwrap();
    assert_eq!(account.nfc_chip_id, "04:A2");
    assert_eq!(account.group.as_ref().map(|g| g.id), Some(7));
    assert!(account.is_overdrawn());
}

#[test]
fn account_update_nests_group_and_omits_saldo() {
    let account = Account {
        id: 9,
        name: "Eve".to_owned(),
        description: None,
        saldo: 12.0,
        nfc_chip_id: "x".to_owned(),
        group: Some(group(false)),
    };
    let body = serde_json::to_value(AccountUpdate::from(&account)).unwrap();
    assert_eq!(body, json!({"id": 9, "name": "Eve", "nfc_chip_id": "x", "group": {"id": 1}}));
}

// =============================================================
// Transaction
// =============================================================

#[test]
fn transaction_decodes_with_partial_account() {
    let tx: Transaction = serde_json::from_value(json!({
        "id": 1,
        "oldSaldo": 10.0,
        "newSaldo": 7.5,
        "amount": -2.5,
        "created": "2024-03-01T12:30:00Z",
        "account": {"id": 3}
    }))
    .unwrap();
    assert_eq!(tx.account.id, 3);
    assert!(tx.account.name.is_empty());
    assert!(tx.is_consistent());
}

#[test]
fn transaction_consistency_tolerates_float_noise_only() {
    let mut tx = Transaction {
        id: 1,
        old_saldo: 0.1,
        new_saldo: 0.3,
        amount: 0.2,
        created: Utc::now(),
        account: serde_json::from_value(json!({"id": 1})).unwrap(),
    };
    assert!(tx.is_consistent());
    tx.new_saldo = 0.31;
    assert!(!tx.is_consistent());
}

// =============================================================
// Lists
// =============================================================

#[test]
fn account_list_becomes_page() {
    let list: AccountList =
        serde_json::from_value(json!({"accounts": [{"id": 1, "name": "A"}], "totalCount": 40})).unwrap();
    let page = Page::from(list);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 40);
}

#[test]
fn empty_list_body_is_empty_page() {
    let list: GroupList = serde_json::from_value(json!({})).unwrap();
    assert_eq!(Page::from(list), Page::default());
}

// =============================================================
// Authentication
// =============================================================

#[test]
fn epoch_seconds_normalizes_units() {
    assert_eq!(epoch_seconds(1_700_000_000), 1_700_000_000);
    assert_eq!(epoch_seconds(1_700_000_000_123), 1_700_000_000);
    assert_eq!(epoch_seconds(1_700_000_000_123_456_789), 1_700_000_000);
}

#[test]
fn authenticate_response_accepts_string_expiry_in_nanos() {
    let response: AuthenticateResponse = serde_json::from_value(json!({
        "token_type": "Bearer",
        "access_token": "abc",
        "expires_in": "1700000000000000000"
    }))
    .unwrap();
    let token = response.into_session_token();
    assert_eq!(token.access_token, "abc");
    assert_eq!(token.expires_in, 1_700_000_000);
    assert_eq!(token.token_type.as_deref(), Some("Bearer"));
}

#[test]
fn authenticate_response_rejects_non_numeric_expiry() {
    let result = serde_json::from_value::<AuthenticateResponse>(json!({"access_token": "abc", "expires_in": "soon"}));
    assert!(result.is_err());
}
