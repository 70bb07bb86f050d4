//! Ledger data shapes exchanged with the REST gateway.
//!
//! DESIGN
//! ======
//! The gateway emits camelCase for most fields but some handlers and older
//! builds use proto field names, so multi-word fields accept both spellings.
//! Nested records may arrive partially filled (a transaction's account often
//! only carries its id), hence the generous `#[serde(default)]`s.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::SessionToken;
use crate::util::search::Named;

/// Saldo comparisons tolerate half a cent of float noise.
const SALDO_EPSILON: f64 = 0.005;

/// Members are grouped by affiliation; the group decides whether they may overdraw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "can_overdraw")]
    pub can_overdraw: bool,
}

impl Group {
    /// Whether a member of this group may hold `saldo`.
    pub fn permits_balance(&self, saldo: f64) -> bool {
        self.can_overdraw || saldo >= 0.0
    }
}

impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

/// NFC-tagged member account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub saldo: f64,
    #[serde(default, alias = "nfc_chip_id")]
    pub nfc_chip_id: String,
    /// `None` when the account is in no group; a zero id from the wire also maps here.
    #[serde(default, deserialize_with = "deserialize_group")]
    pub group: Option<Group>,
}

impl Account {
    pub fn is_overdrawn(&self) -> bool {
        self.saldo < 0.0
    }
}

impl Named for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One immutable balance change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    #[serde(alias = "old_saldo")]
    pub old_saldo: f64,
    #[serde(alias = "new_saldo")]
    pub new_saldo: f64,
    pub amount: f64,
    pub created: DateTime<Utc>,
    pub account: Account,
}

impl Transaction {
    /// `new_saldo == old_saldo + amount`, to the cent.
    pub fn is_consistent(&self) -> bool {
        (self.old_saldo + self.amount - self.new_saldo).abs() < SALDO_EPSILON
    }
}

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total: 0 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountList {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default, alias = "total_count")]
    pub total_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupList {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default, alias = "total_count")]
    pub total_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionList {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default, alias = "total_count")]
    pub total_count: usize,
}

impl From<AccountList> for Page<Account> {
    fn from(list: AccountList) -> Self {
        Self { items: list.accounts, total: list.total_count }
    }
}

impl From<GroupList> for Page<Group> {
    fn from(list: GroupList) -> Self {
        Self { items: list.groups, total: list.total_count }
    }
}

impl From<TransactionList> for Page<Transaction> {
    fn from(list: TransactionList) -> Self {
        Self { items: list.transactions, total: list.total_count }
    }
}

/// Editable account fields for `PUT /v1/account/{id}`.
///
/// Saldo is never sent; the ledger service rejects saldo changes outside
/// transactions and treats an absent saldo as unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccountUpdate {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nfc_chip_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRef>,
}

/// Reference to a group by id, as nested in account bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GroupRef {
    pub id: i32,
}

impl From<&Account> for AccountUpdate {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            description: account.description.clone(),
            nfc_chip_id: account.nfc_chip_id.clone(),
            group: account.group.as_ref().map(|g| GroupRef { id: g.id }),
        }
    }
}

/// Body of `POST /v1/account/{id}/transactions`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTransaction {
    pub account_id: i32,
    pub amount: f64,
}

/// Body returned by the login exchange.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(default, alias = "tokenType")]
    pub token_type: Option<String>,
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(alias = "expiresIn", deserialize_with = "deserialize_lenient_i64")]
    pub expires_in: i64,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

impl AuthenticateResponse {
    /// Token to persist, with the expiry normalized to epoch seconds.
    pub fn into_session_token(self) -> SessionToken {
        SessionToken {
            access_token: self.access_token,
            expires_in: epoch_seconds(self.expires_in),
            token_type: self.token_type,
            refresh_token: self.refresh_token,
        }
    }
}

/// Epoch values past year 5138 in seconds are taken as milliseconds, past
/// 10^17 as nanoseconds. The ledger service reports nanoseconds.
pub fn epoch_seconds(raw: i64) -> i64 {
    const MILLIS_THRESHOLD: i64 = 100_000_000_000;
    const NANOS_THRESHOLD: i64 = 100_000_000_000_000_000;
    if raw >= NANOS_THRESHOLD {
        raw / 1_000_000_000
    } else if raw >= MILLIS_THRESHOLD {
        raw / 1_000
    } else {
        raw
    }
}

fn deserialize_group<'de, D>(deserializer: D) -> Result<Option<Group>, D::Error>
where
    D: Deserializer<'de>,
{
    let group = Option::<Group>::deserialize(deserializer)?;
    Ok(group.filter(|g| g.id != 0))
}

/// Accepts numbers and numeric strings (int64 fields are strings in proto JSON).
fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => number.as_i64().ok_or_else(|| D::Error::custom("expected integer")),
        serde_json::Value::String(text) => text.trim().parse::<i64>().map_err(D::Error::custom),
        _ => Err(D::Error::custom("expected integer or numeric string")),
    }
}
