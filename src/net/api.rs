//! REST calls against the ledger gateway.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: every call returns
//! [`ApiError::Unavailable`] since the session lives in the browser.
//!
//! ERROR HANDLING
//! ==============
//! All calls return `Result<_, ApiError>`; views render the error text
//! instead of panicking. A 401 maps to [`ApiError::Unauthenticated`] so the
//! caller can drop the stored session.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{Account, AccountUpdate, Group, NewTransaction, Page, Transaction};
use crate::config::AppConfig;
use crate::error::ApiError;
#[cfg(any(test, feature = "hydrate"))]
use crate::router::location::build_href;
use crate::session::SessionToken;

#[cfg(feature = "hydrate")]
use super::types::{AccountList, AuthenticateResponse, GroupList, TransactionList};

/// `limit`/`offset` window for list endpoints. A zero limit lets the server pick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: u32,
    pub offset: u32,
}

impl Paging {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Window for the zero-based `page` of size `limit`.
    pub fn page(limit: u32, page: u32) -> Self {
        Self { limit, offset: limit.saturating_mul(page) }
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn query(self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if self.limit > 0 {
            pairs.push(("paging.limit".to_owned(), self.limit.to_string()));
        }
        if self.offset > 0 {
            pairs.push(("paging.offset".to_owned(), self.offset.to_string()));
        }
        pairs
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn login_endpoint(config: &AppConfig) -> String {
    config.api_url("/v1/user/login")
}

#[cfg(any(test, feature = "hydrate"))]
fn logout_endpoint(config: &AppConfig) -> String {
    config.api_url("/v1/user/logout")
}

#[cfg(any(test, feature = "hydrate"))]
fn accounts_endpoint(config: &AppConfig, paging: Paging, group_id: Option<i32>) -> String {
    let mut query = paging.query();
    if let Some(id) = group_id {
        query.push(("group_id".to_owned(), id.to_string()));
    }
    build_href(&config.api_url("/v1/accounts"), &query)
}

#[cfg(any(test, feature = "hydrate"))]
fn account_endpoint(config: &AppConfig, id: i32) -> String {
    config.api_url(&format!("/v1/account/{id}"))
}

#[cfg(any(test, feature = "hydrate"))]
fn groups_endpoint(config: &AppConfig, paging: Paging) -> String {
    build_href(&config.api_url("/v1/groups"), &paging.query())
}

#[cfg(any(test, feature = "hydrate"))]
fn transactions_endpoint(config: &AppConfig, paging: Paging) -> String {
    build_href(&config.api_url("/v1/transactions"), &paging.query())
}

#[cfg(any(test, feature = "hydrate"))]
fn account_transactions_endpoint(config: &AppConfig, account_id: i32, paging: Paging) -> String {
    build_href(&config.api_url(&format!("/v1/account/{account_id}/transactions")), &paging.query())
}

/// `Authorization` value for the login exchange.
#[cfg(any(test, feature = "hydrate"))]
fn basic_auth_header(username: &str, password: &str) -> String {
    use base64::Engine as _;
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

#[cfg(any(test, feature = "hydrate"))]
fn status_error(operation: &'static str, status: u16) -> ApiError {
    if status == 401 {
        ApiError::Unauthenticated
    } else {
        ApiError::Status { operation, status }
    }
}

/// Text shown to the user for a failed call.
pub fn describe_error(error: &ApiError) -> String {
    match error {
        ApiError::Unauthenticated => "Your session has ended. Please sign in again.".to_owned(),
        ApiError::Status { status: 403, .. } => "You are not allowed to do that.".to_owned(),
        ApiError::Status { status: 404, .. } => "Not found.".to_owned(),
        other => other.to_string(),
    }
}

#[cfg(feature = "hydrate")]
async fn get_json<T>(url: &str, token: &SessionToken, operation: &'static str) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let resp = gloo_net::http::Request::get(url)
        .header("Authorization", &token.bearer())
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    if !resp.ok() {
        leptos::logging::warn!("{operation} returned {}", resp.status());
        return Err(status_error(operation, resp.status()));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(feature = "hydrate")]
async fn send_json<B, T>(
    method: gloo_net::http::Method,
    url: &str,
    token: &SessionToken,
    body: &B,
    operation: &'static str,
) -> Result<T, ApiError>
where
    B: serde::Serialize,
    T: serde::de::DeserializeOwned,
{
    let resp = gloo_net::http::RequestBuilder::new(url)
        .method(method)
        .header("Authorization", &token.bearer())
        .json(body)
        .map_err(|e| ApiError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    if !resp.ok() {
        leptos::logging::warn!("{operation} returned {}", resp.status());
        return Err(status_error(operation, resp.status()));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// Exchange credentials for a session token via `GET /v1/user/login`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] on rejected credentials, or a
/// transport/decode error.
pub async fn authenticate(config: &AppConfig, username: &str, password: &str) -> Result<SessionToken, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&login_endpoint(config))
            .header("Authorization", &basic_auth_header(username, password))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !resp.ok() {
            return Err(status_error("login", resp.status()));
        }
        let body: AuthenticateResponse = resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.into_session_token())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, username, password);
        Err(ApiError::Unavailable)
    }
}

/// Tell the gateway the session is over. Best effort; local state is cleared
/// by the caller regardless.
pub async fn logout(config: &AppConfig, token: &SessionToken) {
    #[cfg(feature = "hydrate")]
    {
        let _ = gloo_net::http::Request::post(&logout_endpoint(config))
            .header("Authorization", &token.bearer())
            .send()
            .await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token);
    }
}

/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn fetch_accounts(
    config: &AppConfig,
    token: &SessionToken,
    paging: Paging,
    group_id: Option<i32>,
) -> Result<Page<Account>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = accounts_endpoint(config, paging, group_id);
        get_json::<AccountList>(&url, token, "list accounts").await.map(Page::from)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, paging, group_id);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn fetch_account(config: &AppConfig, token: &SessionToken, id: i32) -> Result<Account, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        get_json(&account_endpoint(config, id), token, "get account").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, id);
        Err(ApiError::Unavailable)
    }
}

/// Save name, description, chip id and group of an account.
///
/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn update_account(config: &AppConfig, token: &SessionToken, update: &AccountUpdate) -> Result<Account, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = account_endpoint(config, update.id);
        send_json(gloo_net::http::Method::PUT, &url, token, update, "update account").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, update);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn fetch_groups(config: &AppConfig, token: &SessionToken, paging: Paging) -> Result<Page<Group>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        get_json::<GroupList>(&groups_endpoint(config, paging), token, "list groups").await.map(Page::from)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, paging);
        Err(ApiError::Unavailable)
    }
}

/// Ledger-wide transaction history, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn fetch_transactions(
    config: &AppConfig,
    token: &SessionToken,
    paging: Paging,
) -> Result<Page<Transaction>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = transactions_endpoint(config, paging);
        get_json::<TransactionList>(&url, token, "list transactions").await.map(Page::from)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, paging);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn fetch_account_transactions(
    config: &AppConfig,
    token: &SessionToken,
    account_id: i32,
    paging: Paging,
) -> Result<Page<Transaction>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = account_transactions_endpoint(config, account_id, paging);
        get_json::<TransactionList>(&url, token, "list account transactions").await.map(Page::from)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, account_id, paging);
        Err(ApiError::Unavailable)
    }
}

/// Book `amount` (negative for a purchase) on an account.
///
/// # Errors
///
/// Returns [`ApiError`] on transport, status, or decode failure.
pub async fn create_transaction(
    config: &AppConfig,
    token: &SessionToken,
    transaction: &NewTransaction,
) -> Result<Transaction, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = account_transactions_endpoint(config, transaction.account_id, Paging::default());
        send_json(gloo_net::http::Method::POST, &url, token, transaction, "create transaction").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, token, transaction);
        Err(ApiError::Unavailable)
    }
}
