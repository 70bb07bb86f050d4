//! Application configuration.
//!
//! The browser has no process environment, so overrides are baked in at build
//! time through `option_env!`. Everything has a default that works when the
//! UI is served from the same origin as the ledger gateway.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::ConfigError;

pub const DEFAULT_SESSION_KEY: &str = "nfc_cash_session";
pub const DEFAULT_LOGIN_ROUTE: &str = "login";
pub const DEFAULT_INTENT_PARAM: &str = "to";
pub const DEFAULT_ROUTE: &str = "home";

pub const API_BASE_URL_KEY: &str = "NFC_CASH_API_BASE_URL";
pub const SESSION_KEY_KEY: &str = "NFC_CASH_SESSION_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix for ledger REST calls; empty means same origin.
    pub api_base_url: String,
    /// `localStorage` key holding the session token.
    pub session_key: String,
    /// Route name of the login view.
    pub login_route: String,
    /// Login query parameter carrying the intended destination.
    pub intent_param: String,
    /// Route name used after login when no intent survives.
    pub default_route: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            session_key: DEFAULT_SESSION_KEY.to_owned(),
            login_route: DEFAULT_LOGIN_ROUTE.to_owned(),
            intent_param: DEFAULT_INTENT_PARAM.to_owned(),
            default_route: DEFAULT_ROUTE.to_owned(),
        }
    }
}

impl AppConfig {
    /// Build config from values captured at compile time.
    ///
    /// Optional:
    /// - `NFC_CASH_API_BASE_URL`: default same origin
    /// - `NFC_CASH_SESSION_KEY`: default `nfc_cash_session`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a captured value is empty or malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match key {
            API_BASE_URL_KEY => option_env!("NFC_CASH_API_BASE_URL").map(str::to_owned),
            SESSION_KEY_KEY => option_env!("NFC_CASH_SESSION_KEY").map(str::to_owned),
            _ => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value is empty or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(API_BASE_URL_KEY) {
            config.api_base_url = parse_base_url(&raw)?;
        }
        if let Some(raw) = lookup(SESSION_KEY_KEY) {
            let key = raw.trim();
            if key.is_empty() {
                return Err(ConfigError::Empty { key: SESSION_KEY_KEY });
            }
            key.clone_into(&mut config.session_key);
        }
        Ok(config)
    }

    /// Join the base URL with an API path such as `/v1/accounts`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        return Ok(trimmed.to_owned());
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.to_owned());
    }
    Err(ConfigError::Invalid { key: API_BASE_URL_KEY, reason: format!("expected a path or http(s) URL, got {trimmed}") })
}
