//! Session token shape and local validity checks.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token is minted by the ledger service's login exchange and only read
//! here. Validity is decided locally from its expiry timestamp, without a
//! server round-trip, on every guarded navigation.
//!
//! TRADE-OFFS
//! ==========
//! `expires_in` is compared as an absolute epoch-seconds timestamp even though
//! the name suggests a duration. Changing that would change how long sessions
//! last for existing users.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Credential persisted in the session slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Opaque bearer credential sent to the ledger API.
    pub access_token: String,
    /// Absolute expiry, seconds since the Unix epoch.
    #[serde(deserialize_with = "deserialize_epoch_secs")]
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self { access_token: access_token.into(), expires_in, token_type: None, refresh_token: None }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Result of reading the session slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionRead {
    Absent,
    Present(SessionToken),
    /// Something is stored but it does not deserialize into a token.
    Malformed,
}

impl SessionRead {
    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            SessionRead::Present(token) => Some(token),
            SessionRead::Absent | SessionRead::Malformed => None,
        }
    }
}

/// Why a session is or is not usable right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Missing,
    Expired,
    Malformed,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Validity::Valid => "valid",
            Validity::Missing => "missing",
            Validity::Expired => "expired",
            Validity::Malformed => "malformed",
        }
    }
}

/// Wall-clock source in whole seconds since the Unix epoch.
pub trait Clock {
    fn now_secs(&self) -> i64;
}

/// Real wall clock. Uses `Date.now()` under wasm via chrono's `wasm-bindgen` support.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_secs(&self) -> i64 {
        self.0
    }
}

/// Decides whether a stored token may be used for a guarded navigation.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenValidator<C> {
    clock: C,
}

impl<C: Clock> TokenValidator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// `true` iff a token is present and `expires_in >= now`.
    pub fn is_valid(&self, token: Option<&SessionToken>) -> bool {
        token.is_some_and(|t| !is_expired(t, self.clock.now_secs()))
    }

    pub fn check(&self, read: &SessionRead) -> Validity {
        match read {
            SessionRead::Absent => Validity::Missing,
            SessionRead::Malformed => Validity::Malformed,
            SessionRead::Present(token) if is_expired(token, self.clock.now_secs()) => Validity::Expired,
            SessionRead::Present(_) => Validity::Valid,
        }
    }
}

/// Only strictly past timestamps are expired; `expires_in == now` still admits.
fn is_expired(token: &SessionToken, now: i64) -> bool {
    token.expires_in < now
}

fn deserialize_epoch_secs<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Ok(float.trunc() as i64);
            }
            Err(D::Error::custom("expected epoch seconds"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}
