//! Intended-destination payload carried through the login redirect.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gate encodes the denied target into the login query string; the login
//! view decodes it after a successful sign-in and navigates there. Decoding
//! never fails the login: anything unusable falls back to the default route.

#[cfg(test)]
#[path = "intent_test.rs"]
mod intent_test;

use serde::{Deserialize, Serialize};

use super::table::{Params, RouteMatch, RouteTable};

/// Where the user was headed before being sent to log in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntendedDestination {
    /// Serialized as `{"name": ..., "params": {...}}`.
    Named {
        name: String,
        #[serde(default)]
        params: Params,
    },
    /// Fallback for targets whose node has no name.
    Path { path: String },
}

impl IntendedDestination {
    pub fn named(name: impl Into<String>, params: Params) -> Self {
        IntendedDestination::Named { name: name.into(), params }
    }

    pub fn from_match(matched: &RouteMatch) -> Self {
        match &matched.name {
            Some(name) => Self::named(name.clone(), matched.params.clone()),
            None => IntendedDestination::Path { path: matched.path.clone() },
        }
    }

    /// Concrete in-app path, if the destination still resolves.
    pub fn href(&self, table: &RouteTable) -> Option<String> {
        match self {
            IntendedDestination::Named { name, params } => table.href_for(name, params).ok(),
            IntendedDestination::Path { path } if is_local_path(path) => {
                table.resolve(path).ok().map(|_| path.clone())
            }
            IntendedDestination::Path { .. } => None,
        }
    }
}

/// Encodes and decodes [`IntendedDestination`] payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentCarrier {
    fallback: IntendedDestination,
}

impl IntentCarrier {
    pub fn new(fallback: IntendedDestination) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> &IntendedDestination {
        &self.fallback
    }

    /// JSON payload for the redirect query parameter.
    pub fn encode(&self, destination: &IntendedDestination) -> String {
        serde_json::to_string(destination).unwrap_or_else(|e| {
            leptos::logging::warn!("intent not encodable, login will use the default route: {e}");
            String::new()
        })
    }

    /// Strict decode of a payload.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `raw` is not a destination object.
    pub fn try_decode(&self, raw: &str) -> Result<IntendedDestination, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Lenient decode: missing or malformed payloads yield the fallback.
    pub fn decode(&self, raw: Option<&str>) -> IntendedDestination {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return self.fallback.clone();
        };
        match self.try_decode(raw) {
            Ok(destination) => destination,
            Err(e) => {
                leptos::logging::warn!("discarding malformed login intent: {e}");
                self.fallback.clone()
            }
        }
    }

    /// Path to navigate to after login. Destinations that no longer resolve
    /// fall back to the default; an unresolvable default falls back to `/`.
    pub fn resume_href(&self, table: &RouteTable, raw: Option<&str>) -> String {
        self.decode(raw)
            .href(table)
            .or_else(|| self.fallback.href(table))
            .unwrap_or_else(|| "/".to_owned())
    }
}

/// Same-origin absolute path; rejects `//host` and scheme-qualified URLs.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains("://")
}
