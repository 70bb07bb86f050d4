//! Navigation authorization gate.
//!
//! ARCHITECTURE
//! ============
//! Every navigation attempt is evaluated exactly once:
//!
//! ```text
//! target ──resolve──▶ RouteMatch ──needs_auth?──no──▶ Admitted
//!                                      │yes
//!                                      ▼
//!                        TokenValidator(SessionStore)
//!                           │valid          │missing / expired / malformed
//!                           ▼               ▼
//!                        Admitted      Redirected(login + intent)
//! ```
//!
//! The decision reads route metadata and the session slot only. It never
//! awaits view loading and never writes to the store; clearing an expired
//! token is left to the caller.
//!
//! TRADE-OFFS
//! ==========
//! Validity is checked at entry. A token that expires while a view is open is
//! not noticed until the next navigation.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::intent::{IntendedDestination, IntentCarrier};
use super::location::build_href;
use super::table::{Params, RouteMatch, RouteTable};
use crate::config::AppConfig;
use crate::error::RouteError;
use crate::session::{Clock, SessionSlot, SessionStore, TokenValidator, Validity};

/// What the user asked to navigate to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Concrete href; query and fragment are ignored for matching.
    Path(String),
    Named { name: String, params: Params },
}

impl NavigationTarget {
    pub fn path(path: impl Into<String>) -> Self {
        NavigationTarget::Path(path.into())
    }

    pub fn named(name: impl Into<String>, params: Params) -> Self {
        NavigationTarget::Named { name: name.into(), params }
    }
}

/// Redirect to the login route carrying the denied destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Path of the login route.
    pub path: String,
    /// Query parameter the payload travels in.
    pub param: String,
    pub intent: IntendedDestination,
    /// Encoded `intent`, as placed in the query string.
    pub payload: String,
    /// Why the session was rejected.
    pub cause: Validity,
}

impl Redirect {
    /// Href with the percent-encoded payload, e.g. `/login?to=%7B...%7D`.
    pub fn href(&self) -> String {
        if self.payload.is_empty() {
            return self.path.clone();
        }
        build_href(&self.path, &[(self.param.clone(), self.payload.clone())])
    }
}

/// Outcome of one evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Admitted(RouteMatch),
    Redirected(Redirect),
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted(_))
    }
}

/// Decides whether navigation targets may be entered.
#[derive(Debug)]
pub struct NavigationGate<S, C> {
    table: Arc<RouteTable>,
    store: SessionStore<S>,
    validator: TokenValidator<C>,
    carrier: IntentCarrier,
    login_path: String,
    intent_param: String,
    attempts: AttemptTracker,
}

impl<S: SessionSlot, C: Clock> NavigationGate<S, C> {
    /// # Errors
    ///
    /// Returns [`RouteError`] when the configured login route is missing, needs
    /// params, or is itself guarded (which would redirect forever).
    pub fn new(table: Arc<RouteTable>, store: SessionStore<S>, clock: C, config: &AppConfig) -> Result<Self, RouteError> {
        let login_path = table.href_for(&config.login_route, &Params::new())?;
        let login = table.resolve(&login_path)?;
        if login.needs_auth {
            return Err(RouteError::InvalidDeclaration(format!(
                "login route {} must not require authorization",
                config.login_route
            )));
        }
        let carrier = IntentCarrier::new(IntendedDestination::named(config.default_route.clone(), Params::new()));
        Ok(Self {
            table,
            store,
            validator: TokenValidator::new(clock),
            carrier,
            login_path,
            intent_param: config.intent_param.clone(),
            attempts: AttemptTracker::default(),
        })
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn carrier(&self) -> &IntentCarrier {
        &self.carrier
    }

    pub fn attempts(&self) -> &AttemptTracker {
        &self.attempts
    }

    pub fn intent_param(&self) -> &str {
        &self.intent_param
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Current session validity, independent of any route.
    pub fn session_validity(&self) -> Validity {
        self.validator.check(&self.store.load())
    }

    /// Evaluate one navigation attempt.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the target does not resolve. Session
    /// problems are never errors; they produce [`Decision::Redirected`].
    pub fn evaluate(&self, target: &NavigationTarget) -> Result<Decision, RouteError> {
        let matched = match target {
            NavigationTarget::Path(path) => self.table.resolve(path),
            NavigationTarget::Named { name, params } => self.table.resolve_named(name, params),
        }
        .inspect_err(|e| leptos::logging::warn!("navigation rejected: {e}"))?;

        if !matched.needs_auth {
            return Ok(Decision::Admitted(matched));
        }

        let validity = self.session_validity();
        if validity.is_valid() {
            return Ok(Decision::Admitted(matched));
        }

        let intent = IntendedDestination::from_match(&matched);
        let payload = self.carrier.encode(&intent);
        leptos::logging::log!(
            "session {} for guarded route {}; redirecting to {}",
            validity.as_str(),
            matched.path,
            self.login_path
        );
        Ok(Decision::Redirected(Redirect {
            path: self.login_path.clone(),
            param: self.intent_param.clone(),
            intent,
            payload,
            cause: validity,
        }))
    }

    /// Where to go after a successful login, given the raw intent payload.
    pub fn resume_href(&self, raw: Option<&str>) -> String {
        self.carrier.resume_href(&self.table, raw)
    }
}

/// Ticket for one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attempt(u64);

/// Latest-intent-wins bookkeeping for overlapping navigations.
///
/// Each attempt takes a ticket; work finishing for an older ticket (a slow
/// view load, a pending redirect) is dropped instead of applied.
#[derive(Debug, Default)]
pub struct AttemptTracker {
    latest: AtomicU64,
}

impl AttemptTracker {
    pub fn begin(&self) -> Attempt {
        Attempt(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_current(&self, attempt: Attempt) -> bool {
        self.latest.load(Ordering::Relaxed) == attempt.0
    }
}
