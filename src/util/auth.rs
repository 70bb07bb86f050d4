//! Route gating glue between the router location and the navigation gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! The route outlet evaluates every location change through
//! [`gate_action`]; [`install_route_gate`] applies redirects. Route components
//! never check the session themselves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::error::ApiError;
use crate::net::api::describe_error;
use crate::router::{Attempt, Decision, NavigationGate, NavigationTarget, RouteMatch};
use crate::session::{BrowserSlot, Clock, SessionSlot, SessionToken, SystemClock, Validity};

/// Gate wired to `localStorage` and the wall clock.
pub type AppGate = NavigationGate<BrowserSlot, SystemClock>;

/// What the outlet should do with the current location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateAction {
    Render(RouteMatch),
    Redirect { href: String, clear_session: bool },
    NotFound,
}

/// Router location pieces joined back into one href.
pub fn current_href(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}

/// Stored tokens that can never pass again are dropped on redirect.
pub fn should_clear_session(cause: Validity) -> bool {
    matches!(cause, Validity::Expired | Validity::Malformed)
}

/// Evaluate `href` without side effects.
pub fn gate_action<S: SessionSlot, C: Clock>(gate: &NavigationGate<S, C>, href: &str) -> GateAction {
    match gate.evaluate(&NavigationTarget::path(href)) {
        Ok(Decision::Admitted(matched)) => GateAction::Render(matched),
        Ok(Decision::Redirected(redirect)) => {
            GateAction::Redirect { href: redirect.href(), clear_session: should_clear_session(redirect.cause) }
        }
        Err(_) => GateAction::NotFound,
    }
}

/// Navigate to the login route whenever the current attempt is redirected.
///
/// Only the latest attempt is applied; a stale redirect is dropped.
pub fn install_route_gate<S, C, F>(gate: Arc<NavigationGate<S, C>>, action: Memo<(Attempt, GateAction)>, navigate: F)
where
    S: SessionSlot + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let (attempt, action) = action.get();
        let GateAction::Redirect { href, clear_session } = action else {
            return;
        };
        if !gate.attempts().is_current(attempt) {
            return;
        }
        if clear_session {
            gate.store().clear();
        }
        navigate(&href, NavigateOptions { replace: true, ..NavigateOptions::default() });
    });
}

/// Token for an API call, if the stored session is still usable.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] when the session is missing, expired, or malformed.
pub fn require_token<S: SessionSlot, C: Clock>(gate: &NavigationGate<S, C>) -> Result<SessionToken, ApiError> {
    if !gate.session_validity().is_valid() {
        return Err(ApiError::Unauthenticated);
    }
    gate.store().get().ok_or(ApiError::Unauthenticated)
}

/// User-facing text for a failed call. A rejected token is dropped so the
/// next navigation goes through login.
pub fn api_error_message<S: SessionSlot, C: Clock>(gate: &NavigationGate<S, C>, error: &ApiError) -> String {
    if matches!(error, ApiError::Unauthenticated) {
        leptos::logging::log!("ledger rejected the session; clearing it");
        gate.store().clear();
    }
    describe_error(error)
}
