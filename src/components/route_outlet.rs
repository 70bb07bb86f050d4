//! Gated route outlet.
//!
//! ARCHITECTURE
//! ============
//! ```text
//! location ──▶ Memo(attempt, gate_action) ──Render──▶ LocalResource(load_view) ──▶ page
//!                                          ├─Redirect─▶ install_route_gate (navigate, replace)
//!                                          └─NotFound─▶ "Page not found."
//! ```
//!
//! The gate decision is synchronous; only rendering waits on the view bundle.
//! A resolved bundle is shown only while its attempt is still the latest.

#[cfg(test)]
#[path = "route_outlet_test.rs"]
mod route_outlet_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::pages::{
    account::{AccountEditPage, AccountPage},
    accounts::AccountsPage,
    groups::GroupsPage,
    home::HomePage,
    login::LoginPage,
    transactions::TransactionsPage,
};
use crate::router::{Attempt, Params, RouteMatch, ViewKind};
use crate::util::auth::{AppGate, GateAction, current_href, gate_action, install_route_gate};

/// Numeric `:id` param, whether it came from a path segment or a named intent.
pub fn param_id(params: &Params) -> Option<i32> {
    match params.get("id")? {
        serde_json::Value::String(text) => text.parse().ok(),
        serde_json::Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        _ => None,
    }
}

#[component]
pub fn RouteOutlet() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let location = use_location();

    let gate_eval = gate.clone();
    let action = Memo::new(move |_| {
        let href = current_href(&location.pathname.get(), &location.search.get());
        (gate_eval.attempts().begin(), gate_action(&gate_eval, &href))
    });
    install_route_gate(gate, action, use_navigate());

    move || {
        let (attempt, action) = action.get();
        match action {
            GateAction::Render(matched) => view! { <RoutedView attempt=attempt matched=matched/> }.into_any(),
            GateAction::Redirect { .. } => view! { <p class="route-status">"Redirecting to sign in..."</p> }.into_any(),
            GateAction::NotFound => view! { <p class="route-status">"Page not found."</p> }.into_any(),
        }
    }
}

#[component]
fn RoutedView(attempt: Attempt, matched: RouteMatch) -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let table = gate.table().clone();
    let load_match = matched.clone();
    let bundle = LocalResource::new(move || table.load_view(&load_match));
    let params = matched.params;

    view! {
        <Suspense fallback=|| view! { <p class="route-status">"Loading..."</p> }>
            {move || {
                let loaded = bundle.get()?;
                if !gate.attempts().is_current(attempt) {
                    return None;
                }
                Some(match loaded {
                    Ok(kind) => render_view(kind, &params),
                    Err(e) => {
                        leptos::logging::warn!("{e}");
                        view! { <p class="route-status route-status--error">"This page failed to load."</p> }
                            .into_any()
                    }
                })
            }}
        </Suspense>
    }
}

fn render_view(kind: ViewKind, params: &Params) -> AnyView {
    let id = param_id(params);
    match (kind, id) {
        (ViewKind::Home, _) => view! { <HomePage/> }.into_any(),
        (ViewKind::Login, _) => view! { <LoginPage/> }.into_any(),
        (ViewKind::Accounts, _) => view! { <AccountsPage/> }.into_any(),
        (ViewKind::Account, Some(id)) => view! { <AccountPage id=id/> }.into_any(),
        (ViewKind::AccountEdit, Some(id)) => view! { <AccountEditPage id=id/> }.into_any(),
        (ViewKind::Groups, _) => view! { <GroupsPage/> }.into_any(),
        (ViewKind::Transactions, _) => view! { <TransactionsPage/> }.into_any(),
        (ViewKind::Account | ViewKind::AccountEdit, None) => {
            view! { <p class="route-status">"Page not found."</p> }.into_any()
        }
    }
}
