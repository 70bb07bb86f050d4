//! Top navigation with the ledger sections and sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! Section links are plain hrefs built from route names; the outlet gates
//! them like any other navigation. Sign-out clears the store first and tells
//! the ledger afterwards, so a failed logout call never leaves a usable token.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::{use_location, use_navigate};

use crate::config::AppConfig;
use crate::router::Params;
use crate::router::routes::{ACCOUNTS, GROUPS, HOME, LOGIN, TRANSACTIONS};
use crate::util::auth::AppGate;

#[component]
pub fn NavBar() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();
    let location = use_location();
    let navigate = use_navigate();

    let href = {
        let gate = gate.clone();
        move |name: &str| gate.table().href_for(name, &Params::new()).unwrap_or_else(|_| "/".to_owned())
    };

    // Re-read on every navigation and sign-out; the store itself is not reactive.
    let signed_out_count = RwSignal::new(0_u32);
    let signed_in = {
        let gate = gate.clone();
        move || {
            location.pathname.track();
            signed_out_count.track();
            gate.session_validity().is_valid()
        }
    };

    let home_href = href(HOME);
    let on_logout = move |_| {
        let token = gate.store().get();
        gate.store().clear();
        signed_out_count.update(|n| *n += 1);
        leptos::logging::log!("signed out");
        if let Some(token) = token {
            let config = config.clone();
            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                crate::net::api::logout(&config, &token).await;
            });
            #[cfg(not(feature = "hydrate"))]
            let _ = (config, token);
        }
        navigate(&home_href, NavigateOptions::default());
    };

    let signed_out = signed_in.clone();
    view! {
        <nav class="nav-bar">
            <A href=href(HOME)>"NFC Cash"</A>
            <A href=href(ACCOUNTS)>"Accounts"</A>
            <A href=href(GROUPS)>"Groups"</A>
            <A href=href(TRANSACTIONS)>"Transactions"</A>
            <span class="nav-bar__spacer"></span>
            <span class="nav-bar__login" hidden=signed_in>
                <A href=href(LOGIN)>"Sign in"</A>
            </span>
            <button class="nav-bar__logout" hidden=move || !signed_out() on:click=on_logout>
                "Sign out"
            </button>
        </nav>
    }
}
