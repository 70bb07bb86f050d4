//! Root application component with the navigation gate and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Config, route table, session store and gate are built once here and
//! shared through context. `leptos_router` only supplies the location and
//! history; route matching and authorization live in `crate::router`.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::Router;

use crate::components::{nav_bar::NavBar, route_outlet::RouteOutlet};
use crate::config::AppConfig;
use crate::error::RouteError;
use crate::router::NavigationGate;
use crate::router::routes::ledger_table;
use crate::session::{BrowserSlot, SessionStore, SystemClock};
use crate::util::auth::AppGate;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Gate over the ledger routes, persisting the session under `config.session_key`.
///
/// # Errors
///
/// Returns [`RouteError`] if the route declaration or the configured login
/// route is invalid.
pub fn build_gate(config: &AppConfig) -> Result<AppGate, RouteError> {
    let table = Arc::new(ledger_table()?);
    let store = SessionStore::new(BrowserSlot::new(config.session_key.clone()));
    NavigationGate::new(table, store, SystemClock, config)
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_build_env().unwrap_or_else(|e| {
        leptos::logging::warn!("{e}; using default config");
        AppConfig::default()
    });
    let gate = match build_gate(&config) {
        Ok(gate) => Arc::new(gate),
        Err(e) => {
            leptos::logging::error!("navigation unavailable: {e}");
            return view! { <p class="route-status route-status--error">"Navigation is misconfigured."</p> }
                .into_any();
        }
    };
    provide_context(gate);
    provide_context(config);

    view! {
        <Stylesheet id="leptos" href="/pkg/nfc-cash-ui.css"/>
        <Title text="NFC Cash"/>

        <Router>
            <NavBar/>
            <main class="app-main">
                <RouteOutlet/>
            </main>
        </Router>
    }
    .into_any()
}
