//! Login page exchanging username and password for a session token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gate sends denied navigations here with the intended destination in
//! the query string. After a successful sign-in the token is stored and the
//! user is taken to that destination, or to the default route when the
//! payload is missing or unusable.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::sync::Arc;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::net::api::describe_error;
use crate::router::{Location, NavigationGate};
use crate::session::{Clock, SessionSlot};
use crate::util::auth::{AppGate, current_href};

/// Trimmed username and raw password, or the message to show.
fn validate_credentials(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Href to continue to once signed in, read from the login page's own href.
fn resume_target<S: SessionSlot, C: Clock>(gate: &NavigationGate<S, C>, href: &str) -> String {
    let location = Location::parse(href);
    gate.resume_href(location.query_value(gate.intent_param()))
}

fn login_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthenticated => "Wrong username or password.".to_owned(),
        other => format!("Sign-in failed: {}", describe_error(other)),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();
    let location = use_location();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (user, pass) = match validate_credentials(&username.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        let href = current_href(&location.pathname.get_untracked(), &location.search.get_untracked());
        let target = resume_target(&gate, &href);
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let gate = gate.clone();
            let config = config.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::authenticate(&config, &user, &pass).await {
                    Ok(token) => {
                        gate.store().set(&token);
                        password.set(String::new());
                        info.set(String::new());
                        busy.set(false);
                        leptos::logging::log!("signed in; continuing to {target}");
                        navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
                    }
                    Err(e) => {
                        info.set(login_error_message(&e));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (user, pass, target, &config, &navigate);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"NFC Cash"</h1>
                <p class="login-card__subtitle">"Sign in to manage the ledger"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
