//! # nfc-cash-ui
//!
//! Leptos + WASM front-end for the NFC cash ledger: member accounts, groups
//! and transactions behind a session-gated router.
//!
//! `router` and `session` hold the navigation authorization gate and are
//! independent of the DOM; `pages` and `components` render the ledger views;
//! `net` talks to the ledger's REST gateway.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod router;
pub mod session;
pub mod util;

/// Browser entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("nfc-cash-ui starting");
    leptos::mount::hydrate_body(app::App);
}
