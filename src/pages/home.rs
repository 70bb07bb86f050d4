//! Public landing page.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::router::Params;
use crate::router::routes::{ACCOUNTS, GROUPS, TRANSACTIONS};
use crate::util::auth::AppGate;

#[component]
pub fn HomePage() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let href = move |name: &str| gate.table().href_for(name, &Params::new()).unwrap_or_else(|_| "/".to_owned());

    view! {
        <section class="home-page">
            <h1>"NFC Cash"</h1>
            <p>"Member balances, groups and bookings of the NFC cash ledger."</p>
            <ul class="home-page__links">
                <li><A href=href(ACCOUNTS)>"Accounts"</A></li>
                <li><A href=href(GROUPS)>"Groups"</A></li>
                <li><A href=href(TRANSACTIONS)>"Transactions"</A></li>
            </ul>
        </section>
    }
}
