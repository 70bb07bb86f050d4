//! Group list with name search.

use std::sync::Arc;

use leptos::prelude::*;

use crate::components::search_field::SearchField;
use crate::config::AppConfig;
use crate::net::api::{self, Paging};
use crate::net::types::{Group, Page};
use crate::util::auth::{AppGate, api_error_message, require_token};
use crate::util::search::search_by_name;

async fn load_groups(gate: Arc<AppGate>, config: AppConfig) -> Result<Page<Group>, String> {
    let token = require_token(&gate).map_err(|e| api_error_message(&gate, &e))?;
    api::fetch_groups(&config, &token, Paging::default()).await.map_err(|e| api_error_message(&gate, &e))
}

#[component]
pub fn GroupsPage() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();
    let term = RwSignal::new(String::new());
    let groups = LocalResource::new(move || load_groups(gate.clone(), config.clone()));

    let rows = move |loaded: Page<Group>| {
        let term = term.get();
        search_by_name(&loaded.items, &term)
            .into_iter()
            .map(|group| {
                view! {
                    <tr>
                        <td>{group.name.clone()}</td>
                        <td>{group.description.clone().unwrap_or_default()}</td>
                        <td>{if group.can_overdraw { "Yes" } else { "No" }}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <section class="groups-page">
            <h1>"Groups"</h1>
            <SearchField term=term/>
            <Suspense fallback=|| view! { <p class="route-status">"Loading groups..."</p> }>
                {move || {
                    groups.get().map(|result| match result {
                        Ok(loaded) => view! {
                            <table class="ledger-table">
                                <thead>
                                    <tr><th>"Name"</th><th>"Description"</th><th>"May overdraw"</th></tr>
                                </thead>
                                <tbody>{rows(loaded)}</tbody>
                            </table>
                        }.into_any(),
                        Err(message) => view! { <p class="error">{message}</p> }.into_any(),
                    })
                }}
            </Suspense>
        </section>
    }
}
