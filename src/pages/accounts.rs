//! Paged account list with name search.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod accounts_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::search_field::SearchField;
use crate::config::AppConfig;
use crate::net::api::{self, Paging};
use crate::net::types::{Account, Page};
use crate::router::RouteTable;
use crate::router::routes::{ACCOUNT, ACCOUNT_EDIT};
use crate::util::auth::{AppGate, api_error_message, require_token};
use crate::util::format::format_money;
use crate::util::search::search_by_name;

pub const PAGE_SIZE: u32 = 50;

/// Number of pages needed for `total` items; at least one.
pub fn page_count(total: usize, size: u32) -> u32 {
    if size == 0 {
        return 1;
    }
    let pages = total.div_ceil(size as usize).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Href of an account's detail view, or of its edit form.
pub fn account_href(table: &RouteTable, id: i32, edit: bool) -> String {
    let name = if edit { ACCOUNT_EDIT } else { ACCOUNT };
    let params = [("id".to_owned(), serde_json::Value::String(id.to_string()))].into_iter().collect();
    table.href_for(name, &params).unwrap_or_else(|_| "/".to_owned())
}

/// Owned cell values of one list row; the view outlives the loaded page.
#[derive(Clone, Debug, PartialEq, Eq)]
struct AccountRow {
    href: String,
    name: String,
    saldo: String,
    group: String,
    chip: String,
    overdrawn: bool,
}

impl AccountRow {
    fn new(table: &RouteTable, account: &Account) -> Self {
        Self {
            href: account_href(table, account.id, false),
            name: account.name.clone(),
            saldo: format_money(account.saldo).unwrap_or_default(),
            group: account.group.as_ref().map(|g| g.name.clone()).unwrap_or_default(),
            chip: account.nfc_chip_id.clone(),
            overdrawn: account.is_overdrawn(),
        }
    }
}

async fn load_accounts(gate: Arc<AppGate>, config: AppConfig, page: u32) -> Result<Page<Account>, String> {
    let token = require_token(&gate).map_err(|e| api_error_message(&gate, &e))?;
    api::fetch_accounts(&config, &token, Paging::page(PAGE_SIZE, page), None)
        .await
        .map_err(|e| api_error_message(&gate, &e))
}

#[component]
pub fn AccountsPage() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();
    let term = RwSignal::new(String::new());
    let page = RwSignal::new(0_u32);

    let load_gate = gate.clone();
    let accounts = LocalResource::new(move || load_accounts(load_gate.clone(), config.clone(), page.get()));

    let rows = move |loaded: Page<Account>| {
        let term = term.get();
        let table = gate.table();
        search_by_name(&loaded.items, &term)
            .into_iter()
            .map(|account| {
                let AccountRow { href, name, saldo, group, chip, overdrawn } = AccountRow::new(table, account);
                view! {
                    <tr class:account-row--overdrawn=overdrawn>
                        <td><A href=href>{name}</A></td>
                        <td class="money">{saldo}</td>
                        <td>{group}</td>
                        <td>{chip}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    let total_pages = move || {
        accounts.get().and_then(Result::ok).map_or(1, |loaded| page_count(loaded.total, PAGE_SIZE))
    };

    view! {
        <section class="accounts-page">
            <h1>"Accounts"</h1>
            <SearchField term=term/>
            <Suspense fallback=|| view! { <p class="route-status">"Loading accounts..."</p> }>
                {move || {
                    accounts.get().map(|result| match result {
                        Ok(loaded) => view! {
                            <table class="ledger-table">
                                <thead>
                                    <tr><th>"Name"</th><th>"Saldo"</th><th>"Group"</th><th>"NFC chip"</th></tr>
                                </thead>
                                <tbody>{rows(loaded)}</tbody>
                            </table>
                        }.into_any(),
                        Err(message) => view! { <p class="error">{message}</p> }.into_any(),
                    })
                }}
            </Suspense>
            <div class="pager">
                <button disabled=move || page.get() == 0 on:click=move |_| page.update(|p| *p = p.saturating_sub(1))>
                    "Previous"
                </button>
                <span>{move || format!("Page {} of {}", page.get() + 1, total_pages())}</span>
                <button
                    disabled=move || page.get() + 1 >= total_pages()
                    on:click=move |_| page.update(|p| *p += 1)
                >
                    "Next"
                </button>
            </div>
        </section>
    }
}
