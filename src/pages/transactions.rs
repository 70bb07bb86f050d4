//! Ledger-wide transaction history, paged.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use super::accounts::{PAGE_SIZE, account_href, page_count};
use crate::config::AppConfig;
use crate::net::api::{self, Paging};
use crate::net::types::{Page, Transaction};
use crate::util::auth::{AppGate, api_error_message, require_token};
use crate::util::format::{format_datetime, format_money};

async fn load_transactions(gate: Arc<AppGate>, config: AppConfig, page: u32) -> Result<Page<Transaction>, String> {
    let token = require_token(&gate).map_err(|e| api_error_message(&gate, &e))?;
    api::fetch_transactions(&config, &token, Paging::page(PAGE_SIZE, page))
        .await
        .map_err(|e| api_error_message(&gate, &e))
}

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();
    let page = RwSignal::new(0_u32);

    let load_gate = gate.clone();
    let transactions = LocalResource::new(move || load_transactions(load_gate.clone(), config.clone(), page.get()));

    let rows = move |loaded: Page<Transaction>| {
        let table = gate.table();
        loaded
            .items
            .into_iter()
            .map(|tx| {
                let href = account_href(table, tx.account.id, false);
                let label = if tx.account.name.is_empty() { format!("#{}", tx.account.id) } else { tx.account.name.clone() };
                if !tx.is_consistent() {
                    leptos::logging::warn!("transaction {} does not add up", tx.id);
                }
                view! {
                    <tr class:transaction-row--inconsistent=!tx.is_consistent()>
                        <td>{format_datetime(&tx.created)}</td>
                        <td><A href=href>{label}</A></td>
                        <td class="money">{format_money(tx.amount).unwrap_or_default()}</td>
                        <td class="money">{format_money(tx.old_saldo).unwrap_or_default()}</td>
                        <td class="money">{format_money(tx.new_saldo).unwrap_or_default()}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    let total_pages = move || {
        transactions.get().and_then(Result::ok).map_or(1, |loaded| page_count(loaded.total, PAGE_SIZE))
    };

    view! {
        <section class="transactions-page">
            <h1>"Transactions"</h1>
            <Suspense fallback=|| view! { <p class="route-status">"Loading transactions..."</p> }>
                {move || {
                    transactions.get().map(|result| match result {
                        Ok(loaded) => view! {
                            <table class="ledger-table">
                                <thead>
                                    <tr>
                                        <th>"Date"</th><th>"Account"</th><th>"Amount"</th>
                                        <th>"Saldo before"</th><th>"Saldo after"</th>
                                    </tr>
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
