//! Account detail with booking form, and the account edit form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both views load the account fresh on mount. Bookings go through the
//! ledger, which is the authority on saldo and overdraw rules; the checks
//! here only spare the user a round-trip.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use std::sync::Arc;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use super::accounts::account_href;
use crate::config::AppConfig;
use crate::net::api::{self, Paging};
use crate::net::types::{Account, AccountUpdate, Group, GroupRef, NewTransaction, Page, Transaction};
use crate::util::auth::{AppGate, api_error_message, require_token};
use crate::util::format::{format_datetime, format_money};

const HISTORY_SIZE: u32 = 20;

/// Parse a booking amount; accepts `,` as the decimal separator.
#[allow(clippy::float_cmp)]
fn parse_amount(raw: &str) -> Result<f64, &'static str> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err("Enter an amount.");
    }
    let amount: f64 = normalized.parse().map_err(|_| "Amount must be a number.")?;
    if !amount.is_finite() || amount == 0.0 {
        return Err("Amount must be a non-zero number.");
    }
    Ok((amount * 100.0).round() / 100.0)
}

/// Validate a booking against the account's group before sending it.
fn check_booking(account: &Account, raw_amount: &str) -> Result<NewTransaction, String> {
    let amount = parse_amount(raw_amount).map_err(str::to_owned)?;
    let new_saldo = ((account.saldo + amount) * 100.0).round() / 100.0;
    let permitted = account.group.as_ref().map_or(new_saldo >= 0.0, |g| g.permits_balance(new_saldo));
    if !permitted {
        return Err(format!(
            "{} may not overdraw; booking would leave {}.",
            account.name,
            format_money(new_saldo).unwrap_or_default()
        ));
    }
    Ok(NewTransaction { account_id: account.id, amount })
}

/// Edit form contents turned into an update body.
fn build_update(
    id: i32,
    name: &str,
    description: &str,
    nfc_chip_id: &str,
    group_id: Option<i32>,
) -> Result<AccountUpdate, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty.");
    }
    let description = description.trim();
    Ok(AccountUpdate {
        id,
        name: name.to_owned(),
        description: (!description.is_empty()).then(|| description.to_owned()),
        nfc_chip_id: nfc_chip_id.trim().to_owned(),
        group: group_id.map(|id| GroupRef { id }),
    })
}

async fn load_account(gate: Arc<AppGate>, config: AppConfig, id: i32) -> Result<Account, String> {
    let token = require_token(&gate).map_err(|e| api_error_message(&gate, &e))?;
    api::fetch_account(&config, &token, id).await.map_err(|e| api_error_message(&gate, &e))
}

async fn load_history(gate: Arc<AppGate>, config: AppConfig, id: i32) -> Result<Page<Transaction>, String> {
    let token = require_token(&gate).map_err(|e| api_error_message(&gate, &e))?;
    api::fetch_account_transactions(&config, &token, id, Paging::new(HISTORY_SIZE, 0))
        .await
        .map_err(|e| api_error_message(&gate, &e))
}

async fn load_groups(gate: Arc<AppGate>, config: AppConfig) -> Result<Page<Group>, String> {
    let token = require_token(&gate).map_err(|e| api_error_message(&gate, &e))?;
    api::fetch_groups(&config, &token, Paging::default()).await.map_err(|e| api_error_message(&gate, &e))
}

#[component]
pub fn AccountPage(id: i32) -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();

    let account = {
        let (gate, config) = (gate.clone(), config.clone());
        LocalResource::new(move || load_account(gate.clone(), config.clone(), id))
    };
    let history = {
        let (gate, config) = (gate.clone(), config.clone());
        LocalResource::new(move || load_history(gate.clone(), config.clone(), id))
    };

    let amount = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let edit_href = account_href(gate.table(), id, true);

    let on_book = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(Ok(current)) = account.get() else {
            return;
        };
        let booking = match check_booking(&current, &amount.get()) {
            Ok(booking) => booking,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        busy.set(true);
        info.set("Booking...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let gate = gate.clone();
            let config = config.clone();
            leptos::task::spawn_local(async move {
                let result = match require_token(&gate) {
                    Ok(token) => api::create_transaction(&config, &token, &booking).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(transaction) => {
                        leptos::logging::log!("booked {} on account {}", transaction.amount, transaction.account.id);
                        amount.set(String::new());
                        info.set(String::new());
                        account.refetch();
                        history.refetch();
                    }
                    Err(e) => info.set(api_error_message(&gate, &e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (booking, &gate, &config);
        }
    };

    let details = move |account: Account| {
        let group = account.group.clone();
        view! {
            <h1>{account.name.clone()}</h1>
            <dl class="account-details">
                <dt>"Saldo"</dt>
                <dd class="money" class:money--negative=account.is_overdrawn()>
                    {format_money(account.saldo).unwrap_or_else(|| "0.00 €".to_owned())}
                </dd>
                <dt>"Description"</dt>
                <dd>{account.description.clone().unwrap_or_default()}</dd>
                <dt>"NFC chip"</dt>
                <dd>{account.nfc_chip_id.clone()}</dd>
                <dt>"Group"</dt>
                <dd>{group.as_ref().map(|g| g.name.clone()).unwrap_or_else(|| "None".to_owned())}</dd>
                <dt>"May overdraw"</dt>
                <dd>{if group.is_some_and(|g| g.can_overdraw) { "Yes" } else { "No" }}</dd>
            </dl>
        }
    };

    let history_rows = move |page: Page<Transaction>| {
        page.items
            .into_iter()
            .map(|tx| {
                view! {
                    <tr class:transaction-row--inconsistent=!tx.is_consistent()>
                        <td>{format_datetime(&tx.created)}</td>
                        <td class="money">{format_money(tx.amount).unwrap_or_default()}</td>
                        <td class="money">{format_money(tx.new_saldo).unwrap_or_default()}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <section class="account-page">
            <Suspense fallback=|| view! { <p class="route-status">"Loading account..."</p> }>
                {move || {
                    account.get().map(|result| match result {
                        Ok(loaded) => details(loaded).into_any(),
                        Err(message) => view! { <p class="error">{message}</p> }.into_any(),
                    })
                }}
            </Suspense>
            <A href=edit_href>"Edit account"</A>
            <form class="booking-form" on:submit=on_book>
                <input
                    class="booking-input"
                    type="text"
                    inputmode="decimal"
                    placeholder="Amount, negative for a purchase"
                    prop:value=move || amount.get()
                    on:input=move |ev| amount.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>"Book"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="booking-message">{move || info.get()}</p>
            </Show>
            <h2>"Recent transactions"</h2>
            <Suspense fallback=|| view! { <p class="route-status">"Loading transactions..."</p> }>
                {move || {
                    history.get().map(|result| match result {
                        Ok(page) => view! {
                            <table class="ledger-table">
                                <thead><tr><th>"Date"</th><th>"Amount"</th><th>"Saldo after"</th></tr></thead>
                                <tbody>{history_rows(page)}</tbody>
                            </table>
                        }.into_any(),
                        Err(message) => view! { <p class="error">{message}</p> }.into_any(),
                    })
                }}
            </Suspense>
        </section>
    }
}

#[component]
pub fn AccountEditPage(id: i32) -> impl IntoView {
    let gate = expect_context::<Arc<AppGate>>();
    let config = expect_context::<AppConfig>();
    let navigate = use_navigate();

    let account = {
        let (gate, config) = (gate.clone(), config.clone());
        LocalResource::new(move || load_account(gate.clone(), config.clone(), id))
    };
    let groups = {
        let (gate, config) = (gate.clone(), config.clone());
        LocalResource::new(move || load_groups(gate.clone(), config.clone()))
    };

    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let nfc_chip_id = RwSignal::new(String::new());
    let group_id = RwSignal::new(None::<i32>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let filled = RwSignal::new(false);

    Effect::new(move || {
        if filled.get_untracked() {
            return;
        }
        if let Some(Ok(loaded)) = account.get() {
            name.set(loaded.name);
            description.set(loaded.description.unwrap_or_default());
            nfc_chip_id.set(loaded.nfc_chip_id);
            group_id.set(loaded.group.map(|g| g.id));
            filled.set(true);
        }
    });

    let detail_href = account_href(gate.table(), id, false);
    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() || !filled.get() {
            return;
        }
        let update = match build_update(id, &name.get(), &description.get(), &nfc_chip_id.get(), group_id.get()) {
            Ok(update) => update,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Saving...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let gate = gate.clone();
            let config = config.clone();
            let navigate = navigate.clone();
            let detail_href = detail_href.clone();
            leptos::task::spawn_local(async move {
                let result = match require_token(&gate) {
                    Ok(token) => api::update_account(&config, &token, &update).await,
                    Err(e) => Err(e),
                };
                busy.set(false);
                match result {
                    Ok(_) => navigate(&detail_href, NavigateOptions::default()),
                    Err(e) => info.set(api_error_message(&gate, &e)),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (update, &gate, &config, &navigate, &detail_href);
        }
    };

    let group_options = move || {
        groups.get().and_then(Result::ok).map(|page| {
            page.items
                .into_iter()
                .map(|g| {
                    let selected = group_id.get() == Some(g.id);
                    view! { <option value=g.id.to_string() selected=selected>{g.name}</option> }
                })
                .collect_view()
        })
    };

    view! {
        <section class="account-edit-page">
            <h1>"Edit account"</h1>
            <form class="account-form" on:submit=on_save>
                <label>"Name"
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label>"Description"
                    <input
                        type="text"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    />
                </label>
                <label>"NFC chip"
                    <input
                        type="text"
                        prop:value=move || nfc_chip_id.get()
                        on:input=move |ev| nfc_chip_id.set(event_target_value(&ev))
                    />
                </label>
                <label>"Group"
                    <select on:change=move |ev| group_id.set(event_target_value(&ev).parse().ok())>
                        <option value="" selected=move || group_id.get().is_none()>"None"</option>
                        <Suspense fallback=|| ()>{group_options}</Suspense>
                    </select>
                </label>
                <button type="submit" disabled=move || busy.get() || !filled.get()>"Save"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="form-message">{move || info.get()}</p>
            </Show>
        </section>
    }
}
