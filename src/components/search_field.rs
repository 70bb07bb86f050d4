//! Text input bound to a search term signal.

use leptos::prelude::*;

/// Filter box shown above list views.
#[component]
pub fn SearchField(term: RwSignal<String>, #[prop(default = "Search by name")] placeholder: &'static str) -> impl IntoView {
    view! {
        <input
            class="search-field"
            type="search"
            placeholder=placeholder
            prop:value=move || term.get()
            on:input=move |ev| term.set(event_target_value(&ev))
        />
    }
}
