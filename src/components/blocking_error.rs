//! Blocking Error Component
//!
//! Full-page message shown when data access is impossible.

use leptos::prelude::*;

#[component]
pub fn BlockingError(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="blocking-error" role="alert">
            <h2>"Project data is unavailable"</h2>
            <p>{message}</p>
            <p class="hint">"Check the service credentials in tracker.toml and reload the page."</p>
        </div>
    }
}
