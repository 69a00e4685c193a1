//! Instructions Component
//!
//! Collapsed help text shown above the form.

use leptos::prelude::*;

const STEPS: &[&str] = &[
    "Pick a project from the selector, or open the page with a project in the link.",
    "Information holds the project's identification, timeline, funding and practice, descriptions and web links.",
    "AASHTOWare holds the contract data kept in sync with AASHTOWare.",
    "Geometry shows the project's stored shape. It is read-only here.",
    "Each section saves on its own. Changes in other sections stay as they are.",
    "Cancel restores the values last loaded from the service.",
];

#[component]
pub fn Instructions() -> impl IntoView {
    view! {
        <details class="instructions">
            <summary>"Instructions"</summary>
            <ol>
                {STEPS.iter().map(|step| view! { <li>{*step}</li> }).collect_view()}
            </ol>
        </details>
    }
}
