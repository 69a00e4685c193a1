//! Two-step delete control for the project toolbar.

use leptos::prelude::*;

/// Asks "Delete this project?" before running `on_confirm`.
///
/// The question replaces the trigger until one of its buttons is pressed.
/// Either answer returns the control to its idle state.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] label: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let confirming = RwSignal::new(false);
    let answer = move |delete: bool| {
        confirming.set(false);
        if delete {
            on_confirm.run(());
        }
    };

    move || {
        if confirming.get() {
            view! {
                <span class="delete-confirm" role="alertdialog">
                    <span class="delete-confirm-text">"Delete this project?"</span>
                    <button class="confirm-btn" on:click=move |_| answer(true)>"Delete"</button>
                    <button class="cancel-btn" on:click=move |_| answer(false)>"Keep"</button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button class=button_class.clone() on:click=move |_| confirming.set(true)>
                    {label.clone()}
                </button>
            }
            .into_any()
        }
    }
}
