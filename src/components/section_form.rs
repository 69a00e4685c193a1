//! Section Form Component
//!
//! One collapsible section of typed inputs with its own save action.

use leptos::prelude::*;

use crate::components::FieldInput;
use crate::context::AppContext;
use crate::models::{SectionSpec, StatusKind};

#[component]
pub fn SectionForm(section: &'static SectionSpec) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let editing = Memo::new(move |_| ctx.page.with(|p| p.session().is_editing(section.id)));
    let submitting = Memo::new(move |_| ctx.page.with(|p| p.is_submitting(section.id)));
    // Inline feedback for this section only
    let feedback = Memo::new(move |_| {
        ctx.page.with(|p| {
            p.session()
                .status()
                .filter(|s| s.section == Some(section.id))
                .map(|s| (s.kind, s.message.clone()))
        })
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.submit(section);
    };

    view! {
        <details class="section-form" open=true>
            <summary>
                {section.title}
                <Show when=move || editing.get()>
                    <span class="unsaved-marker" title="Unsaved changes">"●"</span>
                </Show>
            </summary>
            <form on:submit=on_submit>
                <fieldset disabled=move || submitting.get()>
                    {section.fields.iter().map(|descriptor| view! {
                        <FieldInput section=section descriptor=descriptor />
                    }).collect_view()}
                </fieldset>
                <div class="section-actions">
                    <button type="submit" disabled=move || !editing.get() || submitting.get()>
                        {move || if submitting.get() { "Saving..." } else { "Save" }}
                    </button>
                    <button
                        type="button"
                        class="cancel-btn"
                        disabled=move || !editing.get() || submitting.get()
                        on:click=move |_| { ctx.dispatch(|p| p.cancel_edit(section.id)); }
                    >
                        "Cancel"
                    </button>
                    {move || feedback.get().map(|(kind, message)| {
                        let class = match kind {
                            StatusKind::Success => "section-feedback success",
                            StatusKind::Failure => "section-feedback failure",
                            StatusKind::Warning => "section-feedback warning",
                        };
                        let dismissible = kind != StatusKind::Success;
                        view! {
                            <span class=class role="status">
                                {message}
                                <Show when=move || dismissible>
                                    <button
                                        type="button"
                                        class="dismiss-btn"
                                        on:click=move |_| { ctx.dispatch(|p| p.dismiss_status()); }
                                    >
                                        "×"
                                    </button>
                                </Show>
                            </span>
                        }
                    })}
                </div>
            </form>
        </details>
    }
}
