//! Status Banner Component
//!
//! Outcome of the last page-level operation (load, delete). Section
//! submissions report inline in their form. Success clears itself after a
//! short delay; failures and warnings stay until dismissed.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracker_core::controller::SUCCESS_BANNER_TTL_MS;

use crate::context::AppContext;
use crate::models::StatusKind;

#[component]
pub fn StatusBanner() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let status = Memo::new(move |_| {
        ctx.page.with(|p| p.session().status().filter(|s| s.section.is_none()).cloned())
    });

    let expiring = Memo::new(move |_| ctx.page.with(|p| p.success_to_expire()));

    // Auto-clear success acknowledgements, inline ones included
    Effect::new(move |_| {
        if let Some(seq) = expiring.get() {
            spawn_local(async move {
                TimeoutFuture::new(SUCCESS_BANNER_TTL_MS).await;
                ctx.dispatch(|p| p.expire_status(seq));
            });
        }
    });

    move || status.get().map(|status| {
        let class = match status.kind {
            StatusKind::Success => "status-banner success",
            StatusKind::Failure => "status-banner failure",
            StatusKind::Warning => "status-banner warning",
        };
        let dismissible = status.kind != StatusKind::Success;
        view! {
            <div class=class role="status">
                <span class="status-message">{status.message.clone()}</span>
                <span class="status-time">{status.at.format("%H:%M:%S UTC").to_string()}</span>
                <Show when=move || dismissible>
                    <button class="dismiss-btn" on:click=move |_| { ctx.dispatch(|p| p.dismiss_status()); }>
                        "×"
                    </button>
                </Show>
            </div>
        }
    })
}
