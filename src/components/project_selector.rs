//! Project Selector Component
//!
//! Dropdown of all projects with a placeholder for "none selected". When the
//! list request fails the dropdown still opens and a retry is offered.

use leptos::prelude::*;
use tracker_core::controller::PLACEHOLDER_LABEL;

use crate::context::AppContext;
use crate::models::ProjectChoice;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ProjectSelector() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_app_store();
    let selected = Memo::new(move |_| {
        ctx.page.with(|p| p.selected_project().map(|id| id.as_str().to_string()))
    });
    let list_error = Memo::new(move |_| store.project_list().with(|l| l.error().map(str::to_string)));

    view! {
        <select
            class="project-selector"
            disabled=move || !store.project_list().with(|l| l.selector_enabled())
            on:change=move |ev| {
                ctx.select_project(ProjectChoice::from_option_value(&event_target_value(&ev)));
            }
        >
            <option value="" selected=move || selected.get().is_none()>
                {PLACEHOLDER_LABEL}
            </option>
            <For
                each=move || store.project_list().with(|l| l.projects().to_vec())
                key=|project| project.id.clone()
                children=move |project| {
                    let id = project.id.as_str().to_string();
                    let is_selected = {
                        let id = id.clone();
                        move || selected.get().as_deref() == Some(id.as_str())
                    };
                    view! {
                        <option value=id selected=is_selected>
                            {project.name.clone()}
                        </option>
                    }
                }
            />
        </select>
        {move || list_error.get().map(|message| view! {
            <span class="project-list-error">
                {message}
                <button class="retry-btn" on:click=move |_| ctx.load_projects()>"Retry"</button>
            </span>
        })}
    }
}
