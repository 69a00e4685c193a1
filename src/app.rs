//! Project Tracker Frontend App
//!
//! Loads the configuration, then shows the project selector above the
//! tabbed project form. The title row links back to the page named by the
//! `version` URL parameter.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::commands;
use crate::components::{
    BlockingError, DeleteConfirmButton, Instructions, ProjectSelector, SectionTabs, StatusBanner,
};
use crate::context::AppContext;
use crate::models::{AppConfig, NavParams, PageController};
use crate::store::AppState;

#[component]
pub fn App() -> impl IntoView {
    let nav = NavParams::from_query_string(&commands::current_query_string());
    let (config, set_config) = signal::<Option<Result<AppConfig, String>>>(None);

    // Load configuration on mount
    spawn_local(async move {
        let loaded = commands::load_config().await.map_err(|e| {
            log::error!("{}", e);
            e.to_string()
        });
        set_config.set(Some(loaded));
    });

    view! {
        <div class="app-layout">
            {move || match config.get() {
                None => view! { <p class="loading">"Loading configuration..."</p> }.into_any(),
                Some(Err(message)) => view! { <BlockingError message=message /> }.into_any(),
                Some(Ok(config)) => view! { <ProjectPage config=config nav=nav.clone() /> }.into_any(),
            }}
        </div>
    }
}

/// Selector, status banner and tabs for one configured service
#[component]
fn ProjectPage(config: AppConfig, nav: NavParams) -> impl IntoView {
    let mode = nav.mode;
    let return_url = config.return_links.url_for(mode).to_string();
    let page = RwSignal::new(PageController::new(nav, &config.fields));
    let store = Store::new(AppState::default());
    let ctx = AppContext::new(page, config, store);
    provide_context(store);
    provide_context(ctx);

    ctx.load_projects();
    // Project named in the page URL
    ctx.run_pending_load();

    let blocking = Memo::new(move |_| page.with(|p| p.blocking_error().map(str::to_string)));
    let tabs_visible = Memo::new(move |_| page.with(|p| p.tabs_visible()));
    let loading = Memo::new(move |_| page.with(|p| p.is_loading()));
    let can_delete = Memo::new(move |_| {
        page.with(|p| p.tabs_visible() && !p.session().any_editing())
    });

    view! {
        <div class="title-row">
            <h1>"Project Editor"</h1>
            <a class="return-link" href=return_url target="_self">{mode.return_label()}</a>
        </div>
        {move || match blocking.get() {
            Some(message) => view! { <BlockingError message=message /> }.into_any(),
            None => view! {
                <div class="project-page">
                    <Instructions />
                    <div class="project-toolbar">
                        <ProjectSelector />
                        <button
                            class="refresh-btn"
                            disabled=move || !tabs_visible.get()
                            on:click=move |_| ctx.refresh()
                        >
                            "Refresh"
                        </button>
                        <Show when=move || can_delete.get()>
                            <DeleteConfirmButton
                                button_class="delete-project-btn"
                                label="Delete project"
                                on_confirm=Callback::new(move |_| ctx.delete_project())
                            />
                        </Show>
                    </div>
                    <StatusBanner />
                    <Show when=move || loading.get()>
                        <p class="loading">"Loading project..."</p>
                    </Show>
                    <Show when=move || tabs_visible.get()>
                        <SectionTabs />
                    </Show>
                </div>
            }.into_any(),
        }}
    }
}
