//! Application Context
//!
//! Shared state provided via Leptos Context API. All page state lives in
//! one `PageController`; components read it through the signal and change
//! it only through `dispatch`, which notifies subscribers when the
//! controller reports a change.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::models::{AppConfig, PageController, ProjectChoice, ProjectList, SectionSpec, Transition};
use crate::store::{store_remove_project, store_set_project_list, AppStore};

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Controller of the project page
    pub page: RwSignal<PageController>,
    /// Loaded configuration, including credentials
    config: StoredValue<AppConfig>,
    store: AppStore,
}

impl AppContext {
    pub fn new(page: RwSignal<PageController>, config: AppConfig, store: AppStore) -> Self {
        Self { page, config: StoredValue::new(config), store }
    }

    /// Run a controller handler; subscribers wake only on `Changed`
    pub fn dispatch(&self, handler: impl FnOnce(&mut PageController) -> Transition) -> Transition {
        let transition = self
            .page
            .try_update_untracked(handler)
            .unwrap_or(Transition::Unchanged);
        if transition.is_changed() {
            self.page.notify();
        }
        transition
    }

    /// Request the selector entries; also used by the selector's retry button
    pub fn load_projects(&self) {
        let ctx = *self;
        store_set_project_list(&self.store, ProjectList::Loading);
        let config = self.config.get_value();
        spawn_local(async move {
            let result = commands::list_projects(&config).await;
            if let Ok(projects) = &result {
                log::info!("Loaded {} projects", projects.len());
            }
            store_set_project_list(&ctx.store, ProjectList::from_result(&result));
            match result {
                Err(err) if err.is_blocking() => {
                    ctx.dispatch(|page| page.fail(err));
                }
                _ => {}
            }
        });
    }

    pub fn select_project(&self, choice: ProjectChoice) {
        if self.dispatch(|page| page.select(choice)).is_changed() {
            self.run_pending_load();
        }
    }

    pub fn refresh(&self) {
        if self.dispatch(|page| page.refresh()).is_changed() {
            self.run_pending_load();
        }
    }

    /// Load the active project if the controller owes it a load
    pub fn run_pending_load(&self) {
        let ctx = *self;
        let Some(ticket) = self.page.try_update_untracked(|page| page.start_load()).flatten() else {
            return;
        };
        let config = self.config.get_value();
        spawn_local(async move {
            let result = commands::fetch_project(&config, &ticket.project).await;
            ctx.dispatch(|page| page.finish_load(ticket, result));
        });
    }

    /// Submit one section; the section stays locked until the answer arrives
    pub fn submit(&self, section: &'static SectionSpec) {
        let ctx = *self;
        let Some((transition, ticket)) = self.page.try_update_untracked(|page| page.begin_submit(section)) else {
            return;
        };
        if transition.is_changed() {
            self.page.notify();
        }
        let Some(ticket) = ticket else {
            return;
        };
        let config = self.config.get_value();
        spawn_local(async move {
            let response = commands::update_project(&config, &ticket.payload).await;
            ctx.dispatch(|page| page.finish_submit(ticket, response));
        });
    }

    /// Delete the active project and drop it from the selector
    pub fn delete_project(&self) {
        let ctx = *self;
        let Some(ticket) = self.page.try_update_untracked(|page| page.begin_delete()).flatten() else {
            return;
        };
        let project = self.page.with_untracked(|page| page.selected_project().cloned());
        let config = self.config.get_value();
        spawn_local(async move {
            let result = commands::delete_project(&config, ticket.object_id).await;
            let deleted = matches!(result, Ok(true));
            ctx.dispatch(|page| page.finish_delete(ticket, result));
            if let (true, Some(project)) = (deleted, project) {
                store_remove_project(&ctx.store, &project);
            }
        });
    }
}
