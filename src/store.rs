//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use crate::models::{ProjectId, ProjectList};

/// Data shared across the page that is not part of a project session
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Entries of the project selector, sorted by display name
    pub project_list: ProjectList,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the project list
pub fn store_set_project_list(store: &AppStore, list: ProjectList) {
    store.project_list().set(list);
}

/// Remove a project from the selector by id
pub fn store_remove_project(store: &AppStore, id: &ProjectId) {
    store.project_list().write().remove(id);
}
