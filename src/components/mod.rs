//! UI Components
//!
//! Reusable Leptos components.

mod blocking_error;
mod delete_confirm_button;
mod field_input;
mod geometry_view;
mod instructions;
mod project_selector;
mod section_form;
mod section_tabs;
mod status_banner;

pub use blocking_error::BlockingError;
pub use delete_confirm_button::DeleteConfirmButton;
pub use field_input::FieldInput;
pub use geometry_view::GeometryView;
pub use instructions::Instructions;
pub use project_selector::ProjectSelector;
pub use section_form::SectionForm;
pub use section_tabs::SectionTabs;
pub use status_banner::StatusBanner;
