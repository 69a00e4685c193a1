//! Project Tracker Core
//!
//! Layered architecture:
//! - domain: Records, field descriptors, payloads and session state
//! - repository: Feature-service client and its wire format
//! - sections: The declared tabs, sections and fields of the form
//! - loader / binder: Record loading and two-way form binding
//! - controller: Per-page state machine driven by the UI

pub mod domain;
pub mod config;
pub mod repository;
pub mod sections;
pub mod loader;
pub mod binder;
pub mod nav;
pub mod controller;

pub use config::AppConfig;
pub use controller::{PageController, Phase, ProjectChoice, Transition};
pub use domain::{TrackerError, TrackerResult};
pub use loader::{list_projects, ProjectList, RecordLoader};
pub use nav::NavParams;
pub use repository::{FeatureService, RestFeatureService};
