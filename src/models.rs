//! Frontend Models
//!
//! Data structures shared with the core crate.

pub use tracker_core::config::AppConfig;
pub use tracker_core::controller::{PageController, ProjectChoice, Transition};
pub use tracker_core::domain::{
    DisplayMode, FieldDescriptor, GeometrySummary, ProjectId, ProjectSummary, StatusKind, TrackerError,
    TrackerResult, WidgetKind,
};
pub use tracker_core::loader::ProjectList;
pub use tracker_core::nav::NavParams;
pub use tracker_core::sections::SectionSpec;
