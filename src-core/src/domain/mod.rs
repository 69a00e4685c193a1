//! Domain Layer
//!
//! Records, field descriptors, payloads and per-session state.
//! Nothing in here performs I/O.

mod error;
mod record;
mod field;
mod payload;
mod session;
mod geometry;

pub use error::{TrackerError, TrackerResult};
pub use record::{AttrValue, Feature, ObjectId, ProjectId, ProjectRecord, ProjectSummary, RecordValues};
pub use field::{FieldDescriptor, FieldValue, WidgetKind};
pub use payload::{SubmitResult, UpdateOutcome, UpdatePayload};
pub use geometry::{pretty_geometry, GeometryKind, GeometrySummary};
pub use session::{DisplayMode, FieldKey, Namespace, SectionId, SessionContext, StatusKind, SubmitStatus};
