//! Session Context
//!
//! Per-session key/value state, passed explicitly to every component.
//! Keys are typed: a record lives under a `Namespace`, a widget value under
//! a `FieldKey`. Last write wins.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::field::FieldValue;
use super::record::{ProjectId, RecordValues};

/// Namespace under which one loaded record's values live
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub const PROJECT: &'static str = "project";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Namespace of the selected project record
    pub fn project() -> Self {
        Self::new(Self::PROJECT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a form section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub &'static str);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Key of one widget value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub section: SectionId,
    pub field: &'static str,
}

impl FieldKey {
    pub fn new(section: SectionId, field: &'static str) -> Self {
        Self { section, field }
    }
}

/// Page variant requested through the `version` navigation parameter.
/// Decides where the return link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Opened from the project list for editing
    #[default]
    Edit,
    /// Opened from the review list
    Review,
}

impl DisplayMode {
    /// Unknown values fall back to the default mode
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "review" => DisplayMode::Review,
            _ => DisplayMode::Edit,
        }
    }

    /// Caption of the link back to the calling application
    pub fn return_label(&self) -> &'static str {
        match self {
            DisplayMode::Edit => "RETURN TO APEX",
            DisplayMode::Review => "RETURN TO REVIEW LIST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Transient acknowledgement, cleared automatically
    Success,
    /// Persistent until dismissed
    Failure,
    Warning,
}

/// Most recent operation status shown in the banner
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitStatus {
    /// Increments on every new status so stale auto-clears are ignored
    pub seq: u64,
    pub section: Option<SectionId>,
    pub kind: StatusKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Transient per-session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    selected_project: Option<ProjectId>,
    display_mode: DisplayMode,
    records: BTreeMap<Namespace, RecordValues>,
    geometries: BTreeMap<Namespace, Value>,
    widgets: BTreeMap<FieldKey, FieldValue>,
    editing: BTreeSet<SectionId>,
    status: Option<SubmitStatus>,
    status_seq: u64,
}

impl SessionContext {
    pub fn new(display_mode: DisplayMode) -> Self {
        Self { display_mode, ..Default::default() }
    }

    // ========================
    // Selection
    // ========================

    pub fn selected_project(&self) -> Option<&ProjectId> {
        self.selected_project.as_ref()
    }

    pub fn set_selected_project(&mut self, project: Option<ProjectId>) {
        self.selected_project = project;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    // ========================
    // Record values
    // ========================

    pub fn record(&self, namespace: &Namespace) -> Option<&RecordValues> {
        self.records.get(namespace)
    }

    pub fn record_mut(&mut self, namespace: &Namespace) -> Option<&mut RecordValues> {
        self.records.get_mut(namespace)
    }

    pub fn put_record(&mut self, namespace: Namespace, values: RecordValues) {
        self.records.insert(namespace, values);
    }

    /// Drop a namespace's values and geometry
    pub fn remove_record(&mut self, namespace: &Namespace) -> Option<RecordValues> {
        self.geometries.remove(namespace);
        self.records.remove(namespace)
    }

    pub fn geometry(&self, namespace: &Namespace) -> Option<&Value> {
        self.geometries.get(namespace)
    }

    /// Replace a namespace's geometry; `None` clears it
    pub fn put_geometry(&mut self, namespace: Namespace, geometry: Option<Value>) {
        match geometry {
            Some(geometry) => {
                self.geometries.insert(namespace, geometry);
            }
            None => {
                self.geometries.remove(&namespace);
            }
        }
    }

    // ========================
    // Widget values and edit mode
    // ========================

    pub fn widget(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.widgets.get(key)
    }

    /// Store an edited value and put its section into edit mode
    pub fn set_widget(&mut self, key: FieldKey, value: FieldValue) {
        self.editing.insert(key.section);
        self.widgets.insert(key, value);
    }

    /// Drop a section's widget values and leave edit mode
    pub fn discard_section(&mut self, section: SectionId) {
        self.widgets.retain(|key, _| key.section != section);
        self.editing.remove(&section);
    }

    /// Drop every unsaved edit in every section
    pub fn discard_all_edits(&mut self) {
        self.widgets.clear();
        self.editing.clear();
    }

    pub fn is_editing(&self, section: SectionId) -> bool {
        self.editing.contains(&section)
    }

    pub fn any_editing(&self) -> bool {
        !self.editing.is_empty()
    }

    pub fn editing_sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.editing.iter().copied()
    }

    // ========================
    // Status banner
    // ========================

    pub fn status(&self) -> Option<&SubmitStatus> {
        self.status.as_ref()
    }

    /// Replace the banner, returning its sequence number
    pub fn set_status(
        &mut self,
        section: Option<SectionId>,
        kind: StatusKind,
        message: impl Into<String>,
    ) -> u64 {
        self.status_seq += 1;
        self.status = Some(SubmitStatus {
            seq: self.status_seq,
            section,
            kind,
            message: message.into(),
            at: Utc::now(),
        });
        self.status_seq
    }

    pub fn clear_status(&mut self) -> bool {
        self.status.take().is_some()
    }

    /// Clear the banner only if it is still the one numbered `seq`
    pub fn clear_status_if(&mut self, seq: u64) -> bool {
        match &self.status {
            Some(status) if status.seq == seq => {
                self.status = None;
                true
            }
            _ => false,
        }
    }
}
