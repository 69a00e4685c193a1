//! Page Controller
//!
//! Owns the session for one page and moves it through
//! `NoProject → Viewing → Editing → SubmitPending → Viewing`.
//!
//! Every handler returns a `Transition`; callers re-render only on
//! `Transition::Changed`. Network work is split into `begin_*` (takes a
//! ticket out of the controller) and `finish_*` (hands the response back),
//! so the controller is never borrowed across an await.

use crate::binder::{self, RenderedField};
use crate::config::FieldNames;
use crate::domain::{
    pretty_geometry, DisplayMode, GeometrySummary, Namespace, ObjectId, ProjectId, ProjectRecord, SectionId, SessionContext, StatusKind,
    TrackerError, TrackerResult, UpdateOutcome, UpdatePayload,
};
use crate::loader::RecordLoader;
use crate::nav::NavParams;
use crate::repository::FeatureService;
use crate::sections::{self, SectionSpec, TabSpec};

/// Label of the "none selected" entry of the project selector
pub const PLACEHOLDER_LABEL: &str = "— Select a project —";

/// How long a success acknowledgement stays visible
pub const SUCCESS_BANNER_TTL_MS: u32 = 3_000;

/// Entry picked in the project selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectChoice {
    Placeholder,
    Project(ProjectId),
}

impl ProjectChoice {
    /// Read an `<option>` value; the placeholder's value is empty
    pub fn from_option_value(raw: &str) -> Self {
        if raw.trim().is_empty() {
            ProjectChoice::Placeholder
        } else {
            ProjectChoice::Project(ProjectId::new(raw))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoProject,
    Viewing,
    Editing(SectionId),
    SubmitPending(SectionId),
}

/// Result of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Changed(Phase),
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Pending,
    InFlight,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
struct Activation {
    project: ProjectId,
    generation: u64,
    load: LoadState,
}

/// Permission to load the active project
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket {
    pub project: ProjectId,
    generation: u64,
}

/// A prepared section update
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    pub section: &'static SectionSpec,
    pub payload: UpdatePayload,
    generation: u64,
}

/// A prepared delete of the active project
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTicket {
    pub object_id: ObjectId,
    generation: u64,
}

/// State of one project page
#[derive(Debug, Clone, PartialEq)]
pub struct PageController {
    session: SessionContext,
    namespace: Namespace,
    row_id_field: String,
    active: Option<Activation>,
    generation: u64,
    active_tab: usize,
    pending_submit: Option<SectionId>,
    blocking_error: Option<String>,
}

impl PageController {
    /// Start from navigation parameters; a project given there is activated
    pub fn new(nav: NavParams, fields: &FieldNames) -> Self {
        let mut controller = Self {
            session: SessionContext::new(nav.mode),
            namespace: Namespace::project(),
            row_id_field: fields.row_id.to_lowercase(),
            active: None,
            generation: 0,
            active_tab: 0,
            pending_submit: None,
            blocking_error: None,
        };
        if let Some(project) = nav.project {
            controller.select(ProjectChoice::Project(project));
        }
        controller
    }

    // ========================
    // Queries
    // ========================

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn phase(&self) -> Phase {
        if self.active.is_none() {
            Phase::NoProject
        } else if let Some(section) = self.pending_submit {
            Phase::SubmitPending(section)
        } else if let Some(section) = self.session.editing_sections().next() {
            Phase::Editing(section)
        } else {
            Phase::Viewing
        }
    }

    pub fn selected_project(&self) -> Option<&ProjectId> {
        self.session.selected_project()
    }

    /// Tabs are shown only once a selected project has loaded
    pub fn tabs_visible(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.load == LoadState::Loaded)
    }

    pub fn is_loading(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| matches!(a.load, LoadState::Pending | LoadState::InFlight))
    }

    pub fn tabs(&self) -> &'static [TabSpec] {
        sections::catalog()
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn is_submitting(&self, section: SectionId) -> bool {
        self.pending_submit == Some(section)
    }

    pub fn blocking_error(&self) -> Option<&str> {
        self.blocking_error.as_deref()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.session.display_mode()
    }

    /// Shape of the loaded project's geometry, if the service returned one
    pub fn geometry_summary(&self) -> Option<GeometrySummary> {
        self.session.geometry(&self.namespace).map(GeometrySummary::from_json)
    }

    pub fn geometry_text(&self) -> Option<String> {
        self.session.geometry(&self.namespace).map(pretty_geometry)
    }

    /// Widget values of one section
    pub fn render_section(&self, section: &'static SectionSpec) -> Vec<RenderedField> {
        binder::render(section, &self.namespace, &self.session)
    }

    fn changed(&self) -> Transition {
        Transition::Changed(self.phase())
    }

    // ========================
    // Selection and loading
    // ========================

    /// Switch project. Unsaved edits in every tab are discarded.
    pub fn select(&mut self, choice: ProjectChoice) -> Transition {
        match choice {
            ProjectChoice::Placeholder => {
                if self.active.is_none() {
                    return Transition::Unchanged;
                }
                self.deactivate();
            }
            ProjectChoice::Project(project) => {
                if self.selected_project() == Some(&project) {
                    return Transition::Unchanged;
                }
                self.deactivate();
                self.generation += 1;
                log::info!("Project {} selected", project);
                self.session.set_selected_project(Some(project.clone()));
                self.active = Some(Activation {
                    project,
                    generation: self.generation,
                    load: LoadState::Pending,
                });
            }
        }
        self.changed()
    }

    fn deactivate(&mut self) {
        self.session.set_selected_project(None);
        self.session.discard_all_edits();
        self.session.remove_record(&self.namespace);
        self.active = None;
        self.pending_submit = None;
        self.active_tab = 0;
    }

    /// Load the active project again. Skipped while any section is mid-edit.
    pub fn refresh(&mut self) -> Transition {
        if self.session.any_editing() || self.pending_submit.is_some() {
            log::debug!("Refresh skipped, unsaved edits present");
            return Transition::Unchanged;
        }
        self.generation += 1;
        let generation = self.generation;
        match self.active.as_mut() {
            Some(active) => {
                active.generation = generation;
                active.load = LoadState::Pending;
                self.changed()
            }
            None => Transition::Unchanged,
        }
    }

    /// Take the one load owed to the current activation
    pub fn start_load(&mut self) -> Option<LoadTicket> {
        if self.session.any_editing() {
            return None;
        }
        let active = self.active.as_mut()?;
        if active.load != LoadState::Pending {
            return None;
        }
        active.load = LoadState::InFlight;
        Some(LoadTicket { project: active.project.clone(), generation: active.generation })
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: TrackerResult<ProjectRecord>) -> Transition {
        let current = self.active.as_ref().map(|a| a.generation);
        if current != Some(ticket.generation) {
            log::debug!("Dropping stale load of {}", ticket.project);
            return Transition::Unchanged;
        }

        match result {
            Ok(record) => {
                self.session.put_geometry(self.namespace.clone(), record.geometry);
                self.session.put_record(self.namespace.clone(), record.values);
                self.set_load_state(LoadState::Loaded);
            }
            Err(err @ TrackerError::NotFound { .. }) => {
                self.deactivate();
                self.session.set_status(None, StatusKind::Warning, err.to_string());
            }
            Err(err) => {
                self.set_load_state(LoadState::Failed);
                self.report(None, err);
            }
        }
        self.changed()
    }

    fn set_load_state(&mut self, load: LoadState) {
        if let Some(active) = self.active.as_mut() {
            active.load = load;
        }
    }

    /// Blocking errors stop all data access, the rest go to the banner
    fn report(&mut self, section: Option<SectionId>, err: TrackerError) {
        if err.is_blocking() {
            log::error!("{}", err);
            self.blocking_error = Some(err.to_string());
        } else {
            self.session.set_status(section, StatusKind::Failure, err.to_string());
        }
    }

    /// Record an error raised outside the controller (config, project list)
    pub fn fail(&mut self, err: TrackerError) -> Transition {
        self.report(None, err);
        self.changed()
    }

    // ========================
    // Tabs and editing
    // ========================

    pub fn select_tab(&mut self, index: usize) -> Transition {
        if index == self.active_tab || index >= self.tabs().len() {
            return Transition::Unchanged;
        }
        self.active_tab = index;
        self.changed()
    }

    /// Capture a raw input value
    pub fn edit(&mut self, section: &'static SectionSpec, field: &str, raw: &str) -> Transition {
        if self.pending_submit.is_some() || !self.tabs_visible() {
            return Transition::Unchanged;
        }
        if binder::capture(section, &self.namespace, &mut self.session, field, raw) {
            self.changed()
        } else {
            Transition::Unchanged
        }
    }

    /// Throw away a section's unsaved edits
    pub fn cancel_edit(&mut self, section: SectionId) -> Transition {
        if !self.session.is_editing(section) || self.pending_submit == Some(section) {
            return Transition::Unchanged;
        }
        self.session.discard_section(section);
        self.changed()
    }

    // ========================
    // Submit
    // ========================

    /// Build the payload and enter `SubmitPending`
    pub fn begin_submit(&mut self, section: &'static SectionSpec) -> (Transition, Option<SubmitTicket>) {
        if self.pending_submit.is_some() || !self.tabs_visible() {
            return (Transition::Unchanged, None);
        }
        match binder::build_payload(section, &self.namespace, &self.session, &self.row_id_field) {
            Ok(payload) => {
                self.pending_submit = Some(section.id);
                let ticket = SubmitTicket { section, payload, generation: self.generation };
                (self.changed(), Some(ticket))
            }
            Err(err) => {
                self.report(Some(section.id), err);
                (self.changed(), None)
            }
        }
    }

    /// Apply the service's answer. The namespace changes only on success.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, response: TrackerResult<UpdateOutcome>) -> Transition {
        let section = ticket.section;
        if self.pending_submit == Some(section.id) {
            self.pending_submit = None;
        }
        if let Err(err) = &response {
            if err.is_blocking() {
                self.report(Some(section.id), err.clone());
                return self.changed();
            }
        }

        let result = binder::submit_result(section, response);
        let same_activation = self.active.as_ref().is_some_and(|a| a.generation == ticket.generation);
        if result.success && same_activation {
            binder::apply_success(section, &self.namespace, &mut self.session, &ticket.payload);
        }
        let kind = if result.success { StatusKind::Success } else { StatusKind::Failure };
        self.session.set_status(Some(section.id), kind, result.message);
        self.changed()
    }

    // ========================
    // Delete
    // ========================

    pub fn begin_delete(&mut self) -> Option<DeleteTicket> {
        if self.pending_submit.is_some() || self.session.any_editing() || !self.tabs_visible() {
            return None;
        }
        let object_id = self
            .session
            .record(&self.namespace)
            .and_then(|r| r.object_id(&self.row_id_field))?;
        Some(DeleteTicket { object_id, generation: self.generation })
    }

    pub fn finish_delete(&mut self, ticket: DeleteTicket, result: TrackerResult<bool>) -> Transition {
        if self.active.as_ref().map(|a| a.generation) != Some(ticket.generation) {
            return Transition::Unchanged;
        }
        match result {
            Ok(true) => {
                let project = self.selected_project().cloned();
                self.deactivate();
                log::info!("Project {:?} deleted", project);
                self.session.set_status(None, StatusKind::Success, "Project deleted");
            }
            Ok(false) => {
                self.session.set_status(None, StatusKind::Failure, "The service did not delete the project");
            }
            Err(err) => self.report(None, err),
        }
        self.changed()
    }

    // ========================
    // Status banner
    // ========================

    pub fn dismiss_status(&mut self) -> Transition {
        if self.session.clear_status() {
            self.changed()
        } else {
            Transition::Unchanged
        }
    }

    /// Auto-clear a success acknowledgement if it is still showing
    pub fn expire_status(&mut self, seq: u64) -> Transition {
        let is_success = self
            .session
            .status()
            .is_some_and(|s| s.seq == seq && s.kind == StatusKind::Success);
        if is_success && self.session.clear_status_if(seq) {
            self.changed()
        } else {
            Transition::Unchanged
        }
    }

    /// Sequence number of a success banner that should be auto-cleared
    pub fn success_to_expire(&self) -> Option<u64> {
        self.session
            .status()
            .filter(|s| s.kind == StatusKind::Success)
            .map(|s| s.seq)
    }

    // ========================
    // Whole round trips
    // ========================

    /// Run the pending load, if any, against `service`
    pub async fn load_pending<S>(&mut self, service: &S, loader: &RecordLoader) -> Transition
    where
        S: FeatureService + ?Sized,
    {
        match self.start_load() {
            Some(ticket) => {
                let result = loader.fetch(service, &ticket.project).await;
                self.finish_load(ticket, result)
            }
            None => Transition::Unchanged,
        }
    }

    /// Submit one section against `service`
    pub async fn submit<S>(&mut self, service: &S, layer: &str, section: &'static SectionSpec) -> Transition
    where
        S: FeatureService + ?Sized,
    {
        match self.begin_submit(section) {
            (_, Some(ticket)) => {
                let response = service.update(layer, &ticket.payload).await;
                self.finish_submit(ticket, response)
            }
            (transition, None) => transition,
        }
    }

    /// Delete the active project against `service`
    pub async fn delete<S>(&mut self, service: &S, layer: &str) -> Transition
    where
        S: FeatureService + ?Sized,
    {
        match self.begin_delete() {
            Some(ticket) => {
                let result = service.delete(layer, ticket.object_id).await;
                self.finish_delete(ticket, result)
            }
            None => Transition::Unchanged,
        }
    }
}
