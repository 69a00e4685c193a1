//! Record Loader
//!
//! Fetches one project by its GUID and flattens it into a session
//! namespace. Also builds the sorted project selection list.

use std::collections::BTreeSet;

use crate::config::AppConfig;
use crate::domain::{
    Namespace, ProjectId, ProjectRecord, ProjectSummary, RecordValues, SessionContext,
    TrackerError, TrackerResult,
};
use crate::repository::{FeatureService, Query};
use crate::sections;

/// Loads records of one layer
#[derive(Debug, Clone)]
pub struct RecordLoader {
    layer: String,
    id_field: String,
    row_id_field: String,
    whitelist: BTreeSet<String>,
}

impl RecordLoader {
    pub fn new(layer: &str, id_field: &str, row_id_field: &str, whitelist: BTreeSet<String>) -> Self {
        Self {
            layer: layer.to_string(),
            id_field: id_field.to_lowercase(),
            row_id_field: row_id_field.to_lowercase(),
            whitelist,
        }
    }

    /// Loader for the projects layer, typed on every declared form field
    pub fn for_projects(config: &AppConfig) -> Self {
        let mut whitelist = sections::declared_fields();
        whitelist.insert(config.fields.id.to_lowercase());
        whitelist.insert(config.fields.row_id.to_lowercase());
        whitelist.insert(config.fields.display_name.to_lowercase());
        Self::new(&config.projects_layer, &config.fields.id, &config.fields.row_id, whitelist)
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn row_id_field(&self) -> &str {
        &self.row_id_field
    }

    /// Query the record matching `id`; zero matches is `NotFound`
    pub async fn fetch<S>(&self, service: &S, id: &ProjectId) -> TrackerResult<ProjectRecord>
    where
        S: FeatureService + ?Sized,
    {
        let query = Query::field_equals(&self.id_field, id.as_str()).with_geometry(true);
        let mut features = service.query(&self.layer, &query).await?;

        if features.is_empty() {
            log::warn!("No record where {} = {}", self.id_field, id);
            return Err(TrackerError::NotFound {
                field: self.id_field.clone(),
                value: id.to_string(),
            });
        }
        if features.len() > 1 {
            log::warn!("{} records where {} = {}, using the first", features.len(), self.id_field, id);
        }

        let feature = features.swap_remove(0);
        let values = RecordValues::from_attributes(&feature.attributes, &self.whitelist);
        let object_id = values.object_id(&self.row_id_field).ok_or_else(|| {
            TrackerError::service(format!("record {} has no {}", id, self.row_id_field))
        })?;

        Ok(ProjectRecord {
            id: id.clone(),
            object_id,
            values,
            geometry: feature.geometry,
        })
    }

    /// Flatten a fetched record and its geometry into `namespace`,
    /// replacing what was there
    pub fn store(&self, session: &mut SessionContext, namespace: Namespace, record: &ProjectRecord) {
        log::info!("Loaded {} into '{}'", record.id, namespace.as_str());
        session.put_geometry(namespace.clone(), record.geometry.clone());
        session.put_record(namespace, record.values.clone());
    }

    /// Fetch and store in one step
    pub async fn load<S>(
        &self,
        service: &S,
        id: &ProjectId,
        session: &mut SessionContext,
        namespace: Namespace,
    ) -> TrackerResult<ProjectRecord>
    where
        S: FeatureService + ?Sized,
    {
        let record = self.fetch(service, id).await?;
        self.store(session, namespace, &record);
        Ok(record)
    }
}

/// All projects, sorted by display name for the selector
pub async fn list_projects<S>(service: &S, config: &AppConfig) -> TrackerResult<Vec<ProjectSummary>>
where
    S: FeatureService + ?Sized,
{
    let id_field = config.fields.id.to_lowercase();
    let name_field = config.fields.display_name.to_lowercase();
    let whitelist: BTreeSet<String> = [id_field.clone(), name_field.clone()].into_iter().collect();

    let query = Query::all().with_fields([id_field.clone(), name_field.clone()]);
    let features = service.query(&config.projects_layer, &query).await?;

    let mut projects: Vec<ProjectSummary> = features
        .iter()
        .filter_map(|feature| {
            let values = RecordValues::from_attributes(&feature.attributes, &whitelist);
            let id = values.get(&id_field).map(|v| v.display()).filter(|v| !v.is_empty())?;
            let name = values
                .get(&name_field)
                .map(|v| v.display())
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| id.clone());
            Some(ProjectSummary { id: ProjectId::new(id), name })
        })
        .collect();

    projects.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    log::debug!("{} projects listed", projects.len());
    Ok(projects)
}

/// Contents of the project selector
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProjectList {
    /// Request in flight
    #[default]
    Loading,
    Ready(Vec<ProjectSummary>),
    /// Request failed; the selector stays usable and offers a retry
    Failed(String),
}

impl ProjectList {
    pub fn from_result(result: &TrackerResult<Vec<ProjectSummary>>) -> Self {
        match result {
            Ok(projects) => ProjectList::Ready(projects.clone()),
            Err(err) => {
                log::warn!("Project list unavailable: {}", err);
                ProjectList::Failed(format!("Failed to load project list: {}", err))
            }
        }
    }

    pub fn projects(&self) -> &[ProjectSummary] {
        match self {
            ProjectList::Ready(projects) => projects,
            _ => &[],
        }
    }

    /// The selector accepts input once the request has finished either way
    pub fn selector_enabled(&self) -> bool {
        !matches!(self, ProjectList::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProjectList::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn remove(&mut self, id: &ProjectId) {
        if let ProjectList::Ready(projects) = self {
            projects.retain(|p| &p.id != id);
        }
    }
}
