//! Project Commands
//!
//! List, load, update and delete projects on the feature service.

use tracker_core::domain::{ObjectId, ProjectRecord, UpdateOutcome, UpdatePayload};
use tracker_core::{FeatureService, RecordLoader, RestFeatureService};

use crate::models::{AppConfig, ProjectId, ProjectSummary, TrackerResult};

pub async fn list_projects(config: &AppConfig) -> TrackerResult<Vec<ProjectSummary>> {
    let service = RestFeatureService::new(config);
    tracker_core::list_projects(&service, config).await
}

pub async fn fetch_project(config: &AppConfig, id: &ProjectId) -> TrackerResult<ProjectRecord> {
    let service = RestFeatureService::new(config);
    RecordLoader::for_projects(config).fetch(&service, id).await
}

pub async fn update_project(config: &AppConfig, payload: &UpdatePayload) -> TrackerResult<UpdateOutcome> {
    let service = RestFeatureService::new(config);
    service.update(&config.projects_layer, payload).await
}

pub async fn delete_project(config: &AppConfig, object_id: ObjectId) -> TrackerResult<bool> {
    let service = RestFeatureService::new(config);
    service.delete(&config.projects_layer, object_id).await
}
