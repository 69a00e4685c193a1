//! REST Feature Service
//!
//! `FeatureService` over HTTP with `reqwest`. Requests are form-encoded
//! POSTs with `f=json`; every operation fetches its own token first.

use async_trait::async_trait;
use serde_json::Value;

use super::traits::{FeatureService, Query, Token, WGS84_WKID};
use super::wire;
use crate::config::{AppConfig, Credentials};
use crate::domain::{Feature, ObjectId, TrackerError, TrackerResult, UpdateOutcome, UpdatePayload};

/// HTTP client for an ArcGIS-style feature service
#[derive(Clone)]
pub struct RestFeatureService {
    client: reqwest::Client,
    token_url: String,
    referer: String,
    token_minutes: u32,
    credentials: Credentials,
}

impl RestFeatureService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: config.token_url(),
            referer: config.referer.clone(),
            token_minutes: config.token_expiration_minutes,
            credentials: config.credentials.clone(),
        }
    }

    /// POST a form and return the JSON body of a 2xx response
    async fn post_form(&self, url: &str, form: &[(&str, String)]) -> TrackerResult<Value> {
        let response = self.client.post(url).form(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Service {
                code: Some(i64::from(status.as_u16())),
                message: format!("HTTP {} from {}", status, url),
            });
        }
        Ok(response.json::<Value>().await?)
    }

    fn endpoint(layer: &str, operation: &str) -> String {
        format!("{}/{}", layer.trim_end_matches('/'), operation)
    }
}

#[async_trait(?Send)]
impl FeatureService for RestFeatureService {
    async fn authenticate(&self) -> TrackerResult<Token> {
        if !self.credentials.is_complete() {
            return Err(TrackerError::Auth("no credentials configured".to_string()));
        }

        let form = [
            ("username", self.credentials.username.clone()),
            ("password", self.credentials.password.clone()),
            ("client", "referer".to_string()),
            ("referer", self.referer.clone()),
            ("expiration", self.token_minutes.to_string()),
            ("f", "json".to_string()),
        ];
        let body = self.post_form(&self.token_url, &form).await.map_err(|err| {
            log::error!("Token request failed: {}", err);
            TrackerError::Auth(err.to_string())
        })?;
        wire::parse_token(&body).inspect_err(|err| log::error!("{}", err))
    }

    async fn query(&self, layer: &str, query: &Query) -> TrackerResult<Vec<Feature>> {
        let token = self.authenticate().await?;
        log::debug!("query {} where {}", layer, query.filter);

        let body = self.post_form(&Self::endpoint(layer, "query"), &query_form(query, token.value)).await?;
        wire::parse_query(body)
    }

    async fn update(&self, layer: &str, payload: &UpdatePayload) -> TrackerResult<UpdateOutcome> {
        let token = self.authenticate().await?;
        log::debug!("updateFeatures {} objectid {}", layer, payload.object_id());

        let form = [
            ("features", payload.to_features_json().to_string()),
            ("f", "json".to_string()),
            ("token", token.value),
        ];
        let body = self.post_form(&Self::endpoint(layer, "updateFeatures"), &form).await?;
        wire::parse_update(body)
    }

    async fn delete(&self, layer: &str, object_id: ObjectId) -> TrackerResult<bool> {
        let token = self.authenticate().await?;
        log::debug!("deleteFeatures {} objectid {}", layer, object_id);

        let form = [
            ("objectIds", object_id.to_string()),
            ("f", "json".to_string()),
            ("token", token.value),
        ];
        let body = self.post_form(&Self::endpoint(layer, "deleteFeatures"), &form).await?;
        wire::parse_delete(body)
    }
}

/// Form fields of a query; geometry comes back in WGS84
fn query_form(query: &Query, token: String) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("where", query.filter.clone()),
        ("outFields", query.out_fields()),
        ("returnGeometry", query.include_geometry.to_string()),
    ];
    if query.include_geometry {
        form.push(("outSR", WGS84_WKID.to_string()));
    }
    form.push(("f", "json".to_string()));
    form.push(("token", token));
    form
}
