//! In-Memory Feature Service
//!
//! Test double holding features in a Vec. Understands `1=1` and
//! `field = 'value'` filters. Update responses can be scripted with raw
//! service bodies so the wire rules are exercised end to end.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::traits::{FeatureService, Query, Token};
use super::wire;
use crate::domain::{Feature, ObjectId, TrackerError, TrackerResult, UpdateOutcome, UpdatePayload};

#[derive(Default)]
pub(crate) struct InMemoryFeatureService {
    pub features: RefCell<Vec<Feature>>,
    pub row_id_field: String,
    pub reject_credentials: bool,
    /// Body returned by the next update instead of applying it
    pub scripted_update: RefCell<Option<Value>>,
    pub auth_calls: Cell<u32>,
    pub query_calls: Cell<u32>,
    pub last_payload: RefCell<Option<UpdatePayload>>,
}

impl InMemoryFeatureService {
    pub fn with_features(features: Vec<Value>) -> Self {
        Self {
            features: RefCell::new(
                features
                    .into_iter()
                    .map(|attrs| Feature {
                        attributes: attrs.as_object().cloned().unwrap_or_default(),
                        geometry: None,
                    })
                    .collect(),
            ),
            row_id_field: "objectid".to_string(),
            ..Default::default()
        }
    }

    /// Attach a geometry to the stored feature with the given row id
    pub fn set_geometry(&self, object_id: ObjectId, geometry: Value) {
        let row_id_field = self.row_id_field.clone();
        if let Some(feature) = self
            .features
            .borrow_mut()
            .iter_mut()
            .find(|f| row_id(f, &row_id_field) == Some(object_id))
        {
            feature.geometry = Some(geometry);
        }
    }

    pub fn script_update(&self, body: Value) {
        *self.scripted_update.borrow_mut() = Some(body);
    }

    /// Attribute of the stored feature with the given row id
    pub fn stored(&self, object_id: ObjectId, field: &str) -> Option<Value> {
        self.features
            .borrow()
            .iter()
            .find(|f| row_id(f, &self.row_id_field) == Some(object_id))
            .and_then(|f| lookup(f, field).cloned())
    }

    fn matches(feature: &Feature, filter: &str) -> bool {
        if filter.trim() == "1=1" {
            return true;
        }
        let Some((field, literal)) = filter.split_once(" = ") else {
            return false;
        };
        let expected = literal.trim().trim_matches('\'').replace("''", "'");
        lookup(feature, field.trim()).and_then(Value::as_str) == Some(expected.as_str())
    }
}

fn lookup<'a>(feature: &'a Feature, field: &str) -> Option<&'a Value> {
    feature
        .attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(field))
        .map(|(_, v)| v)
}

fn row_id(feature: &Feature, row_id_field: &str) -> Option<ObjectId> {
    lookup(feature, row_id_field).and_then(Value::as_i64)
}

#[async_trait(?Send)]
impl FeatureService for InMemoryFeatureService {
    async fn authenticate(&self) -> TrackerResult<Token> {
        self.auth_calls.set(self.auth_calls.get() + 1);
        if self.reject_credentials {
            return Err(TrackerError::Auth("Invalid username or password.".to_string()));
        }
        Ok(Token { value: format!("token-{}", self.auth_calls.get()), expires_at: None })
    }

    async fn query(&self, _layer: &str, query: &Query) -> TrackerResult<Vec<Feature>> {
        self.authenticate().await?;
        self.query_calls.set(self.query_calls.get() + 1);
        Ok(self
            .features
            .borrow()
            .iter()
            .filter(|f| Self::matches(f, &query.filter))
            .map(|f| Feature {
                attributes: f.attributes.clone(),
                geometry: f.geometry.clone().filter(|_| query.include_geometry),
            })
            .collect())
    }

    async fn update(&self, _layer: &str, payload: &UpdatePayload) -> TrackerResult<UpdateOutcome> {
        self.authenticate().await?;
        *self.last_payload.borrow_mut() = Some(payload.clone());

        if let Some(body) = self.scripted_update.borrow_mut().take() {
            return wire::parse_update(body);
        }

        let mut features = self.features.borrow_mut();
        let Some(feature) = features
            .iter_mut()
            .find(|f| row_id(f, &self.row_id_field) == Some(payload.object_id()))
        else {
            return wire::parse_update(json!({
                "updateResults": [{
                    "objectId": payload.object_id(),
                    "success": false,
                    "error": { "code": 1019, "description": "Object is missing." }
                }]
            }));
        };
        for (field, value) in payload.attributes() {
            feature.attributes.retain(|k, _| !k.eq_ignore_ascii_case(field));
            feature.attributes.insert(field.clone(), value.clone());
        }
        wire::parse_update(json!({ "updateResults": [{ "objectId": payload.object_id(), "success": true }] }))
    }

    async fn delete(&self, _layer: &str, object_id: ObjectId) -> TrackerResult<bool> {
        self.authenticate().await?;
        let mut features = self.features.borrow_mut();
        let before = features.len();
        features.retain(|f| row_id(f, &self.row_id_field) != Some(object_id));
        Ok(features.len() < before)
    }
}
