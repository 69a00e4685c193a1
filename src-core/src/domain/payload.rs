//! Update Payload and Outcomes
//!
//! What goes out on submit and what comes back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::record::ObjectId;

/// Attribute delta for a single record.
///
/// Built fresh from the widget values of one section right before the
/// request and dropped once it completes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePayload {
    row_id_field: String,
    object_id: ObjectId,
    attributes: BTreeMap<String, Value>,
}

impl UpdatePayload {
    pub fn new(row_id_field: &str, object_id: ObjectId) -> Self {
        Self {
            row_id_field: row_id_field.to_lowercase(),
            object_id,
            attributes: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.attributes.insert(field.to_lowercase(), value);
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Every key that goes over the wire, row id included
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.attributes.keys().cloned().collect();
        if !self.attributes.contains_key(&self.row_id_field) {
            keys.push(self.row_id_field.clone());
            keys.sort();
        }
        keys
    }

    /// `features` parameter of an updateFeatures request
    pub fn to_features_json(&self) -> Value {
        let mut attributes: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        attributes.insert(self.row_id_field.clone(), Value::from(self.object_id));
        json!([{ "attributes": attributes }])
    }
}

/// Normalized result of an update call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
    /// Row ids the service reported as updated
    pub ids: Vec<ObjectId>,
}

/// What a section submit reports back to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub success: bool,
    pub message: String,
}

impl SubmitResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}
