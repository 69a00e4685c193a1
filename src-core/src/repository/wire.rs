//! Wire Format
//!
//! Normalizes feature-service JSON responses. Kept free of HTTP so the
//! rules can be tested against captured bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::traits::Token;
use crate::domain::{Feature, ObjectId, TrackerError, TrackerResult, UpdateOutcome};

/// Error object as the service reports it
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    details: Vec<String>,
}

impl ErrorBody {
    fn text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(m) = self.message.as_deref().or(self.description.as_deref()) {
            parts.push(m);
        }
        parts.extend(self.details.iter().map(String::as_str).filter(|d| !d.is_empty()));
        if parts.is_empty() {
            "Unknown error".to_string()
        } else {
            parts.join(" ")
        }
    }
}

fn error_body(value: &Value) -> Option<ErrorBody> {
    value
        .get("error")
        .filter(|e| !e.is_null())
        .map(|e| serde_json::from_value(e.clone()).unwrap_or_default())
}

/// Top-level `error` object, if the response carries one
pub(crate) fn service_error(body: &Value) -> Option<TrackerError> {
    error_body(body).map(|err| TrackerError::Service {
        code: err.code,
        message: err.text(),
    })
}

pub(crate) fn parse_token(body: &Value) -> TrackerResult<Token> {
    if let Some(err) = error_body(body) {
        return Err(TrackerError::Auth(err.text()));
    }
    let value = body
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TrackerError::Auth("token endpoint returned no token".to_string()))?;
    let expires_at = body
        .get("expires")
        .and_then(Value::as_i64)
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    Ok(Token { value: value.to_string(), expires_at })
}

pub(crate) fn parse_query(body: Value) -> TrackerResult<Vec<Feature>> {
    if let Some(err) = service_error(&body) {
        return Err(err);
    }
    match body.get("features") {
        Some(features) => Ok(serde_json::from_value(features.clone())?),
        None => Err(TrackerError::service("query response has no features")),
    }
}

/// One entry of `updateResults` / `deleteResults`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditResult {
    #[serde(default)]
    object_id: Option<ObjectId>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<ErrorBody>,
}

impl EditResult {
    fn failure_text(&self) -> String {
        match &self.error {
            Some(err) => match err.code {
                Some(code) => format!("{} (code {})", err.text(), code),
                None => err.text(),
            },
            None => "Edit rejected".to_string(),
        }
    }
}

fn edit_results(body: &Value, key: &str) -> TrackerResult<Vec<EditResult>> {
    match body.get(key) {
        Some(results) => Ok(serde_json::from_value(results.clone())?),
        // Some endpoints answer a single edit with a bare result object
        None if body.get("success").is_some() => Ok(vec![serde_json::from_value(body.clone())?]),
        None => Err(TrackerError::service(format!("edit response has no {}", key))),
    }
}

pub(crate) fn parse_update(body: Value) -> TrackerResult<UpdateOutcome> {
    // A top-level error without a success flag is a request-level failure
    if body.get("success").is_none() {
        if let Some(err) = service_error(&body) {
            return Err(err);
        }
    }

    let results = edit_results(&body, "updateResults")?;
    let failures: Vec<String> = results
        .iter()
        .filter(|r| !r.success)
        .map(EditResult::failure_text)
        .collect();
    let ids: Vec<ObjectId> = results
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| r.object_id)
        .collect();

    if results.is_empty() {
        return Ok(UpdateOutcome {
            success: false,
            message: "Service reported no update results".to_string(),
            ids,
        });
    }

    if failures.is_empty() {
        Ok(UpdateOutcome {
            success: true,
            message: format!("Updated {} record(s)", results.len()),
            ids,
        })
    } else {
        Ok(UpdateOutcome { success: false, message: failures.join("; "), ids })
    }
}

pub(crate) fn parse_delete(body: Value) -> TrackerResult<bool> {
    if let Some(err) = service_error(&body) {
        return Err(err);
    }
    let results = edit_results(&body, "deleteResults")?;
    Ok(!results.is_empty() && results.iter().all(|r| r.success))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_ok_and_rejected() {
        let token = parse_token(&json!({ "token": "abc", "expires": 1_715_904_000_000i64, "ssl": true })).unwrap();
        assert_eq!(token.value, "abc");
        assert!(token.expires_at.is_some());

        let err = parse_token(&json!({
            "error": { "code": 400, "message": "Unable to generate token.", "details": ["Invalid username or password."] }
        }))
        .unwrap_err();
        match err {
            TrackerError::Auth(msg) => assert!(msg.contains("Invalid username or password.")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_query_error_carries_upstream_message() {
        let err = parse_query(json!({ "error": { "code": 400, "message": "Invalid query", "details": [] } })).unwrap_err();
        assert_eq!(err, TrackerError::Service { code: Some(400), message: "Invalid query".into() });
    }

    #[test]
    fn test_query_features() {
        let features = parse_query(json!({
            "objectIdFieldName": "OBJECTID",
            "features": [
                { "attributes": { "OBJECTID": 1, "GlobalID": "{A}" }, "geometry": { "x": 1.0, "y": 2.0 } },
                { "attributes": { "OBJECTID": 2, "GlobalID": "{B}" } }
            ]
        }))
        .unwrap();
        assert_eq!(features.len(), 2);
        assert!(features[0].geometry.is_some());
        assert!(features[1].geometry.is_none());
    }

    #[test]
    fn test_update_success() {
        let outcome = parse_update(json!({ "updateResults": [{ "objectId": 12, "success": true }] })).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.ids, vec![12]);
    }

    #[test]
    fn test_update_record_failure_is_an_outcome() {
        let outcome = parse_update(json!({
            "updateResults": [{ "objectId": 12, "success": false, "error": { "code": 400, "description": "Invalid field" } }]
        }))
        .unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid field"));
        assert!(outcome.ids.is_empty());
    }

    #[test]
    fn test_update_bare_result_object() {
        let outcome = parse_update(json!({ "success": false, "error": { "code": 400, "description": "Invalid field" } })).unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid field"));
    }

    #[test]
    fn test_update_request_level_error() {
        let err = parse_update(json!({ "error": { "code": 498, "message": "Invalid token." } })).unwrap_err();
        assert!(matches!(err, TrackerError::Service { code: Some(498), .. }));
    }

    #[test]
    fn test_delete_requires_every_result() {
        assert!(parse_delete(json!({ "deleteResults": [{ "objectId": 3, "success": true }] })).unwrap());
        assert!(!parse_delete(json!({ "deleteResults": [] })).unwrap());
        assert!(!parse_delete(json!({ "deleteResults": [{ "objectId": 3, "success": false }] })).unwrap());
    }
}
