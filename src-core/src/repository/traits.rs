//! Repository Layer - Core Traits
//!
//! The abstract interface to a feature service.
//! `RestFeatureService` talks HTTP; tests use an in-memory implementation.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Feature, ObjectId, TrackerResult, UpdateOutcome, UpdatePayload};

/// Short-lived access token. Obtained per call, never reused.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Spatial reference requested for returned geometry
pub const WGS84_WKID: u32 = 4326;

/// Parameters of a layer query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SQL-92 where clause
    pub filter: String,
    /// Requested fields, empty means all
    pub fields: Vec<String>,
    pub include_geometry: bool,
}

impl Query {
    pub fn new(filter: impl Into<String>) -> Self {
        Self { filter: filter.into(), fields: Vec::new(), include_geometry: false }
    }

    /// `field = 'value'` with the literal escaped
    pub fn field_equals(field: &str, value: &str) -> Self {
        Self::new(format!("{} = {}", field, quote_literal(value)))
    }

    pub fn all() -> Self {
        Self::new("1=1")
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_geometry(mut self, include: bool) -> Self {
        self.include_geometry = include;
        self
    }

    /// Value of the `outFields` parameter
    pub fn out_fields(&self) -> String {
        if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(",")
        }
    }
}

/// Quote a string literal for a where clause
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Feature-service operations.
///
/// Every operation authenticates on its own; there is no retry and no
/// token reuse. A non-200 response or a reported error object is a
/// `TrackerError::Service`.
#[async_trait(?Send)]
pub trait FeatureService {
    /// Obtain a fresh token
    async fn authenticate(&self) -> TrackerResult<Token>;

    /// Query features of a layer
    async fn query(&self, layer: &str, query: &Query) -> TrackerResult<Vec<Feature>>;

    /// Update a single record
    async fn update(&self, layer: &str, payload: &UpdatePayload) -> TrackerResult<UpdateOutcome>;

    /// Delete a record by row id, true if the service confirmed it
    async fn delete(&self, layer: &str, object_id: ObjectId) -> TrackerResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_are_escaped() {
        assert_eq!(quote_literal("O'Malley Rd"), "'O''Malley Rd'");
        assert_eq!(Query::field_equals("globalid", "{ABC}").filter, "globalid = '{ABC}'");
    }

    #[test]
    fn test_out_fields() {
        assert_eq!(Query::all().out_fields(), "*");
        assert_eq!(Query::all().with_fields(["globalid", "proj_name"]).out_fields(), "globalid,proj_name");
    }
}
