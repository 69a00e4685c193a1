//! Project Record
//!
//! A row of the projects layer: a GUID, a numeric row id and a flat
//! attribute mapping split into declared fields and an opaque remainder.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Service-local numeric row identifier
pub type ObjectId = i64;

/// Globally unique project identifier (a GUID string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scalar attribute value as stored by the feature service.
///
/// Dates are not a distinct variant: the service hands them out as
/// epoch-millisecond numbers or ISO strings, and the form binder decides
/// how to read them from the field's declared kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// Convert a JSON scalar. Arrays, objects and booleans are not scalars here.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(AttrValue::Null),
            Value::Number(n) => n.as_f64().map(AttrValue::Number),
            Value::String(s) => Some(AttrValue::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Number(n) => number_to_json(*n),
            AttrValue::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Text rendering used for display names and filters
    pub fn display(&self) -> String {
        match self {
            AttrValue::Null => String::new(),
            AttrValue::Number(n) => number_to_json(*n).to_string(),
            AttrValue::Text(s) => s.clone(),
        }
    }
}

/// Whole numbers go out as JSON integers so integer fields accept them.
pub(crate) fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Attribute mapping with lowercased keys.
///
/// Fields on the whitelist are typed; everything else is preserved as-is
/// and never interpreted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordValues {
    known: BTreeMap<String, AttrValue>,
    extra: Map<String, Value>,
}

impl RecordValues {
    pub fn from_attributes(attributes: &Map<String, Value>, whitelist: &BTreeSet<String>) -> Self {
        let mut values = Self::default();
        for (key, raw) in attributes {
            let key = key.to_lowercase();
            match AttrValue::from_json(raw) {
                Some(attr) if whitelist.contains(&key) => {
                    values.known.insert(key, attr);
                }
                _ => {
                    values.extra.insert(key, raw.clone());
                }
            }
        }
        values
    }

    pub fn get(&self, field: &str) -> Option<&AttrValue> {
        self.known.get(&field.to_lowercase())
    }

    pub fn set(&mut self, field: &str, value: AttrValue) {
        let key = field.to_lowercase();
        self.extra.remove(&key);
        self.known.insert(key, value);
    }

    pub fn known(&self) -> &BTreeMap<String, AttrValue> {
        &self.known
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Numeric row id, wherever it landed
    pub fn object_id(&self, row_id_field: &str) -> Option<ObjectId> {
        let key = row_id_field.to_lowercase();
        match self.known.get(&key) {
            Some(AttrValue::Number(n)) => Some(*n as ObjectId),
            Some(AttrValue::Text(s)) => s.trim().parse().ok(),
            Some(AttrValue::Null) => None,
            None => self.extra.get(&key).and_then(Value::as_i64),
        }
    }
}

/// A feature as returned by a query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
}

/// A loaded project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub object_id: ObjectId,
    pub values: RecordValues,
    pub geometry: Option<Value>,
}

/// Entry of the project selection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn whitelist(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_keys_are_lowercased_and_split() {
        let attrs = json!({
            "OBJECTID": 42,
            "Proj_Name": "Seward Hwy MP 5-10",
            "Shape__Length": 1234.5,
            "Flags": [1, 2]
        });
        let values = RecordValues::from_attributes(
            attrs.as_object().unwrap(),
            &whitelist(&["objectid", "proj_name"]),
        );

        assert_eq!(values.get("PROJ_NAME"), Some(&AttrValue::Text("Seward Hwy MP 5-10".into())));
        assert_eq!(values.object_id("OBJECTID"), Some(42));
        assert!(values.get("shape__length").is_none());
        assert_eq!(values.extra().get("shape__length"), Some(&json!(1234.5)));
        assert_eq!(values.extra().get("flags"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_object_id_from_opaque_remainder() {
        let attrs = json!({ "OBJECTID": 7 });
        let values = RecordValues::from_attributes(attrs.as_object().unwrap(), &BTreeSet::new());
        assert_eq!(values.object_id("objectid"), Some(7));
    }

    #[test]
    fn test_whole_numbers_serialize_as_integers() {
        assert_eq!(AttrValue::Number(5.0).to_json(), json!(5));
        assert_eq!(AttrValue::Number(2.5).to_json(), json!(2.5));
        assert_eq!(AttrValue::Number(5.0).display(), "5");
    }
}
