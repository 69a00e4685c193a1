//! Field Descriptors
//!
//! Declarative description of one form input plus the coercion rules that
//! turn stored attributes into widget values and back.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::record::{number_to_json, AttrValue};

/// Input widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Single-line text
    Text,
    /// Multi-line text
    LongText,
    /// One value out of a fixed option set
    Select,
    Number,
    /// Calendar date, stored remotely as epoch milliseconds
    Date,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::LongText => "long-text",
            WidgetKind::Select => "single-select",
            WidgetKind::Number => "number",
            WidgetKind::Date => "date",
        }
    }
}

/// Static description of one input field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Attribute name in the feature service (lowercase)
    pub name: &'static str,
    /// Display label
    pub label: &'static str,
    pub kind: WidgetKind,
    /// Fixed option set, only meaningful for `Select`
    pub options: &'static [&'static str],
}

impl FieldDescriptor {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: WidgetKind::Text, options: &[] }
    }

    pub const fn long_text(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: WidgetKind::LongText, options: &[] }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: WidgetKind::Number, options: &[] }
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: WidgetKind::Date, options: &[] }
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self { name, label, kind: WidgetKind::Select, options }
    }

    /// Value shown when nothing is stored
    pub fn empty_value(&self) -> FieldValue {
        match self.kind {
            WidgetKind::Text | WidgetKind::LongText => FieldValue::Text(String::new()),
            WidgetKind::Number => FieldValue::Number(0.0),
            WidgetKind::Date => FieldValue::Date(None),
            WidgetKind::Select => FieldValue::Choice(None),
        }
    }

    /// Turn a stored attribute into a widget value.
    ///
    /// Never fails: anything unreadable becomes the empty value.
    pub fn coerce(&self, stored: Option<&AttrValue>) -> FieldValue {
        let stored = match stored {
            None | Some(AttrValue::Null) => return self.empty_value(),
            Some(value) => value,
        };

        let coerced = match self.kind {
            WidgetKind::Text | WidgetKind::LongText => Ok(FieldValue::Text(stored.display())),
            WidgetKind::Number => parse_number(stored).map(FieldValue::Number),
            WidgetKind::Date => parse_date(stored).map(|d| FieldValue::Date(Some(d))),
            WidgetKind::Select => self.match_option(&stored.display()).map(FieldValue::Choice),
        };

        coerced.unwrap_or_else(|err| {
            log::debug!("{}: {}, using empty value", self.name, err);
            self.empty_value()
        })
    }

    /// Read a raw string coming back from an input element
    pub fn parse_input(&self, raw: &str) -> FieldValue {
        if raw.trim().is_empty() {
            return self.empty_value();
        }
        self.coerce(Some(&AttrValue::Text(raw.to_string())))
    }

    fn match_option(&self, raw: &str) -> Result<Option<String>, ParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        self.options
            .iter()
            .find(|opt| **opt == raw)
            .map(|opt| Some(opt.to_string()))
            .ok_or_else(|| ParseError::new(raw, "option"))
    }
}

/// Typed widget value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(Option<NaiveDate>),
    Choice(Option<String>),
}

impl FieldValue {
    /// Representation sent to the feature service
    pub fn to_json(&self) -> Value {
        self.to_attr().to_json()
    }

    /// Representation stored back into the session after a successful update
    pub fn to_attr(&self) -> AttrValue {
        match self {
            FieldValue::Text(s) if s.is_empty() => AttrValue::Null,
            FieldValue::Text(s) => AttrValue::Text(s.clone()),
            FieldValue::Number(n) => AttrValue::Number(*n),
            FieldValue::Date(Some(d)) => AttrValue::Number(date_to_epoch_millis(*d) as f64),
            FieldValue::Date(None) => AttrValue::Null,
            FieldValue::Choice(Some(c)) => AttrValue::Text(c.clone()),
            FieldValue::Choice(None) => AttrValue::Null,
        }
    }

    /// String for an HTML input's `value`
    pub fn as_input_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => number_to_json(*n).to_string(),
            FieldValue::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Date(None) => String::new(),
            FieldValue::Choice(c) => c.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Error)]
#[error("cannot read {raw:?} as {expected}")]
struct ParseError {
    raw: String,
    expected: &'static str,
}

impl ParseError {
    fn new(raw: impl Into<String>, expected: &'static str) -> Self {
        Self { raw: raw.into(), expected }
    }
}

fn parse_number(value: &AttrValue) -> Result<f64, ParseError> {
    let n = match value {
        AttrValue::Number(n) => *n,
        AttrValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::new(s.as_str(), "number"))?,
        AttrValue::Null => 0.0,
    };
    if n.is_finite() {
        Ok(n)
    } else {
        Err(ParseError::new(value.display(), "number"))
    }
}

fn parse_date(value: &AttrValue) -> Result<NaiveDate, ParseError> {
    match value {
        AttrValue::Number(ms) => date_from_epoch_millis(*ms as i64),
        AttrValue::Text(s) => parse_date_str(s.trim()),
        AttrValue::Null => Err(ParseError::new("", "date")),
    }
}

fn parse_date_str(raw: &str) -> Result<NaiveDate, ParseError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }
    match raw.parse::<i64>() {
        Ok(ms) => date_from_epoch_millis(ms),
        Err(_) => Err(ParseError::new(raw, "date")),
    }
}

fn date_from_epoch_millis(ms: i64) -> Result<NaiveDate, ParseError> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| ParseError::new(ms.to_string(), "date"))
}

fn date_to_epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
