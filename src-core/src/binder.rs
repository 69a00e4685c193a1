//! Form Binder
//!
//! Two-way binding between a section's declared fields and the session:
//! render seeds widget values from the loaded record, capture stores
//! edits, submit turns them into an update payload.

use crate::domain::{
    AttrValue, FieldDescriptor, FieldKey, FieldValue, Namespace, SessionContext, SubmitResult,
    TrackerError, TrackerResult, UpdateOutcome, UpdatePayload,
};
use crate::repository::FeatureService;
use crate::sections::SectionSpec;

/// One input ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    pub descriptor: &'static FieldDescriptor,
    pub key: FieldKey,
    pub value: FieldValue,
    /// Value comes from an unsaved edit rather than the loaded record
    pub edited: bool,
}

/// Widget values for every field of `section`.
///
/// Pure: unsaved edits win, otherwise the stored value coerced to the
/// field's kind.
pub fn render(
    section: &'static SectionSpec,
    namespace: &Namespace,
    session: &SessionContext,
) -> Vec<RenderedField> {
    let record = session.record(namespace);
    section
        .fields
        .iter()
        .map(|descriptor| {
            let key = FieldKey::new(section.id, descriptor.name);
            match session.widget(&key) {
                Some(value) => RenderedField { descriptor, key, value: value.clone(), edited: true },
                None => RenderedField {
                    descriptor,
                    key,
                    value: descriptor.coerce(record.and_then(|r| r.get(descriptor.name))),
                    edited: false,
                },
            }
        })
        .collect()
}

/// Store a raw input string for one field. Returns false if nothing changed.
pub fn capture(
    section: &'static SectionSpec,
    namespace: &Namespace,
    session: &mut SessionContext,
    field: &str,
    raw: &str,
) -> bool {
    let Some(descriptor) = section.fields.iter().find(|f| f.name == field) else {
        log::warn!("{} has no field {}", section.id, field);
        return false;
    };
    let value = descriptor.parse_input(raw);
    let key = FieldKey::new(section.id, descriptor.name);

    let unchanged = match session.widget(&key) {
        Some(existing) => *existing == value,
        None => descriptor.coerce(session.record(namespace).and_then(|r| r.get(descriptor.name))) == value,
    };
    if unchanged {
        return false;
    }
    session.set_widget(key, value);
    true
}

/// Payload of exactly the section's fields plus the record's row id.
///
/// Edited fields carry the widget value. Untouched fields carry the stored
/// value as loaded, so values outside a field's kind or option set survive
/// a save of a neighbouring field.
pub fn build_payload(
    section: &'static SectionSpec,
    namespace: &Namespace,
    session: &SessionContext,
    row_id_field: &str,
) -> TrackerResult<UpdatePayload> {
    let object_id = session
        .record(namespace)
        .and_then(|r| r.object_id(row_id_field))
        .ok_or_else(|| TrackerError::NotFound {
            field: row_id_field.to_string(),
            value: format!("namespace '{}'", namespace.as_str()),
        })?;

    let record = session.record(namespace);
    let mut payload = UpdatePayload::new(row_id_field, object_id);
    for descriptor in section.fields {
        let key = FieldKey::new(section.id, descriptor.name);
        let value = match session.widget(&key) {
            Some(edited) => edited.to_json(),
            None => record
                .and_then(|r| r.get(descriptor.name))
                .map(AttrValue::to_json)
                .unwrap_or(serde_json::Value::Null),
        };
        payload.insert(descriptor.name, value);
    }
    Ok(payload)
}

/// Make a confirmed payload the authoritative local copy and leave edit mode
pub fn apply_success(
    section: &'static SectionSpec,
    namespace: &Namespace,
    session: &mut SessionContext,
    payload: &UpdatePayload,
) {
    if let Some(record) = session.record_mut(namespace) {
        for (field, value) in payload.attributes() {
            record.set(field, AttrValue::from_json(value).unwrap_or_default());
        }
    }
    session.discard_section(section.id);
}

/// Build, send and apply a section update.
///
/// The namespace only changes when the service confirms the update.
pub async fn on_submit<S>(
    service: &S,
    layer: &str,
    section: &'static SectionSpec,
    namespace: &Namespace,
    session: &mut SessionContext,
    row_id_field: &str,
) -> SubmitResult
where
    S: FeatureService + ?Sized,
{
    let payload = match build_payload(section, namespace, session, row_id_field) {
        Ok(payload) => payload,
        Err(err) => return SubmitResult::failed(err.to_string()),
    };
    let result = submit_result(section, service.update(layer, &payload).await);
    if result.success {
        apply_success(section, namespace, session, &payload);
    }
    result
}

/// Tag a service response as success or failure with a readable message
pub fn submit_result(
    section: &SectionSpec,
    response: TrackerResult<UpdateOutcome>,
) -> SubmitResult {
    match response {
        Ok(outcome) if outcome.success => {
            log::info!("{} saved", section.id);
            SubmitResult::ok(format!("{} saved", section.title))
        }
        Ok(outcome) => {
            log::warn!("{} rejected: {}", section.id, outcome.message);
            SubmitResult::failed(format!("{} not saved: {}", section.title, outcome.message))
        }
        Err(err) => {
            log::warn!("{} failed: {}", section.id, err);
            SubmitResult::failed(format!("{} not saved: {}", section.title, err))
        }
    }
}
