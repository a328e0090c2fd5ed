use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::event::{FieldValue, LogEvent, MESSAGE_FIELD};

/// Per-field transform applied to a dynamically-typed value before
/// serialization. Receives the attached value, returns the value to
/// serialize in its place.
pub type FilterFn = Arc<dyn Fn(FieldValue) -> FieldValue + Send + Sync>;

/// Turns an event's attached fields into the JSON payload.
///
/// Per field, precedence is fixed: an ignored name is dropped outright,
/// beating any registered filter; a filtered name serializes the filter's
/// return value; everything else goes through the default coercion of
/// [`FieldValue`].
#[derive(Clone, Default)]
pub struct FieldTransform {
    ignored: HashSet<String>,
    filters: HashMap<String, FilterFn>,
}

impl FieldTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop this field from every payload.
    pub fn add_ignore(&mut self, name: impl Into<String>) {
        self.ignored.insert(name.into());
    }

    /// Replace this field's value with the filter's return value.
    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    /// Serialize the event's fields as a UTF-8 JSON object.
    ///
    /// When no field carries the reserved `"message"` name, one is
    /// synthesized from the event's message text so the payload always
    /// holds the human-readable line. No trailing delimiter is added here;
    /// framing belongs to the individual writers.
    ///
    /// A serialization failure degrades to an empty payload instead of an
    /// error.
    pub fn transform(&self, event: &LogEvent) -> Vec<u8> {
        let mut out = Map::new();
        for (name, value) in &event.fields {
            if self.ignored.contains(name) {
                continue;
            }
            let coerced = match self.filters.get(name) {
                Some(filter) => filter(value.clone()).coerce(),
                None => value.coerce(),
            };
            out.insert(name.clone(), coerced);
        }

        if !out.contains_key(MESSAGE_FIELD) {
            out.insert(
                MESSAGE_FIELD.to_string(),
                Value::String(event.message.clone()),
            );
        }

        serde_json::to_vec(&Value::Object(out)).unwrap_or_default()
    }
}

impl fmt::Debug for FieldTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTransform")
            .field("ignored", &self.ignored)
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn parse(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn synthesizes_message_field_when_absent() {
        let transform = FieldTransform::new();
        let event = LogEvent::new(Level::ERROR, "boot failed").with_field("code", 7i64);

        let payload = parse(&transform.transform(&event));
        assert_eq!(payload["message"], "boot failed");
        assert_eq!(payload["code"], 7);
    }

    #[test]
    fn existing_message_field_wins() {
        let transform = FieldTransform::new();
        let event = LogEvent::new(Level::ERROR, "boot failed").with_field("message", "custom");

        let payload = parse(&transform.transform(&event));
        assert_eq!(payload["message"], "custom");
    }

    #[test]
    fn ignore_beats_filter() {
        let mut transform = FieldTransform::new();
        transform.add_ignore("password");
        transform.add_filter("password", |_| FieldValue::from("****"));

        let event = LogEvent::new(Level::WARN, "login").with_field("password", "hunter2");
        let payload = parse(&transform.transform(&event));
        assert!(payload.get("password").is_none());
    }

    #[test]
    fn filter_replaces_value() {
        let mut transform = FieldTransform::new();
        transform.add_filter("user_id", |_| FieldValue::from("redacted"));

        let event = LogEvent::new(Level::INFO, "login").with_field("user_id", 12345i64);
        let payload = parse(&transform.transform(&event));
        assert_eq!(payload["user_id"], "redacted");
    }

    #[test]
    fn default_coercion_renders_errors_and_display_values() {
        let transform = FieldTransform::new();
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "timed out");
        let event = LogEvent::new(Level::ERROR, "request failed")
            .with_field("cause", FieldValue::error(io_err))
            .with_field("peer", FieldValue::display(std::net::Ipv4Addr::new(10, 0, 0, 1)));

        let payload = parse(&transform.transform(&event));
        assert_eq!(payload["cause"], "timed out");
        assert_eq!(payload["peer"], "10.0.0.1");
    }

    #[test]
    fn output_carries_no_trailing_delimiter() {
        let transform = FieldTransform::new();
        let event = LogEvent::new(Level::INFO, "plain");
        let bytes = transform.transform(&event);
        assert_eq!(*bytes.last().unwrap(), b'}');
    }
}
