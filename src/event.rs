use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::Level;

/// Reserved field name selecting the destination stream for a single event.
pub const STREAM_NAME_FIELD: &str = "stream_name";

/// Reserved field name selecting the partition key for a single event.
pub const PARTITION_KEY_FIELD: &str = "partition_key";

/// Field name carrying the human-readable message text in the payload.
pub const MESSAGE_FIELD: &str = "message";

/// Severities a hook reacts to unless configured otherwise.
pub fn default_levels() -> Vec<Level> {
    vec![Level::ERROR, Level::WARN, Level::INFO]
}

/// A dynamically-typed field value attached to a [`LogEvent`].
///
/// Values fall into three classes, mirroring how they are coerced into the
/// serialized payload: JSON-native values pass through as-is, error values
/// are rendered via their description, and anything else string-renderable
/// is rendered via `Display`.
#[derive(Clone)]
pub enum FieldValue {
    /// A value that serializes to JSON natively.
    Json(Value),
    /// An error value, coerced to its textual description.
    Error(Arc<dyn std::error::Error + Send + Sync>),
    /// A string-renderable value, coerced via its `Display` impl.
    Display(Arc<dyn fmt::Display + Send + Sync>),
}

impl FieldValue {
    /// Capture any `Serialize` value as a JSON field value.
    ///
    /// A value the generic encoder cannot represent degrades to JSON `null`
    /// instead of surfacing an error; see [`crate::transform`] for the same
    /// policy at payload level.
    pub fn serialized<T: Serialize>(value: T) -> Self {
        FieldValue::Json(serde_json::to_value(value).unwrap_or(Value::Null))
    }

    /// Capture an error value.
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FieldValue::Error(Arc::new(err))
    }

    /// Capture a value rendered through its `Display` impl.
    pub fn display<D>(value: D) -> Self
    where
        D: fmt::Display + Send + Sync + 'static,
    {
        FieldValue::Display(Arc::new(value))
    }

    /// Default coercion into a JSON value.
    pub(crate) fn coerce(&self) -> Value {
        match self {
            FieldValue::Json(v) => v.clone(),
            FieldValue::Error(e) => Value::String(e.to_string()),
            FieldValue::Display(d) => Value::String(d.to_string()),
        }
    }

    /// The string content, if this is a JSON string value.
    ///
    /// Reserved override fields only take effect when string-typed; every
    /// other shape falls through to the hook defaults.
    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Json(v) => write!(f, "Json({v})"),
            FieldValue::Error(e) => write!(f, "Error({e})"),
            FieldValue::Display(d) => write!(f, "Display({d})"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Json(Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Json(Value::String(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

/// A single log event handed to the hook, either directly or through the
/// `tracing` layer adapter.
///
/// Events are transient, one per logging call. `Clone` exists so the
/// asynchronous dispatch path can capture an owned copy before returning
/// control to the caller.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogEvent {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a field, builder-style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attach a field in place.
    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn serialized_absorbs_encoder_failure_as_null() {
        // Non-string map keys are not representable in JSON; the value
        // degrades to null instead of erroring.
        let bad: HashMap<(u8, u8), i32> = HashMap::from([((1, 2), 3)]);
        let value = FieldValue::serialized(bad);
        assert!(matches!(value, FieldValue::Json(Value::Null)));
    }

    #[test]
    fn error_values_coerce_to_description() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let value = FieldValue::error(err);
        assert_eq!(value.coerce(), Value::String("disk on fire".to_string()));
    }

    #[test]
    fn only_string_values_act_as_overrides() {
        assert_eq!(FieldValue::from("shard-1").as_str(), Some("shard-1"));
        assert_eq!(FieldValue::from(42i64).as_str(), None);
        assert_eq!(FieldValue::display(42).as_str(), None);
    }
}
