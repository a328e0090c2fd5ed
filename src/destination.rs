use crate::event::{LogEvent, PARTITION_KEY_FIELD, STREAM_NAME_FIELD};

/// Resolves the target stream and partition key for an event.
///
/// Per-event override fields win when present and string-typed; anything
/// else falls through to the hook-level defaults.
#[derive(Debug, Clone)]
pub struct Destination {
    default_stream_name: String,
    default_partition_key: Option<String>,
}

impl Destination {
    pub fn new(
        default_stream_name: impl Into<String>,
        default_partition_key: Option<String>,
    ) -> Self {
        Destination {
            default_stream_name: default_stream_name.into(),
            default_partition_key,
        }
    }

    /// Stream (or delivery stream) name for this event.
    pub fn stream_name<'a>(&'a self, event: &'a LogEvent) -> &'a str {
        match event.fields.get(STREAM_NAME_FIELD).and_then(|v| v.as_str()) {
            Some(name) => name,
            None => &self.default_stream_name,
        }
    }

    /// Partition key for this event: per-event override, then the hook
    /// default, then the message text so identical messages shard together.
    pub fn partition_key<'a>(&'a self, event: &'a LogEvent) -> &'a str {
        if let Some(key) = event.fields.get(PARTITION_KEY_FIELD).and_then(|v| v.as_str()) {
            return key;
        }
        match &self.default_partition_key {
            Some(key) if !key.is_empty() => key,
            _ => &event.message,
        }
    }
}
