use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::runtime::Handle;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::event::{FieldValue, LogEvent, MESSAGE_FIELD};
use crate::hook::KinesisHook;

/// `tracing_subscriber` layer that forwards matching events to a
/// [`KinesisHook`].
///
/// The layer consults [`KinesisHook::levels`] per event, converts the
/// `tracing` fields into a [`LogEvent`] and hands it to a task spawned on
/// the current Tokio runtime; `on_event` cannot block on network I/O, so
/// dispatch through the layer always rides the detached path. Events
/// observed while no runtime is available are dropped with a stderr notice.
pub struct HookLayer {
    hook: Arc<KinesisHook>,
}

impl HookLayer {
    pub fn new(hook: Arc<KinesisHook>) -> Self {
        HookLayer { hook }
    }
}

impl<S> Layer<S> for HookLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if !self.hook.levels().contains(meta.level()) {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut log_event = LogEvent::new(*meta.level(), message.unwrap_or_default());
        log_event.fields = fields;
        log_event.insert_field("level", meta.level().to_string());
        log_event.insert_field("target", meta.target().to_string());
        log_event.insert_field("timestamp", Utc::now().to_rfc3339());

        let hook = Arc::clone(&self.hook);
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = hook.fire(&log_event).await {
                        eprintln!("kinesis hook: dispatch failed: {e}");
                    }
                });
            }
            Err(_) => eprintln!("kinesis hook: no tokio runtime, dropping log event"),
        }
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, FieldValue>,
    pub message: &'a mut Option<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            *self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), FieldValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields
                .insert(field.name().to_string(), FieldValue::from(format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HookConfig;
    use crate::error::HookError;
    use crate::writer::RecordWriter;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    struct CollectingWriter {
        seen: Mutex<Vec<LogEvent>>,
    }

    #[async_trait]
    impl RecordWriter for CollectingWriter {
        async fn write(&self, event: &LogEvent) -> Result<(), HookError> {
            self.seen.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn layer_forwards_matching_events_through_the_hook() {
        let writer = Arc::new(CollectingWriter {
            seen: Mutex::new(Vec::new()),
        });
        let hook = KinesisHook::builder("app-logs", HookConfig::default())
            .levels([Level::ERROR])
            .build_with_writer(writer.clone());

        let subscriber = Registry::default().with(HookLayer::new(Arc::new(hook)));
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(request_id = 7u64, "boot failed");
            tracing::info!("ignored by level gate");
        });

        // Dispatch is detached; poll until the spawned task lands.
        for _ in 0..100 {
            if !writer.seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        }

        let seen = writer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "boot failed");
        assert_eq!(seen[0].level, Level::ERROR);
        assert!(seen[0].fields.contains_key("request_id"));
        assert!(seen[0].fields.contains_key("target"));
    }
}
