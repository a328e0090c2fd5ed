use std::sync::Arc;

use tracing::Level;

use crate::config::{DeliveryMode, HookConfig};
use crate::destination::Destination;
use crate::error::HookError;
use crate::event::{default_levels, FieldValue, LogEvent};
use crate::firehose::FirehoseWriter;
use crate::stream::StreamWriter;
use crate::transform::FieldTransform;
use crate::writer::{RecordContext, RecordWriter};

/// Hook that forwards log events to Kinesis, one put-record call per event.
///
/// All dispatch state is fixed when the hook is built; concurrent `fire`
/// calls share the writer handle without any locking added here. To change
/// levels, filters or destinations, build a new hook.
pub struct KinesisHook {
    writer: Arc<dyn RecordWriter>,
    levels: Vec<Level>,
    send_async: bool,
}

impl std::fmt::Debug for KinesisHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinesisHook")
            .field("levels", &self.levels)
            .field("send_async", &self.send_async)
            .finish_non_exhaustive()
    }
}

impl KinesisHook {
    /// Start configuring a hook that ships to `stream_name` by default.
    pub fn builder(stream_name: impl Into<String>, config: HookConfig) -> HookBuilder {
        HookBuilder {
            config,
            stream_name: stream_name.into(),
            partition_key: None,
            levels: default_levels(),
            send_async: false,
            transform: FieldTransform::new(),
        }
    }

    /// Severities this hook reacts to. The host layer consults this before
    /// dispatching; `fire` itself does not re-check.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Dispatch one event to the configured backend.
    ///
    /// With the async flag unset this awaits the writer and returns its
    /// error verbatim. With it set, an owned copy of the event is captured
    /// and handed to a detached task, and `Ok` is returned immediately:
    /// fire-and-forget, no completion signal, no ordering guarantee, and
    /// the task's error is unobservable by the caller. Such errors are
    /// reported best-effort to stderr; routing them back through `tracing`
    /// would recurse into this hook.
    pub async fn fire(&self, event: &LogEvent) -> Result<(), HookError> {
        if !self.send_async {
            return self.writer.write(event).await;
        }

        let writer = Arc::clone(&self.writer);
        let event = event.clone();
        tokio::spawn(async move {
            if let Err(e) = writer.write(&event).await {
                eprintln!("kinesis hook: async dispatch failed: {e}");
            }
        });
        Ok(())
    }
}

/// Collects dispatch configuration before the hook is wired into the
/// logging framework.
///
/// Everything set here becomes immutable once `build` returns; mutating a
/// live hook is unrepresentable rather than undefined.
pub struct HookBuilder {
    config: HookConfig,
    stream_name: String,
    partition_key: Option<String>,
    levels: Vec<Level>,
    send_async: bool,
    transform: FieldTransform,
}

impl HookBuilder {
    /// Replace the default severity set (ERROR, WARN, INFO).
    pub fn levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// Default partition key. Unset, the event message text is used so
    /// identical messages shard together.
    pub fn partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = Some(key.into());
        self
    }

    /// Drop this field from every payload, even if it also has a filter.
    pub fn ignore_field(mut self, name: impl Into<String>) -> Self {
        self.transform.add_ignore(name);
        self
    }

    /// Replace this field's value with the filter's return value.
    pub fn filter_field<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.transform.add_filter(name, filter);
        self
    }

    /// Dispatch on a detached task instead of awaiting the service call.
    pub fn send_async(mut self, send_async: bool) -> Self {
        self.send_async = send_async;
        self
    }

    /// Resolve the session and build the hook with the writer variant the
    /// configured delivery mode selects.
    ///
    /// **Returns**
    /// - `Ok(hook)` ready to be wired into the subscriber.
    /// - `Err(..)` if a required input is missing or credential resolution
    ///   failed. Construction errors are fatal to the hook only; the host
    ///   just never receives a usable instance.
    pub async fn build(self) -> Result<KinesisHook, HookError> {
        if self.stream_name.is_empty() {
            return Err(HookError::InvalidInput("default stream name is empty"));
        }

        let ctx = Arc::new(RecordContext {
            transform: self.transform,
            destination: Destination::new(self.stream_name, self.partition_key),
            formatter: self.config.formatter.clone(),
        });

        let writer: Arc<dyn RecordWriter> = match self.config.mode {
            DeliveryMode::Stream => Arc::new(StreamWriter::connect(&self.config, ctx).await?),
            DeliveryMode::Firehose => Arc::new(FirehoseWriter::connect(&self.config, ctx).await?),
        };

        Ok(KinesisHook {
            writer,
            levels: self.levels,
            send_async: self.send_async,
        })
    }

    /// Wire a caller-supplied writer instead of building an AWS client.
    ///
    /// The seam for custom transports and tests; ignore/filter and
    /// destination settings collected on this builder only feed the
    /// built-in writers, so a custom writer brings its own pipeline.
    pub fn build_with_writer(self, writer: Arc<dyn RecordWriter>) -> KinesisHook {
        KinesisHook {
            writer,
            levels: self.levels,
            send_async: self.send_async,
        }
    }
}
