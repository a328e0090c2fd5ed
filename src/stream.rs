use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_kinesis::config::{BehaviorVersion, Region};
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::Client;

use crate::config::HookConfig;
use crate::error::HookError;
use crate::event::LogEvent;
use crate::writer::{RecordContext, RecordWriter};

/// Kinesis Data Streams implementation of [`RecordWriter`].
///
/// The payload is sent exactly as produced, with no added framing.
#[derive(Clone)]
pub struct StreamWriter {
    client: Client,
    ctx: Arc<RecordContext>,
}

impl StreamWriter {
    /// Build a writer with its own Kinesis client resolved from `config`.
    pub async fn connect(config: &HookConfig, ctx: Arc<RecordContext>) -> Result<Self, HookError> {
        let credentials = config.credentials().await?;
        let mut builder = aws_sdk_kinesis::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region()))
            .credentials_provider(credentials);
        if let Some(endpoint) = config.endpoint() {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(StreamWriter {
            client: Client::from_conf(builder.build()),
            ctx,
        })
    }

    /// Wrap an existing client, e.g. one pointed at a local stack.
    pub fn from_client(client: Client, ctx: Arc<RecordContext>) -> Self {
        StreamWriter { client, ctx }
    }
}

#[async_trait]
impl RecordWriter for StreamWriter {
    async fn write(&self, event: &LogEvent) -> Result<(), HookError> {
        let data = self.ctx.payload(event)?;
        self.client
            .put_record()
            .stream_name(self.ctx.destination.stream_name(event))
            .partition_key(self.ctx.destination.partition_key(event))
            .data(Blob::new(data))
            .send()
            .await
            .map_err(|e| HookError::Transport(e.into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::Destination;
    use crate::event::FieldValue;
    use crate::transform::FieldTransform;
    use crate::writer::EventFormatter;
    use tracing::Level;

    struct PrefixFormatter;

    impl EventFormatter for PrefixFormatter {
        fn format(&self, event: &LogEvent) -> Result<Vec<u8>, crate::error::BoxError> {
            Ok(format!("CEF0|{}", event.message).into_bytes())
        }
    }

    struct RejectingFormatter;

    impl EventFormatter for RejectingFormatter {
        fn format(&self, _event: &LogEvent) -> Result<Vec<u8>, crate::error::BoxError> {
            Err("event not representable".into())
        }
    }

    fn ctx(formatter: Option<Arc<dyn EventFormatter>>) -> RecordContext {
        RecordContext {
            transform: FieldTransform::new(),
            destination: Destination::new("app-logs", None),
            formatter,
        }
    }

    #[test]
    fn payload_matches_transform_byte_for_byte() {
        let ctx = ctx(None);
        let event = LogEvent::new(Level::ERROR, "boot").with_field("code", 7i64);

        let payload = ctx.payload(&event).unwrap();
        assert_eq!(payload, ctx.transform.transform(&event));
        assert_ne!(*payload.last().unwrap(), b'\n');
    }

    #[test]
    fn formatter_output_is_used_verbatim() {
        let ctx = ctx(Some(Arc::new(PrefixFormatter)));
        let event = LogEvent::new(Level::ERROR, "boot");

        let payload = ctx.payload(&event).unwrap();
        assert_eq!(payload, b"CEF0|boot");
    }

    #[test]
    fn formatter_error_short_circuits() {
        let ctx = ctx(Some(Arc::new(RejectingFormatter)));
        let event = LogEvent::new(Level::ERROR, "boot");

        let err = ctx.payload(&event).unwrap_err();
        assert!(matches!(err, HookError::Formatter(_)));
    }

    #[test]
    fn destination_overrides_flow_through_context() {
        let ctx = ctx(None);
        let event = LogEvent::new(Level::ERROR, "boot")
            .with_field("stream_name", FieldValue::from("audit-logs"));
        assert_eq!(ctx.destination.stream_name(&event), "audit-logs");
    }
}
