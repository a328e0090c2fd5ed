use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_firehose::config::{BehaviorVersion, Region};
use aws_sdk_firehose::primitives::Blob;
use aws_sdk_firehose::types::Record;
use aws_sdk_firehose::Client;

use crate::config::HookConfig;
use crate::error::HookError;
use crate::event::LogEvent;
use crate::writer::{RecordContext, RecordWriter};

/// Kinesis Data Firehose implementation of [`RecordWriter`].
///
/// Firehose concatenates records on the consumer side, so a single newline
/// byte is appended as the record separator. Formatter output is trusted
/// as-is and gets no separator.
#[derive(Clone)]
pub struct FirehoseWriter {
    client: Client,
    ctx: Arc<RecordContext>,
}

impl FirehoseWriter {
    /// Build a writer with its own Firehose client resolved from `config`.
    pub async fn connect(config: &HookConfig, ctx: Arc<RecordContext>) -> Result<Self, HookError> {
        let credentials = config.credentials().await?;
        let mut builder = aws_sdk_firehose::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region()))
            .credentials_provider(credentials);
        if let Some(endpoint) = config.endpoint() {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(FirehoseWriter {
            client: Client::from_conf(builder.build()),
            ctx,
        })
    }

    /// Wrap an existing client, e.g. one pointed at a local stack.
    pub fn from_client(client: Client, ctx: Arc<RecordContext>) -> Self {
        FirehoseWriter { client, ctx }
    }

    fn record_data(&self, event: &LogEvent) -> Result<Vec<u8>, HookError> {
        let mut data = self.ctx.payload(event)?;
        if !self.ctx.has_formatter() {
            data.push(b'\n');
        }
        Ok(data)
    }
}

#[async_trait]
impl RecordWriter for FirehoseWriter {
    async fn write(&self, event: &LogEvent) -> Result<(), HookError> {
        let data = self.record_data(event)?;
        let record = Record::builder()
            .data(Blob::new(data))
            .build()
            .map_err(|e| HookError::Transport(e.into()))?;
        self.client
            .put_record()
            .delivery_stream_name(self.ctx.destination.stream_name(event))
            .record(record)
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
    use crate::transform::FieldTransform;
    use crate::writer::EventFormatter;
    use aws_credential_types::Credentials;
    use tracing::Level;

    struct PassthroughFormatter;

    impl EventFormatter for PassthroughFormatter {
        fn format(&self, event: &LogEvent) -> Result<Vec<u8>, crate::error::BoxError> {
            Ok(event.message.clone().into_bytes())
        }
    }

    fn writer(formatter: Option<Arc<dyn EventFormatter>>) -> FirehoseWriter {
        let conf = aws_sdk_firehose::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .build();
        let ctx = Arc::new(RecordContext {
            transform: FieldTransform::new(),
            destination: Destination::new("delivery-logs", None),
            formatter,
        });
        FirehoseWriter::from_client(Client::from_conf(conf), ctx)
    }

    #[test]
    fn payload_gets_exactly_one_trailing_newline() {
        let writer = writer(None);
        let event = LogEvent::new(Level::ERROR, "boot");

        let data = writer.record_data(&event).unwrap();
        let expected = writer.ctx.transform.transform(&event);
        assert_eq!(&data[..data.len() - 1], expected.as_slice());
        assert_eq!(*data.last().unwrap(), b'\n');
        assert_ne!(data[data.len() - 2], b'\n');
    }

    #[test]
    fn formatter_payload_gets_no_separator() {
        let writer = writer(Some(Arc::new(PassthroughFormatter)));
        let event = LogEvent::new(Level::ERROR, "boot");

        let data = writer.record_data(&event).unwrap();
        assert_eq!(data, b"boot");
    }
}
