use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use tracing_kinesis_sink::config::HookConfig;
use tracing_kinesis_sink::error::HookError;
use tracing_kinesis_sink::event::LogEvent;
use tracing_kinesis_sink::hook::KinesisHook;
use tracing_kinesis_sink::init::init_tracing;
use tracing_kinesis_sink::writer::RecordWriter;

/// Example of wiring a completely custom delivery backend by implementing
/// the `RecordWriter` trait directly. Imagine this talks to some internal
/// ingestion service for which this crate has no built-in writer.
struct MyIngestWriter;

#[async_trait]
impl RecordWriter for MyIngestWriter {
    async fn write(&self, event: &LogEvent) -> Result<(), HookError> {
        // Here you would call your own client library for the target
        // service. For the sake of example we just print the event.
        println!("[my-ingest] {} {:?}", event.message, event.fields);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let hook = KinesisHook::builder("unused-for-custom-writers", HookConfig::default())
        .build_with_writer(Arc::new(MyIngestWriter));

    init_tracing(Arc::new(hook));

    info!("custom writer example started");
    error!(service = "my-ingest", "simulated error sent via custom writer");

    sleep(Duration::from_millis(200)).await;
}
