use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use tracing_kinesis_sink::config::{DeliveryMode, HookConfig};
use tracing_kinesis_sink::event::FieldValue;
use tracing_kinesis_sink::hook::KinesisHook;
use tracing_kinesis_sink::init::init_tracing;

/// Ships `error!`/`warn!` events to a Firehose delivery stream. Expects the
/// usual AWS credential environment variables (or a shared credentials
/// file) and optionally `AWS_REGION` / `AWS_ENDPOINT`.
#[tokio::main]
async fn main() {
    let config = HookConfig {
        mode: DeliveryMode::Firehose,
        ..HookConfig::default()
    };

    let hook = KinesisHook::builder("demo-delivery-stream", config)
        .partition_key("demo")
        .ignore_field("internal_state")
        .filter_field("token", |_| FieldValue::from("****"))
        .send_async(true)
        .build()
        .await
        .expect("build kinesis hook");

    init_tracing(Arc::new(hook));

    warn!(token = "tok_123", "demo warning");
    error!(internal_state = "omitted", request_id = 42u64, "demo failure");

    // Give detached dispatch tasks a moment to reach the service.
    sleep(Duration::from_secs(2)).await;
}
