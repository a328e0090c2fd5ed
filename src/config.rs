use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;

use crate::env::{env_nonempty, AWS_ENDPOINT_ENV, AWS_REGION_ENV};
use crate::error::HookError;
use crate::writer::EventFormatter;

/// Region used when neither the config nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Which Kinesis service receives the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Buffered ingestion via a Firehose delivery stream.
    #[default]
    Firehose,
    /// Direct ingestion via a Kinesis data stream.
    Stream,
}

impl FromStr for DeliveryMode {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stream" => Ok(DeliveryMode::Stream),
            "firehose" => Ok(DeliveryMode::Firehose),
            other => Err(HookError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Immutable connection settings, consumed once at hook construction.
///
/// Empty strings mean "not set"; resolution then falls through to the
/// environment and finally to service defaults.
#[derive(Clone, Default)]
pub struct HookConfig {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub endpoint: String,
    pub mode: DeliveryMode,
    /// Optional payload formatter that bypasses the field transformer.
    pub formatter: Option<Arc<dyn EventFormatter>>,
}

impl HookConfig {
    /// Resolve credentials through the fallback chain, stopping at the
    /// first step that yields usable credentials:
    ///
    /// 1. ambient environment credentials,
    /// 2. the explicit static access/secret pair from this config,
    /// 3. the shared AWS credentials file.
    pub(crate) async fn credentials(&self) -> Result<SharedCredentialsProvider, HookError> {
        let env = EnvironmentVariableCredentialsProvider::new();
        if env.provide_credentials().await.is_ok() {
            return Ok(SharedCredentialsProvider::new(env));
        }

        if !self.access_key.is_empty() && !self.secret_key.is_empty() {
            let credentials = Credentials::new(
                self.access_key.clone(),
                self.secret_key.clone(),
                None,
                None,
                "static",
            );
            return Ok(SharedCredentialsProvider::new(credentials));
        }

        let profile = ProfileFileCredentialsProvider::builder().build();
        match profile.provide_credentials().await {
            Ok(_) => Ok(SharedCredentialsProvider::new(profile)),
            Err(e) => Err(HookError::SessionInit(Box::new(e))),
        }
    }

    pub(crate) fn region(&self) -> String {
        if !self.region.is_empty() {
            return self.region.clone();
        }
        env_nonempty(AWS_REGION_ENV).unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    pub(crate) fn endpoint(&self) -> Option<String> {
        if !self.endpoint.is_empty() {
            return Some(self.endpoint.clone());
        }
        env_nonempty(AWS_ENDPOINT_ENV)
    }
}

impl fmt::Debug for HookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookConfig")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("mode", &self.mode)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}
