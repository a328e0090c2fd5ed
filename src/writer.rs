use std::sync::Arc;

use async_trait::async_trait;

use crate::destination::Destination;
use crate::error::{BoxError, HookError};
use crate::event::LogEvent;
use crate::transform::FieldTransform;

/// Destination-specific delivery backend for [`LogEvent`]s.
///
/// Exactly one implementation is selected when a hook is built and it stays
/// fixed for the hook's lifetime. The handle is shared across concurrent
/// dispatches; implementations must be safe for concurrent use and this
/// crate adds no locking around them.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Deliver one event as exactly one put-record call.
    ///
    /// **Returns**
    /// - `Ok(())` if the service accepted the record.
    /// - `Err(..)` carrying the formatter or transport failure verbatim.
    ///   No retry, no backoff; resilience beyond the service client's own
    ///   is out of scope here.
    async fn write(&self, event: &LogEvent) -> Result<(), HookError>;
}

/// Caller-supplied payload formatter.
///
/// When configured, its output is the payload, byte-for-byte; the field
/// transformer is bypassed and the writers add no framing of their own. A
/// formatter error short-circuits the write before any service call.
pub trait EventFormatter: Send + Sync {
    fn format(&self, event: &LogEvent) -> Result<Vec<u8>, BoxError>;
}

/// What every built-in writer is constructed with: the field transformer,
/// the destination resolver and the optional injected formatter, shared as
/// one immutable handle.
pub struct RecordContext {
    pub transform: FieldTransform,
    pub destination: Destination,
    pub formatter: Option<Arc<dyn EventFormatter>>,
}

impl RecordContext {
    /// Payload without any backend framing: formatter output verbatim when
    /// one is configured, field-transformer output otherwise.
    pub(crate) fn payload(&self, event: &LogEvent) -> Result<Vec<u8>, HookError> {
        match &self.formatter {
            Some(formatter) => formatter.format(event).map_err(HookError::Formatter),
            None => Ok(self.transform.transform(event)),
        }
    }

    /// Whether the injected-formatter path is active.
    pub(crate) fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }
}
