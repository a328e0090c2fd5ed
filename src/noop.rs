use async_trait::async_trait;

use crate::error::HookError;
use crate::event::LogEvent;
use crate::writer::RecordWriter;

/// A writer that accepts and drops every record.
///
/// Useful for measuring the overhead of the hook itself without any
/// external I/O, and for tests that don't care about delivery.
#[derive(Clone, Default)]
pub struct NoopWriter;

#[async_trait]
impl RecordWriter for NoopWriter {
    async fn write(&self, _event: &LogEvent) -> Result<(), HookError> {
        Ok(())
    }
}
