use thiserror::Error;

/// Boxed error used at the seams where collaborator errors pass through
/// unmodified.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for hook construction and dispatch.
///
/// On the synchronous dispatch path every variant is returned to the caller
/// as-is; there is no retry and no local recovery. Construction-time
/// variants are fatal to hook creation only, never to the host process.
#[derive(Error, Debug)]
pub enum HookError {
    /// A required construction input was missing or empty.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The injected formatter rejected the event.
    #[error("formatter failed: {0}")]
    Formatter(#[source] BoxError),

    /// The put-record call against the streaming service failed. The
    /// service error is carried verbatim, not classified further.
    #[error("transport failed: {0}")]
    Transport(#[source] BoxError),

    /// Credential or session resolution failed at hook construction.
    #[error("session init failed: {0}")]
    SessionInit(#[source] BoxError),

    /// The configured delivery mode is not recognized.
    #[error("unsupported delivery mode: {0:?}")]
    UnsupportedMode(String),
}
