//! Shared error type across simpleweb crates.

use thiserror::Error;

/// Stable error codes, sent to clients in the `x-error-code` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration rejected at startup.
    BadConfig,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// Service is not accepting traffic yet.
    NotReady,
    /// Metrics snapshot could not be rendered.
    Exposition,
    /// I/O failure (bind, read).
    Io,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in the error-code header.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::NotReady => "NOT_READY",
            ErrorCode::Exposition => "EXPOSITION",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code this error maps to when it reaches a client.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::NotReady => 503,
            _ => 500,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WebError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("service unavailable")]
    NotReady,
    #[error("metrics exposition failed: {0}")]
    Exposition(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl WebError {
    /// Map the error onto its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            WebError::BadConfig(_) => ErrorCode::BadConfig,
            WebError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            WebError::NotReady => ErrorCode::NotReady,
            WebError::Exposition(_) => ErrorCode::Exposition,
            WebError::Io(_) => ErrorCode::Io,
            WebError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<std::fmt::Error> for WebError {
    fn from(e: std::fmt::Error) -> Self {
        WebError::Exposition(e.to_string())
    }
}
