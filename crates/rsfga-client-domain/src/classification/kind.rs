//! Error kinds and the retryability predicate.

use std::fmt;

/// The stable taxonomy of transaction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was rejected as invalid (4xx not covered below).
    Validation,
    /// The targeted resource does not exist (404).
    NotFound,
    /// Missing or invalid credentials (401).
    Authentication,
    /// Credentials lack permission (403).
    Authorization,
    /// The service is throttling the caller (429).
    RateLimit,
    /// The service failed (5xx).
    Server,
    /// No response was received.
    Transport,
    /// The caller cancelled the transaction.
    Cancelled,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Authentication,
        ErrorKind::Authorization,
        ErrorKind::RateLimit,
        ErrorKind::Server,
        ErrorKind::Transport,
        ErrorKind::Cancelled,
    ];

    /// Derives the kind of a failed call from its status code.
    ///
    /// `None` means the call never produced a response. A non-success status
    /// below 400 is a protocol violation by the service and counts as `Server`.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None => ErrorKind::Transport,
            Some(401) => ErrorKind::Authentication,
            Some(403) => ErrorKind::Authorization,
            Some(404) => ErrorKind::NotFound,
            Some(429) => ErrorKind::RateLimit,
            Some(400..=499) => ErrorKind::Validation,
            Some(_) => ErrorKind::Server,
        }
    }

    /// Whether retrying the same call may succeed.
    ///
    /// This is the only retryability rule in the workspace; the retry
    /// transport consults it too.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimit | ErrorKind::Server | ErrorKind::Transport
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Authorization => "authorization_error",
            ErrorKind::RateLimit => "rate_limit_error",
            ErrorKind::Server => "server_error",
            ErrorKind::Transport => "transport_error",
            ErrorKind::Cancelled => "cancelled_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
