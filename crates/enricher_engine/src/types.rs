use std::fmt;

use enricher_core::ScrapeStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SiteCompleted {
        index: usize,
        status: ScrapeStatus,
    },
    BatchCheckpointed {
        batch: usize,
        completed: usize,
        total: usize,
    },
}

/// Raw answer from a transport. Non-2xx statuses are answers, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Server errors and transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            FailureKind::HttpStatus(code) => (500..600).contains(&code),
            FailureKind::Timeout | FailureKind::Network => true,
            FailureKind::InvalidUrl
            | FailureKind::TooLarge { .. }
            | FailureKind::LimiterClosed => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    LimiterClosed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::LimiterClosed => write!(f, "fetch limiter closed"),
        }
    }
}
