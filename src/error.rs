use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Field name -> messages, as reported by the server's error envelope.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} from {endpoint}: {message}")]
    Status {
        status: u16,
        endpoint: String,
        message: String,
        fields: FieldErrors,
    },

    #[error("not authenticated")]
    Unauthorized,

    /// The refresh flow itself failed; the session is gone. Wraps the shared
    /// root cause so every request queued behind the refresh carries it.
    #[error("session expired")]
    SessionExpired(#[source] Arc<Error>),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("unexpected response body: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for a plain HTTP 404, which read-style operations map to `None`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// True when the failure means the caller must authenticate again.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::SessionExpired(_))
    }
}

/// Client-side form validation failures, in field declaration order.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    items: Vec<FieldError>,
}

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.items.push(FieldError { field, message: message.into() });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.items.iter()
    }

    /// Consumes the accumulator: `Ok(())` if nothing was recorded.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: ")?;
        for (i, e) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
