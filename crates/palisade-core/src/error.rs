//! Error types for the Palisade pipeline.
//!
//! Every fallible boundary in the pipeline returns [`Result`] rather than
//! panicking, so routing and fallback layers can inspect and redirect on
//! failure. The error taxonomy distinguishes three outcomes that must never
//! be conflated:
//!
//! - [`Error::Http`]: a structured HTTP error carrying a status and a
//!   prebuilt payload; unpacked directly into a response by the transport
//!   adapter, a [`ForwardHandler`](crate::ForwardHandler) or a fallback.
//! - [`Error::Malformed`]: a format or parse failure (bad token segments,
//!   bad JSON, bad escaping). Always a hard failure, never silently
//!   downgraded.
//! - [`Error::Internal`]: an unstructured failure, mapped to a generic
//!   500 by fallback layers.
//!
//! Note that "not authenticated" is *not* an error: authentication
//! soft-fails resolve to an anonymous identity instead.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

/// Result type alias used across all pipeline boundaries.
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type for the Palisade pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A structured HTTP error with an explicit status and prebuilt payload.
    #[error("{0}")]
    Http(HttpError),

    /// Malformed input: bad segment counts, bad encodings, bad JSON.
    #[error("malformed {context}: {message}")]
    Malformed {
        /// What was being parsed when the failure occurred.
        context: &'static str,
        /// Human-readable description of the defect.
        message: String,
    },

    /// Unstructured internal failure.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error, when one exists. Not exposed to clients.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl Error {
    /// Creates a structured HTTP error with an empty payload.
    #[must_use]
    pub fn http(status: StatusCode) -> Self {
        Self::Http(HttpError::new(status))
    }

    /// Creates a malformed-input error.
    #[must_use]
    pub fn malformed(context: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            context,
            message: message.into(),
        }
    }

    /// Creates an internal error from a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The status code a recovery layer should answer with.
    ///
    /// Structured HTTP errors suggest their own status; everything else
    /// suggests 500.
    #[must_use]
    pub fn suggested_status(&self) -> StatusCode {
        match self {
            Self::Http(e) => e.status(),
            Self::Malformed { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// A structured HTTP error: status, headers and a buffered payload.
///
/// The payload is held as plain bytes (not a consumable
/// [`Body`](crate::Body)) so the same error value can be rendered into a
/// fresh [`Response`](crate::Response) any number of times.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpError {
    /// Creates an HTTP error with an empty payload.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Attaches a prebuilt payload.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Appends a header to the rendered response.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// The HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether a prebuilt payload was attached.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Renders this error into a fresh response.
    #[must_use]
    pub fn to_response(&self) -> crate::Response {
        let mut response =
            crate::Response::new(self.status).with_body(self.body.clone());
        for (name, value) in &self.headers {
            response = response.with_header(name.clone(), value.clone());
        }
        response
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status.canonical_reason() {
            Some(reason) => write!(f, "http error {} {reason}", self.status.as_u16()),
            None => write!(f, "http error {}", self.status.as_u16()),
        }
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Self {
        Self::Http(e)
    }
}
