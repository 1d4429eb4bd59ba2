//! Error recovery.
//!
//! A [`Fallback`] turns a failed response attempt into a best-effort
//! recovery response. The wrapping [`FallbackHandler`] snapshots the
//! request head before dispatching, so a recovery strategy can describe
//! the request even though its body has been consumed downstream.

use http::StatusCode;
use palisade_core::{BoxFuture, Error, Handler, Request, RequestHead, Response, Result};

/// A failed response attempt, handed to recovery strategies.
#[derive(Debug)]
pub struct ReqFallback {
    /// Method, URI and headers of the failed request.
    pub head: RequestHead,
    /// The error that ended the attempt.
    pub err: Error,
    /// The status a recovery should answer with: the error's own code for
    /// structured HTTP errors, 500 otherwise.
    pub suggested_status: StatusCode,
}

/// An error-to-response recovery strategy.
pub trait Fallback: Send + Sync {
    /// Attempts to recover a response for a failed request.
    ///
    /// `None` means "not recovered here": the original error keeps
    /// propagating.
    fn route<'a>(&'a self, failure: &'a ReqFallback) -> BoxFuture<'a, Result<Option<Response>>>;
}

/// Wraps a handler with a recovery strategy.
///
/// On success the response passes through untouched. On error the
/// fallback is consulted once; a `None` recovery re-propagates the
/// original error verbatim.
pub struct FallbackHandler<H, F> {
    inner: H,
    fallback: F,
}

impl<H: Handler, F: Fallback> FallbackHandler<H, F> {
    /// Wraps `inner` with `fallback`.
    #[must_use]
    pub const fn new(inner: H, fallback: F) -> Self {
        Self { inner, fallback }
    }
}

impl<H: Handler, F: Fallback> Handler for FallbackHandler<H, F> {
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let head = request.head();
            match self.inner.respond(request).await {
                Ok(response) => Ok(response),
                Err(err) => {
                    let failure = ReqFallback {
                        head,
                        suggested_status: err.suggested_status(),
                        err,
                    };
                    match self.fallback.route(&failure).await? {
                        Some(response) => Ok(response),
                        None => Err(failure.err),
                    }
                }
            }
        })
    }
}

/// Renders the suggested status as a minimal response.
///
/// Structured HTTP errors that carry their own payload are served as
/// built; everything else becomes a plain-text `<code> <reason>` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFallback;

impl Fallback for StatusFallback {
    fn route<'a>(&'a self, failure: &'a ReqFallback) -> BoxFuture<'a, Result<Option<Response>>> {
        Box::pin(async move {
            if let Error::Http(e) = &failure.err {
                if e.has_body() {
                    return Ok(Some(e.to_response()));
                }
            }
            let status = failure.suggested_status;
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let body = format!("{} {reason}", status.as_u16());
            Ok(Some(Response::text(body).with_status(status)))
        })
    }
}

/// Records every recovery attempt, then returns the wrapped decision
/// unchanged. Recovery and observability stay separate concerns.
pub struct LogFallback<F> {
    origin: F,
}

impl<F: Fallback> LogFallback<F> {
    /// Wraps `origin` with logging.
    #[must_use]
    pub const fn new(origin: F) -> Self {
        Self { origin }
    }
}

impl<F: Fallback> Fallback for LogFallback<F> {
    fn route<'a>(&'a self, failure: &'a ReqFallback) -> BoxFuture<'a, Result<Option<Response>>> {
        Box::pin(async move {
            let outcome = self.origin.route(failure).await;
            match &outcome {
                Ok(Some(response)) => tracing::warn!(
                    method = %failure.head.method,
                    uri = %failure.head.uri,
                    err = %failure.err,
                    recovered = response.status().as_u16(),
                    "request failed, recovery response served"
                ),
                Ok(None) => tracing::error!(
                    method = %failure.head.method,
                    uri = %failure.head.uri,
                    err = %failure.err,
                    "request failed, not recovered"
                ),
                Err(e) => tracing::error!(
                    method = %failure.head.method,
                    uri = %failure.head.uri,
                    err = %failure.err,
                    fallback_err = %e,
                    "recovery itself failed"
                ),
            }
            outcome
        })
    }
}
