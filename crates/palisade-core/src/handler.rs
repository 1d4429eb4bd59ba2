//! Handler trait for request processing.
//!
//! A [`Handler`] is the unit of composition in the pipeline: routers
//! select one, authentication layers wrap one, fallbacks recover for one.
//! The trait is object-safe (boxed futures) so heterogeneous handlers can
//! be stored behind `Arc<dyn Handler>` and shared across in-flight
//! requests without locking.

use crate::{Error, Request, Response, Result};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, the return type of object-safe async traits here.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request handler.
///
/// Implementations are stateless or hold only immutable configuration, so
/// a single instance serves concurrent requests.
pub trait Handler: Send + Sync {
    /// Responds to a request.
    ///
    /// The request is consumed: its body is readable once and ownership
    /// makes that explicit. Failures travel as [`Error`] values, never as
    /// panics.
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>>;
}

impl Handler for Arc<dyn Handler> {
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        (**self).respond(request)
    }
}

/// A function-based handler.
///
/// Lets a plain async function participate in composition without a named
/// type.
pub struct FnHandler<F> {
    func: F,
}

impl<F, Fut> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    /// Wraps an async function as a handler.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin((self.func)(request))
    }
}

/// A handler that always responds with the same configured response.
///
/// The payload is held as plain bytes so every call can materialize a
/// fresh response value.
#[derive(Debug)]
pub struct FixedHandler {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FixedHandler {
    /// A fixed handler with an empty payload.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A fixed `200 OK` plain-text handler.
    #[must_use]
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK)
            .with_body(body)
            .with_header(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Appends a response header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

impl Handler for FixedHandler {
    fn respond(&self, _request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let mut response = Response::new(self.status).with_body(self.body.clone());
            for (name, value) in &self.headers {
                response = response.with_header(name.clone(), value.clone());
            }
            Ok(response)
        })
    }
}

/// A handler that unpacks structured HTTP errors into their responses.
///
/// Success and non-HTTP errors pass through untouched; an
/// [`Error::Http`] from the inner handler is rendered into the response it
/// carries. Placed at the outer edge of a composition, it turns "404 as an
/// error value" into "404 on the wire".
pub struct ForwardHandler<H> {
    inner: H,
}

impl<H: Handler> ForwardHandler<H> {
    /// Wraps an inner handler.
    #[must_use]
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: Handler> Handler for ForwardHandler<H> {
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            match self.inner.respond(request).await {
                Err(Error::Http(e)) => Ok(e.to_response()),
                other => other,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};

    fn request() -> Request {
        Request::new(Method::GET, Uri::from_static("/"))
    }

    #[tokio::test]
    async fn fixed_handler_responds_repeatedly() {
        let handler = FixedHandler::text("hi");
        let first = handler.respond(request()).await.unwrap();
        let second = handler.respond(request()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.into_body().read_all().await, "hi");
    }

    #[tokio::test]
    async fn fn_handler_invokes_function() {
        let handler = FnHandler::new(|rq: Request| async move {
            Ok(Response::text(rq.path().to_string()))
        });
        let resp = handler.respond(request()).await.unwrap();
        assert_eq!(resp.into_body().read_all().await, "/");
    }

    #[tokio::test]
    async fn forward_handler_unpacks_http_errors() {
        let handler = ForwardHandler::new(FnHandler::new(|_| async {
            Err(Error::http(StatusCode::NOT_FOUND))
        }));
        let resp = handler.respond(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn forward_handler_passes_other_errors_through() {
        let handler =
            ForwardHandler::new(FnHandler::new(|_| async { Err(Error::internal("boom")) }));
        assert!(matches!(
            handler.respond(request()).await,
            Err(Error::Internal { .. })
        ));
    }
}
