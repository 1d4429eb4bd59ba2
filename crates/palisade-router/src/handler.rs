//! The router handler.

use crate::{Fork, PathFork, RouteTarget};
use http::StatusCode;
use palisade_core::{BoxFuture, Error, Handler, Request, Response, Result};
use regex::Regex;

/// Dispatches a request to the first fork that selects a handler.
///
/// Forks are evaluated strictly in order. The first selection is
/// dispatched to; the first routing error is forwarded verbatim; when
/// every fork declines, the router fails with a 404 error for a fallback
/// layer (or the transport adapter) to render.
pub struct ForkHandler {
    forks: Vec<Box<dyn Fork>>,
}

impl ForkHandler {
    /// A router over the given forks.
    #[must_use]
    pub fn new(forks: Vec<Box<dyn Fork>>) -> Self {
        Self { forks }
    }
}

impl Handler for ForkHandler {
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            for fork in &self.forks {
                if let Some(handler) = fork.route(&request)? {
                    return handler.respond(request).await;
                }
            }
            tracing::debug!(path = request.path(), "no fork matched");
            Err(Error::http(StatusCode::NOT_FOUND))
        })
    }
}

/// A single-route router: requests matching `pattern` go to `target`,
/// everything else 404s.
#[must_use]
pub fn route_path(pattern: Regex, target: impl Into<RouteTarget>) -> ForkHandler {
    ForkHandler::new(vec![Box::new(PathFork::new(pattern, target))])
}
