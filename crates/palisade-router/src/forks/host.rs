//! Fork by host header.

use crate::{Fork, RouteTarget};
use http::header::HOST;
use palisade_core::{Handler, Request, Result};
use std::sync::Arc;

/// Selects its handler when the `Host` header equals a fixed value.
pub struct HostFork {
    host: String,
    handler: Arc<dyn Handler>,
}

impl HostFork {
    /// A fork matching requests for `host`.
    #[must_use]
    pub fn new(host: impl Into<String>, target: impl Into<RouteTarget>) -> Self {
        Self {
            host: host.into(),
            handler: target.into().into_handler(),
        }
    }
}

impl Fork for HostFork {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        let matched = request
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|host| host == self.host);
        if matched {
            Ok(Some(Arc::clone(&self.handler)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, Method, Uri};

    #[test]
    fn matches_the_configured_host_only() {
        let fork = HostFork::new("api.example.org", "ok");
        let hit = Request::new(Method::GET, Uri::from_static("/"))
            .with_header(HOST, HeaderValue::from_static("api.example.org"));
        let miss = Request::new(Method::GET, Uri::from_static("/"))
            .with_header(HOST, HeaderValue::from_static("www.example.org"));
        let none = Request::new(Method::GET, Uri::from_static("/"));
        assert!(fork.route(&hit).unwrap().is_some());
        assert!(fork.route(&miss).unwrap().is_none());
        assert!(fork.route(&none).unwrap().is_none());
    }
}
