//! Fork by resolved identity.

use crate::{Fork, RouteTarget};
use http::HeaderName;
use palisade_auth::{authenticated_identity, identity_header};
use palisade_core::{Handler, Request, Result};
use std::sync::Arc;

/// Selects its handler only for authenticated requests.
///
/// Reads the identity channel header written by an upstream
/// [`AuthHandler`](palisade_auth::AuthHandler); anonymous requests make
/// this fork decline so a chain can fall through to a public handler:
/// routing by authentication instead of failing on it.
pub struct AuthenticatedFork {
    handler: Arc<dyn Handler>,
    header: HeaderName,
}

impl AuthenticatedFork {
    /// A fork for authenticated requests, using the default channel
    /// header.
    #[must_use]
    pub fn new(target: impl Into<RouteTarget>) -> Self {
        Self::with_header(target, identity_header())
    }

    /// Same, with an explicit channel header.
    #[must_use]
    pub fn with_header(target: impl Into<RouteTarget>, header: HeaderName) -> Self {
        Self {
            handler: target.into().into_handler(),
            header,
        }
    }
}

impl Fork for AuthenticatedFork {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        let identity = authenticated_identity(request, &self.header)?;
        if identity.is_anonymous() {
            Ok(None)
        } else {
            Ok(Some(Arc::clone(&self.handler)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};
    use palisade_auth::{request_with_identity, Identity};

    #[test]
    fn declines_anonymous_requests() {
        let fork = AuthenticatedFork::new("members only");
        let request = Request::new(Method::GET, Uri::from_static("/"));
        assert!(fork.route(&request).unwrap().is_none());
    }

    #[test]
    fn selects_for_identified_requests() {
        let fork = AuthenticatedFork::new("members only");
        let request = Request::new(Method::GET, Uri::from_static("/"));
        let request = request_with_identity(
            request,
            &Identity::new("urn:users:alice"),
            &identity_header(),
        )
        .unwrap();
        assert!(fork.route(&request).unwrap().is_some());
    }
}
