//! Fork by request method.

use crate::{Fork, RouteTarget};
use http::Method;
use palisade_core::{Handler, Request, Result};
use std::sync::Arc;

/// Selects its handler when the request method is in a configured set.
pub struct MethodFork {
    methods: Vec<Method>,
    handler: Arc<dyn Handler>,
}

impl MethodFork {
    /// A fork matching any of `methods`.
    #[must_use]
    pub fn new(
        methods: impl IntoIterator<Item = Method>,
        target: impl Into<RouteTarget>,
    ) -> Self {
        Self {
            methods: methods.into_iter().collect(),
            handler: target.into().into_handler(),
        }
    }

    /// A fork matching a single method.
    #[must_use]
    pub fn of(method: Method, target: impl Into<RouteTarget>) -> Self {
        Self::new([method], target)
    }
}

impl Fork for MethodFork {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        if self.methods.contains(request.method()) {
            Ok(Some(Arc::clone(&self.handler)))
        } else {
            Ok(None)
        }
    }
}
