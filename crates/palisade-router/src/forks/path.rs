//! Fork by path pattern.

use crate::{Fork, RouteTarget};
use palisade_core::{Handler, Request, Result};
use regex::Regex;
use std::sync::Arc;

/// Selects its handler when the request path matches a pattern.
///
/// Matching is anchored at the start of the path (a pattern `/items`
/// matches `/items/42` but not `/v2/items`); anchor with `$` for an exact
/// match. Pattern compilation is the caller's concern, which keeps this
/// fork infallible to construct and makes the regex engine an injected
/// collaborator.
pub struct PathFork {
    pattern: Regex,
    handler: Arc<dyn Handler>,
}

impl PathFork {
    /// A fork matching `pattern` against the request path.
    #[must_use]
    pub fn new(pattern: Regex, target: impl Into<RouteTarget>) -> Self {
        Self {
            pattern,
            handler: target.into().into_handler(),
        }
    }
}

impl Fork for PathFork {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        let matched = self
            .pattern
            .find(request.path())
            .is_some_and(|m| m.start() == 0);
        if matched {
            Ok(Some(Arc::clone(&self.handler)))
        } else {
            Ok(None)
        }
    }
}
