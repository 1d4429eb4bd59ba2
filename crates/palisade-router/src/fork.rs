//! The routing predicate.

use palisade_core::{FixedHandler, Handler, Request, Result};
use std::sync::Arc;

/// A routing predicate selecting zero or one downstream handler.
///
/// `route` is side-effect free and synchronous: it inspects the request
/// head and either selects a handler, declines (`None`, "try the next
/// fork"), or errors. Declining is not an error; the distinction is what
/// lets chains keep looking.
pub trait Fork: Send + Sync {
    /// Routes a request, selecting at most one handler.
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>>;
}

/// What a fork dispatches to, resolved once at construction time.
///
/// Fork constructors accept `impl Into<RouteTarget>`, so a shared
/// handler, an owned [`FixedHandler`] or a plain text payload all wire up
/// directly, with the conversion settled at the call site instead of by
/// run-time type inspection.
pub struct RouteTarget {
    handler: Arc<dyn Handler>,
}

impl RouteTarget {
    /// Resolves the target into the handler forks store.
    #[must_use]
    pub fn into_handler(self) -> Arc<dyn Handler> {
        self.handler
    }
}

impl From<Arc<dyn Handler>> for RouteTarget {
    fn from(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

impl From<FixedHandler> for RouteTarget {
    fn from(handler: FixedHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl From<&str> for RouteTarget {
    fn from(text: &str) -> Self {
        Self {
            handler: Arc::new(FixedHandler::text(text.to_string())),
        }
    }
}
