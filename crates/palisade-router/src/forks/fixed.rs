//! Unconditional fork.

use crate::{Fork, RouteTarget};
use palisade_core::{Handler, Request, Result};
use std::sync::Arc;

/// Always selects its handler. Useful as the tail of a chain.
pub struct FixedFork {
    handler: Arc<dyn Handler>,
}

impl FixedFork {
    /// A fork that always routes to `target`.
    #[must_use]
    pub fn new(target: impl Into<RouteTarget>) -> Self {
        Self {
            handler: target.into().into_handler(),
        }
    }
}

impl Fork for FixedFork {
    fn route(&self, _request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        Ok(Some(Arc::clone(&self.handler)))
    }
}
