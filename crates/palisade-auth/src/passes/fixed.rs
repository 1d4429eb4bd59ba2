//! Constant-identity pass.

use crate::{Identity, Pass};
use palisade_core::{BoxFuture, Request, Response, Result};

/// Always resolves to a configured identity; useful for tests and for
/// bypassing authentication in trusted wiring.
#[derive(Debug, Clone)]
pub struct FixedPass {
    identity: Identity,
}

impl FixedPass {
    /// A pass that always resolves to `identity`.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl Pass for FixedPass {
    fn enter<'a>(&'a self, _request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move { Ok(self.identity.clone()) })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        _identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move { Ok(response) })
    }
}
