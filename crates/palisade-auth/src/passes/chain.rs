//! Sequential fallback over several passes.

use crate::{Identity, Pass};
use palisade_core::{BoxFuture, Request, Response, Result};

/// Tries sub-passes in order; the first successful authentication wins.
///
/// On entry, evaluation stops at the first pass that errors or resolves a
/// non-anonymous identity; later passes are not consulted once one
/// succeeds. When every pass resolves to anonymous, the chain does too.
/// On exit, the response is threaded through every sub-pass in order,
/// stopping at the first error.
pub struct ChainPass {
    passes: Vec<Box<dyn Pass>>,
}

impl ChainPass {
    /// A chain over the given passes, consulted in order.
    #[must_use]
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self { passes }
    }
}

impl Pass for ChainPass {
    fn enter<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move {
            for pass in &self.passes {
                let identity = pass.enter(request).await?;
                if !identity.is_anonymous() {
                    return Ok(identity);
                }
            }
            Ok(Identity::anonymous())
        })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let mut response = response;
            for pass in &self.passes {
                response = pass.exit(response, identity).await?;
            }
            Ok(response)
        })
    }
}
