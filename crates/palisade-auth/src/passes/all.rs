//! Conjunction of several passes.

use crate::{Identity, Pass};
use palisade_core::{BoxFuture, Request, Response, Result};

/// Requires every sub-pass to resolve the *same* non-anonymous identity.
///
/// The first error or anonymous result propagates immediately; when all
/// sub-passes succeed but disagree, the conjunction resolves to anonymous
/// (disagreeing credential sets are "not authenticated", not malformed
/// input). On exit, only the pass at the configured index decorates the
/// response.
///
/// Models "require 2FA": a password pass AND a token pass must both
/// resolve the same principal.
pub struct AllPass {
    passes: Vec<Box<dyn Pass>>,
    index: usize,
}

impl AllPass {
    /// A conjunction over `passes` whose `index`-th member handles exit.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range for `passes`; that is a wiring
    /// mistake, not a runtime condition.
    #[must_use]
    pub fn new(passes: Vec<Box<dyn Pass>>, index: usize) -> Self {
        assert!(
            index < passes.len(),
            "exit index {index} out of range for {} passes",
            passes.len()
        );
        Self { passes, index }
    }
}

impl Pass for AllPass {
    fn enter<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move {
            let mut identities = Vec::with_capacity(self.passes.len());
            for pass in &self.passes {
                let identity = pass.enter(request).await?;
                if identity.is_anonymous() {
                    return Ok(identity);
                }
                identities.push(identity);
            }
            let elected = &identities[self.index];
            if identities.iter().all(|i| i == elected) {
                Ok(elected.clone())
            } else {
                tracing::debug!("sub-passes disagree on the principal");
                Ok(Identity::anonymous())
            }
        })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        self.passes[self.index].exit(response, identity)
    }
}
