//! Sequential first-match chain of forks.

use crate::Fork;
use palisade_core::{Handler, Request, Result};
use std::sync::Arc;

/// Tries forks in order; the first selection or error wins.
///
/// When every fork declines, the chain declines. It is itself a fork and
/// nests freely.
pub struct ForkChain {
    forks: Vec<Box<dyn Fork>>,
}

impl ForkChain {
    /// A chain over the given forks, consulted in order.
    #[must_use]
    pub fn new(forks: Vec<Box<dyn Fork>>) -> Self {
        Self { forks }
    }
}

impl Fork for ForkChain {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        for fork in &self.forks {
            match fork.route(request)? {
                Some(handler) => return Ok(Some(handler)),
                None => {}
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forks::MethodFork;
    use http::{Method, Uri};

    #[test]
    fn first_match_wins() {
        let chain = ForkChain::new(vec![
            Box::new(MethodFork::of(Method::GET, "from-get")),
            Box::new(MethodFork::of(Method::POST, "from-post")),
        ]);
        let get = Request::new(Method::GET, Uri::from_static("/"));
        assert!(chain.route(&get).unwrap().is_some());
    }

    #[test]
    fn declines_when_every_fork_declines() {
        let chain = ForkChain::new(vec![
            Box::new(MethodFork::of(Method::GET, "a")),
            Box::new(MethodFork::of(Method::POST, "b")),
        ]);
        let put = Request::new(Method::PUT, Uri::from_static("/"));
        assert!(chain.route(&put).unwrap().is_none());
    }
}
