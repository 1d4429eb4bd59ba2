//! Forced sign-out pass.

use crate::{Identity, Pass};
use palisade_core::{BoxFuture, Request, Response, Result};

/// Always resolves to the anonymous identity, forcing sign-out of
/// whatever it wraps or replaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogoutPass;

impl Pass for LogoutPass {
    fn enter<'a>(&'a self, _request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move { Ok(Identity::anonymous()) })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        _identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move { Ok(response) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};

    #[tokio::test]
    async fn always_anonymous() {
        let request = Request::new(Method::GET, Uri::from_static("/"));
        assert!(LogoutPass.enter(&request).await.unwrap().is_anonymous());
    }
}
