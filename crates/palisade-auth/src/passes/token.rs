//! Bearer-token-backed pass.

use crate::{Identity, Pass, TokenEntry};
use chrono::Utc;
use http::header::AUTHORIZATION;
use palisade_core::{BoxFuture, Request, Response, Result};

/// Resolves the identity from an `Authorization: Bearer <jwt>` header and
/// mints a fresh token on the way out.
///
/// Every `Authorization` value is scanned for the `Bearer` prefix; the
/// first one found is verified by the token entry. No bearer header
/// resolves to anonymous.
///
/// `exit` replaces the response body with `{"jwt": "<token>"}` and the
/// JSON content type. This pass terminates a login or refresh endpoint;
/// it is not meant to wrap arbitrary downstream handlers.
pub struct TokenPass<E> {
    entry: E,
}

impl<E: TokenEntry> TokenPass<E> {
    /// A bearer-token pass over the given entry.
    #[must_use]
    pub const fn new(entry: E) -> Self {
        Self { entry }
    }
}

impl<E: TokenEntry> Pass for TokenPass<E> {
    fn enter<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move {
            let bearer = request
                .headers()
                .get_all(AUTHORIZATION)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .find_map(|v| v.trim().strip_prefix("Bearer"));
            match bearer {
                Some(raw) => self.entry.enter(raw.trim()).await,
                None => Ok(Identity::anonymous()),
            }
        })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let token = self.entry.new_token(identity, Utc::now());
            let body = serde_json::json!({ "jwt": token.encoded }).to_string();
            Ok(response.with_body(body).as_json())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HmacSignature, SimpleTokenEntry};
    use http::header::CONTENT_TYPE;
    use http::{HeaderValue, Method, Uri};
    use std::sync::Arc;

    fn pass() -> TokenPass<SimpleTokenEntry> {
        TokenPass::new(SimpleTokenEntry::new(Arc::new(HmacSignature::sha256(
            *b"top-secret",
        ))))
    }

    fn bearer_request(token: &str) -> Request {
        Request::new(Method::GET, Uri::from_static("/")).with_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
    }

    #[tokio::test]
    async fn minted_token_round_trips_through_enter() {
        let pass = pass();
        let response = pass
            .exit(Response::empty(), &Identity::new("urn:users:alice"))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = response.into_body().read_all().await;
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let token = parsed["jwt"].as_str().unwrap();

        let identity = pass.enter(&bearer_request(token)).await.unwrap();
        assert_eq!(identity.urn(), "urn:users:alice");
    }

    #[tokio::test]
    async fn missing_bearer_header_is_anonymous() {
        let request = Request::new(Method::GET, Uri::from_static("/"));
        assert!(pass().enter(&request).await.unwrap().is_anonymous());
    }

    #[tokio::test]
    async fn bearer_is_found_among_several_authorization_values() {
        let pass = pass();
        let response = pass
            .exit(Response::empty(), &Identity::new("urn:users:bob"))
            .await
            .unwrap();
        let body = response.into_body().read_all().await;
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let token = parsed["jwt"].as_str().unwrap();

        let request = Request::new(Method::GET, Uri::from_static("/"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("Basic abc"))
            .with_header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
            );
        assert_eq!(pass.enter(&request).await.unwrap().urn(), "urn:users:bob");
    }
}
