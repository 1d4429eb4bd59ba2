//! Authentication wrapping for handlers.
//!
//! Resolution and enforcement are deliberately separate layers. An
//! [`AuthHandler`] runs a [`Pass`] to resolve the identity and smuggles it
//! to downstream layers through a private channel header; a
//! [`SecureHandler`] reads that header and fails fast when nobody is
//! authenticated. One resolution layer can thereby guard several
//! independent secured subtrees.

use crate::{Codec, Identity, Pass, PlainCodec};
use http::{HeaderName, HeaderValue, StatusCode};
use palisade_core::{BoxFuture, Error, Handler, Request, Response, Result};

/// Default channel header carrying the encoded identity between an
/// [`AuthHandler`] and downstream guards. A fixed token, deliberately not
/// derived from any type name, so layers agree on it at compile time.
pub const IDENTITY_HEADER: &str = "x-palisade-identity";

/// The channel header as a typed name.
#[must_use]
pub fn identity_header() -> HeaderName {
    HeaderName::from_static(IDENTITY_HEADER)
}

/// Decodes the identity smuggled in a request's channel header.
///
/// An absent header means anonymous. A present header that fails to
/// decode is malformed input and errors: the channel is written by this
/// process, so garbage there is a defect, not a soft-fail.
pub fn authenticated_identity(request: &Request, header: &HeaderName) -> Result<Identity> {
    match request.headers().get(header) {
        Some(value) => PlainCodec::new().decode(value.as_bytes()),
        None => Ok(Identity::anonymous()),
    }
}

/// Returns a new request whose channel header carries `identity`,
/// replacing whatever was there in the same copy operation.
pub fn request_with_identity(
    request: Request,
    identity: &Identity,
    header: &HeaderName,
) -> Result<Request> {
    let encoded = PlainCodec::new().encode(identity);
    let value = HeaderValue::from_bytes(&encoded)
        .map_err(|e| Error::internal_with_source("identity does not fit a header", e))?;
    Ok(request.with_replaced_header(header.clone(), value))
}

/// The resolution point: wraps a handler with an authentication pass.
///
/// On each request the pass resolves an identity. Anonymous: the inner
/// handler sees the request unchanged except that the channel header is
/// stripped, so a client can never forge it. Identified: the identity is
/// encoded into the channel header, the inner handler responds, and the
/// pass decorates the outgoing response (sets a cookie, mints a token).
/// Errors from the inner handler propagate without running the exit.
pub struct AuthHandler<H, P> {
    inner: H,
    pass: P,
    header: HeaderName,
}

impl<H: Handler, P: Pass> AuthHandler<H, P> {
    /// Wraps `inner` with `pass` using the default channel header.
    #[must_use]
    pub fn new(inner: H, pass: P) -> Self {
        Self::with_header(inner, pass, identity_header())
    }

    /// Wraps `inner` with `pass` using an explicit channel header.
    #[must_use]
    pub fn with_header(inner: H, pass: P, header: HeaderName) -> Self {
        Self {
            inner,
            pass,
            header,
        }
    }
}

impl<H: Handler, P: Pass> Handler for AuthHandler<H, P> {
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let identity = self.pass.enter(&request).await?;
            if identity.is_anonymous() {
                let request = request.without_header(&self.header);
                return self.inner.respond(request).await;
            }
            tracing::debug!(identity = %identity, "request authenticated");
            let request = request_with_identity(request, &identity, &self.header)?;
            let response = self.inner.respond(request).await?;
            self.pass.exit(response, &identity).await
        })
    }
}

/// The enforcement point: requires a resolved, non-anonymous identity.
///
/// Reads the channel header written by an upstream [`AuthHandler`] and
/// fails with a 401 error before the inner handler is ever invoked when
/// the identity is anonymous or absent.
pub struct SecureHandler<H> {
    inner: H,
    header: HeaderName,
}

impl<H: Handler> SecureHandler<H> {
    /// Guards `inner` using the default channel header.
    #[must_use]
    pub fn new(inner: H) -> Self {
        Self::with_header(inner, identity_header())
    }

    /// Guards `inner` using an explicit channel header.
    #[must_use]
    pub fn with_header(inner: H, header: HeaderName) -> Self {
        Self { inner, header }
    }
}

impl<H: Handler> Handler for SecureHandler<H> {
    fn respond(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let identity = authenticated_identity(&request, &self.header)?;
            if identity.is_anonymous() {
                return Err(Error::http(StatusCode::UNAUTHORIZED));
            }
            self.inner.respond(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{FixedPass, LogoutPass};
    use http::{Method, Uri};
    use palisade_core::FnHandler;

    fn request() -> Request {
        Request::new(Method::GET, Uri::from_static("/"))
    }

    /// Echoes the channel header back in the response body.
    fn echo_channel() -> FnHandler<impl Fn(Request) -> BoxFuture<'static, Result<Response>>> {
        FnHandler::new(|rq: Request| {
            Box::pin(async move {
                let smuggled = rq
                    .headers()
                    .get(identity_header())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Ok(Response::text(smuggled))
            }) as BoxFuture<'static, Result<Response>>
        })
    }

    #[tokio::test]
    async fn identified_request_carries_the_encoded_identity() {
        let handler = AuthHandler::new(
            echo_channel(),
            FixedPass::new(Identity::new("urn:users:alice")),
        );
        let response = handler.respond(request()).await.unwrap();
        let body = response.into_body().read_all().await;
        let identity = PlainCodec::new().decode(&body).unwrap();
        assert_eq!(identity.urn(), "urn:users:alice");
    }

    #[tokio::test]
    async fn forged_channel_header_is_stripped_for_anonymous_requests() {
        let handler = AuthHandler::new(echo_channel(), LogoutPass);
        let forged = request().with_header(
            identity_header(),
            HeaderValue::from_static("urn%3Ausers%3Amallory"),
        );
        let response = handler.respond(forged).await.unwrap();
        assert!(response.into_body().read_all().await.is_empty());
    }

    #[tokio::test]
    async fn forged_channel_header_is_replaced_for_identified_requests() {
        let handler = AuthHandler::new(
            echo_channel(),
            FixedPass::new(Identity::new("urn:users:alice")),
        );
        let forged = request().with_header(
            identity_header(),
            HeaderValue::from_static("urn%3Ausers%3Amallory"),
        );
        let response = handler.respond(forged).await.unwrap();
        let body = response.into_body().read_all().await;
        let identity = PlainCodec::new().decode(&body).unwrap();
        assert_eq!(identity.urn(), "urn:users:alice");
    }

    #[tokio::test]
    async fn inner_errors_skip_the_exit() {
        struct ExitBomb;
        impl Pass for ExitBomb {
            fn enter<'a>(&'a self, _request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
                Box::pin(async move { Ok(Identity::new("urn:users:alice")) })
            }
            fn exit<'a>(
                &'a self,
                _response: Response,
                _identity: &'a Identity,
            ) -> BoxFuture<'a, Result<Response>> {
                Box::pin(async move { panic!("exit must not run after an inner error") })
            }
        }
        let handler = AuthHandler::new(
            FnHandler::new(|_| async { Err(Error::internal("inner failed")) }),
            ExitBomb,
        );
        assert!(handler.respond(request()).await.is_err());
    }

    #[tokio::test]
    async fn secure_handler_rejects_anonymous_with_401() {
        let guarded = SecureHandler::new(FnHandler::new(|_| async {
            Ok(Response::text("secret"))
        }));
        let handler = AuthHandler::new(guarded, LogoutPass);
        match handler.respond(request()).await {
            Err(Error::Http(e)) => assert_eq!(e.status(), StatusCode::UNAUTHORIZED),
            other => panic!("expected a 401 error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn secure_handler_admits_identified_requests() {
        let guarded = SecureHandler::new(FnHandler::new(|_| async {
            Ok(Response::text("secret"))
        }));
        let handler = AuthHandler::new(guarded, FixedPass::new(Identity::new("urn:users:alice")));
        let response = handler.respond(request()).await.unwrap();
        assert_eq!(response.into_body().read_all().await, "secret");
    }

    #[tokio::test]
    async fn secure_handler_alone_sees_no_channel_and_rejects() {
        let guarded = SecureHandler::new(FnHandler::new(|_| async {
            Ok(Response::text("secret"))
        }));
        assert!(guarded.respond(request()).await.is_err());
    }
}
