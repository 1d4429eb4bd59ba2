//! Basic-auth-backed pass.

use crate::{Identity, Pass};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::AUTHORIZATION;
use palisade_core::{BoxFuture, Error, Request, Response, Result};

/// Checks a user/password pair against some credential store.
///
/// The store is the caller's concern; this pipeline only carries the
/// resolved identity. Rejected credentials resolve to anonymous rather
/// than erroring.
pub trait CredentialEntry: Send + Sync {
    /// Resolves the identity for a credential pair.
    fn enter<'a>(&'a self, user: &'a str, password: &'a str)
        -> BoxFuture<'a, Result<Identity>>;
}

/// Parses `Authorization: Basic ...` and delegates the credential check.
///
/// A missing or non-Basic header resolves to anonymous. A Basic header
/// that does not decode to `user:password` is malformed input, reported
/// as a hard error. The scheme is stateless, so `exit` is a no-op.
pub struct BasicPass<E> {
    realm: String,
    entry: E,
}

impl<E: CredentialEntry> BasicPass<E> {
    /// A basic-auth pass for `realm` over the given credential store.
    #[must_use]
    pub fn new(realm: impl Into<String>, entry: E) -> Self {
        Self {
            realm: realm.into(),
            entry,
        }
    }
}

impl<E: CredentialEntry> Pass for BasicPass<E> {
    fn enter<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move {
            let Some(encoded) = request
                .headers()
                .get_all(AUTHORIZATION)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .find_map(|v| v.trim().strip_prefix("Basic"))
            else {
                return Ok(Identity::anonymous());
            };
            let decoded = STANDARD
                .decode(encoded.trim())
                .map_err(|e| Error::malformed("basic credentials", format!("bad base64: {e}")))?;
            let decoded = String::from_utf8(decoded)
                .map_err(|e| Error::malformed("basic credentials", e.to_string()))?;
            let (user, password) = decoded.split_once(':').ok_or_else(|| {
                Error::malformed("basic credentials", "expected user:password")
            })?;
            let identity = self.entry.enter(user, password).await?;
            if identity.is_anonymous() {
                tracing::debug!(realm = %self.realm, user, "basic credentials rejected");
            }
            Ok(identity)
        })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        _identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move { Ok(response) })
    }
}
