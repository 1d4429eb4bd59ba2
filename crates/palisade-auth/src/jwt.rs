//! Signed, expiring, purpose-tagged tokens.
//!
//! Wire format: `base64url(header_json).base64url(payload_json).base64url(sig)`
//! with JSON object keys serialized in sorted order. Canonical serialization
//! is load-bearing: verification recomputes the encoded string from the
//! parsed header and payload and compares it to the original, so any
//! key-order instability would break every round-trip. `serde_json`
//! without its `preserve_order` feature keeps object keys sorted, which is
//! exactly the canonical form required here.
//!
//! Validation is a chain: signature, expiration, then any caller-supplied
//! predicate. Access and refresh tokens share one encoding, so each entry
//! stamps and checks a `dest` discriminator; without it a refresh token
//! could be replayed where an access token is expected.

use crate::{Identity, Signature};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use palisade_core::{BoxFuture, Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default token age: one day.
pub const DEFAULT_TOKEN_AGE_SECS: i64 = 86_400;

/// The `dest` value carried by access tokens.
pub const ACCESS_DEST: &str = "access";

/// The `dest` value carried by refresh tokens.
pub const REFRESH_DEST: &str = "refresh";

/// Identity property holding the raw token a principal was resolved from,
/// for later refresh or rotation logic.
pub const FROM_TOKEN_PROPERTY: &str = "from_token";

/// The JWT header object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Signing algorithm name.
    pub alg: String,
    /// Token type, fixed to `JWT`.
    pub typ: String,
}

impl JwtHeader {
    /// A header for the given algorithm.
    #[must_use]
    pub fn new(alg: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            typ: "JWT".to_string(),
        }
    }
}

/// The JWT payload object.
///
/// Claims this pipeline does not know about are preserved in `extra` so
/// re-signing reproduces the original encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    /// Issued-at, a Unix timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,
    /// Expiration, a Unix timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
    /// Subject: the identity URN.
    pub sub: String,
    /// Purpose discriminator (`access`, `refresh`, or empty).
    #[serde(default)]
    pub dest: String,
    /// Claims not interpreted here, kept for canonical re-encoding.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A parsed token alongside its original encoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    /// The parsed header.
    pub header: JwtHeader,
    /// The parsed payload.
    pub payload: JwtPayload,
    /// The canonical `header.payload.signature` string.
    pub encoded: String,
}

/// The outcome of a single validation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The token passed this check.
    Valid,
    /// The token failed, with the reason.
    Invalid(String),
}

/// One step of a token validation chain.
pub trait Validation: Send + Sync {
    /// Judges a parsed token.
    fn verdict<'a>(&'a self, token: &'a Jwt) -> BoxFuture<'a, Verdict>;
}

/// Validates that re-signing the parsed token reproduces its encoding.
pub struct SignatureValidation {
    signature: Arc<dyn Signature>,
}

impl SignatureValidation {
    /// A signature check against `signature`.
    #[must_use]
    pub fn new(signature: Arc<dyn Signature>) -> Self {
        Self { signature }
    }
}

impl Validation for SignatureValidation {
    fn verdict<'a>(&'a self, token: &'a Jwt) -> BoxFuture<'a, Verdict> {
        Box::pin(async move {
            if encoded_token(self.signature.as_ref(), &token.header, &token.payload)
                == token.encoded
            {
                Verdict::Valid
            } else {
                Verdict::Invalid("token signature mismatch".to_string())
            }
        })
    }
}

/// Validates that the token has not expired.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpirationValidation;

impl Validation for ExpirationValidation {
    fn verdict<'a>(&'a self, token: &'a Jwt) -> BoxFuture<'a, Verdict> {
        Box::pin(async move {
            if token.payload.exp < Utc::now() {
                Verdict::Invalid("token expired".to_string())
            } else {
                Verdict::Valid
            }
        })
    }
}

/// Validates that the token is destined for access use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessTokenValidation;

impl Validation for AccessTokenValidation {
    fn verdict<'a>(&'a self, token: &'a Jwt) -> BoxFuture<'a, Verdict> {
        Box::pin(async move {
            if token.payload.dest == ACCESS_DEST {
                Verdict::Valid
            } else {
                Verdict::Invalid("not an access token".to_string())
            }
        })
    }
}

/// Validates that the token is destined for refresh use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenValidation;

impl Validation for RefreshTokenValidation {
    fn verdict<'a>(&'a self, token: &'a Jwt) -> BoxFuture<'a, Verdict> {
        Box::pin(async move {
            if token.payload.dest == REFRESH_DEST {
                Verdict::Valid
            } else {
                Verdict::Invalid("not a refresh token".to_string())
            }
        })
    }
}

/// Runs validations in order, short-circuiting on the first failure.
pub struct SequenceValidation {
    validations: Vec<Box<dyn Validation>>,
}

impl SequenceValidation {
    /// A chain over the given steps.
    #[must_use]
    pub fn new(validations: Vec<Box<dyn Validation>>) -> Self {
        Self { validations }
    }
}

impl Validation for SequenceValidation {
    fn verdict<'a>(&'a self, token: &'a Jwt) -> BoxFuture<'a, Verdict> {
        Box::pin(async move {
            for validation in &self.validations {
                if let Verdict::Invalid(reason) = validation.verdict(token).await {
                    return Verdict::Invalid(reason);
                }
            }
            Verdict::Valid
        })
    }
}

/// Issues and verifies tokens.
pub trait TokenEntry: Send + Sync {
    /// Builds a signed token for `identity` issued at `iat`.
    fn new_token(&self, identity: &Identity, iat: DateTime<Utc>) -> Jwt;

    /// Verifies a raw token string.
    ///
    /// A malformed structure (wrong segment count, bad base64, bad JSON)
    /// is a hard error. A well-formed token that fails validation resolves
    /// to the anonymous identity. A valid token resolves to its subject,
    /// carrying the raw token under [`FROM_TOKEN_PROPERTY`].
    fn enter<'a>(&'a self, raw_token: &'a str) -> BoxFuture<'a, Result<Identity>>;
}

/// Token entry over a signature, an age and an optional extra validation.
pub struct SimpleTokenEntry {
    signature: Arc<dyn Signature>,
    validation: SequenceValidation,
    age_seconds: i64,
    dest: String,
}

impl SimpleTokenEntry {
    /// An entry with the default age and no purpose tag.
    #[must_use]
    pub fn new(signature: Arc<dyn Signature>) -> Self {
        Self::with_options(signature, None, DEFAULT_TOKEN_AGE_SECS, "")
    }

    /// An entry with explicit age, purpose tag and extra validation.
    ///
    /// The validation chain is always signature then expiration, followed
    /// by `extra` when given. Issued tokens are stamped with `dest`.
    #[must_use]
    pub fn with_options(
        signature: Arc<dyn Signature>,
        extra: Option<Box<dyn Validation>>,
        age_seconds: i64,
        dest: impl Into<String>,
    ) -> Self {
        let mut chain: Vec<Box<dyn Validation>> = vec![
            Box::new(SignatureValidation::new(Arc::clone(&signature))),
            Box::new(ExpirationValidation),
        ];
        if let Some(extra) = extra {
            chain.push(extra);
        }
        Self {
            signature,
            validation: SequenceValidation::new(chain),
            age_seconds,
            dest: dest.into(),
        }
    }
}

impl TokenEntry for SimpleTokenEntry {
    fn new_token(&self, identity: &Identity, iat: DateTime<Utc>) -> Jwt {
        let header = JwtHeader::new(self.signature.name());
        let payload = JwtPayload {
            iat,
            exp: iat + Duration::seconds(self.age_seconds),
            sub: identity.urn().to_string(),
            dest: self.dest.clone(),
            extra: serde_json::Map::new(),
        };
        let encoded = encoded_token(self.signature.as_ref(), &header, &payload);
        Jwt {
            header,
            payload,
            encoded,
        }
    }

    fn enter<'a>(&'a self, raw_token: &'a str) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move {
            let mut segments = raw_token.split('.');
            let (header, payload) =
                match (segments.next(), segments.next(), segments.next(), segments.next()) {
                    (Some(header), Some(payload), Some(_signature), None) => (header, payload),
                    _ => {
                        return Err(Error::malformed(
                            "jwt",
                            "expected three dot-separated segments",
                        ))
                    }
                };
            let header: JwtHeader = decode_segment(header, "jwt header")?;
            let payload: JwtPayload = decode_segment(payload, "jwt payload")?;
            let token = Jwt {
                header,
                payload,
                encoded: raw_token.to_string(),
            };
            match self.validation.verdict(&token).await {
                Verdict::Valid => Ok(Identity::new(&token.payload.sub)
                    .with_property(FROM_TOKEN_PROPERTY, raw_token)),
                Verdict::Invalid(reason) => {
                    tracing::debug!(%reason, "token rejected");
                    Ok(Identity::anonymous())
                }
            }
        })
    }
}

/// Entry for access tokens: stamps `dest = "access"` on issuance and
/// requires it on verification.
pub struct AccessTokenEntry {
    inner: SimpleTokenEntry,
}

impl AccessTokenEntry {
    /// An access entry with the default age.
    #[must_use]
    pub fn new(signature: Arc<dyn Signature>) -> Self {
        Self::with_options(signature, None, DEFAULT_TOKEN_AGE_SECS)
    }

    /// An access entry with explicit age and extra validation.
    #[must_use]
    pub fn with_options(
        signature: Arc<dyn Signature>,
        extra: Option<Box<dyn Validation>>,
        age_seconds: i64,
    ) -> Self {
        Self {
            inner: SimpleTokenEntry::with_options(
                signature,
                Some(purpose_chain(Box::new(AccessTokenValidation), extra)),
                age_seconds,
                ACCESS_DEST,
            ),
        }
    }
}

impl TokenEntry for AccessTokenEntry {
    fn new_token(&self, identity: &Identity, iat: DateTime<Utc>) -> Jwt {
        self.inner.new_token(identity, iat)
    }

    fn enter<'a>(&'a self, raw_token: &'a str) -> BoxFuture<'a, Result<Identity>> {
        self.inner.enter(raw_token)
    }
}

/// Entry for refresh tokens: stamps `dest = "refresh"` on issuance and
/// requires it on verification.
pub struct RefreshTokenEntry {
    inner: SimpleTokenEntry,
}

impl RefreshTokenEntry {
    /// A refresh entry with the default age.
    #[must_use]
    pub fn new(signature: Arc<dyn Signature>) -> Self {
        Self::with_options(signature, None, DEFAULT_TOKEN_AGE_SECS)
    }

    /// A refresh entry with explicit age and extra validation.
    #[must_use]
    pub fn with_options(
        signature: Arc<dyn Signature>,
        extra: Option<Box<dyn Validation>>,
        age_seconds: i64,
    ) -> Self {
        Self {
            inner: SimpleTokenEntry::with_options(
                signature,
                Some(purpose_chain(Box::new(RefreshTokenValidation), extra)),
                age_seconds,
                REFRESH_DEST,
            ),
        }
    }
}

impl TokenEntry for RefreshTokenEntry {
    fn new_token(&self, identity: &Identity, iat: DateTime<Utc>) -> Jwt {
        self.inner.new_token(identity, iat)
    }

    fn enter<'a>(&'a self, raw_token: &'a str) -> BoxFuture<'a, Result<Identity>> {
        self.inner.enter(raw_token)
    }
}

fn purpose_chain(
    purpose: Box<dyn Validation>,
    extra: Option<Box<dyn Validation>>,
) -> Box<dyn Validation> {
    match extra {
        Some(extra) => Box::new(SequenceValidation::new(vec![purpose, extra])),
        None => purpose,
    }
}

/// Builds the canonical encoded form of a token.
pub(crate) fn encoded_token(
    signature: &dyn Signature,
    header: &JwtHeader,
    payload: &JwtPayload,
) -> String {
    let data = format!(
        "{}.{}",
        URL_SAFE.encode(canonical_json(header)),
        URL_SAFE.encode(canonical_json(payload)),
    );
    let sig = URL_SAFE.encode(signature.sign(data.as_bytes()));
    format!("{data}.{sig}")
}

/// Serializes through `serde_json::Value` so object keys come out sorted
/// regardless of struct field order.
fn canonical_json<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .expect("token structures serialize to JSON")
        .to_string()
}

fn decode_segment<T: DeserializeOwned>(segment: &str, context: &'static str) -> Result<T> {
    let raw = URL_SAFE
        .decode(segment)
        .map_err(|e| Error::malformed(context, format!("bad base64: {e}")))?;
    serde_json::from_slice(&raw)
        .map_err(|e| Error::malformed(context, format!("bad json: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HmacSignature;

    fn signature() -> Arc<dyn Signature> {
        Arc::new(HmacSignature::sha256(*b"top-secret"))
    }

    #[tokio::test]
    async fn issued_token_verifies_to_its_subject() {
        let entry = SimpleTokenEntry::new(signature());
        let token = entry.new_token(&Identity::new("urn:users:alice"), Utc::now());
        let identity = entry.enter(&token.encoded).await.unwrap();
        assert_eq!(identity.urn(), "urn:users:alice");
        assert_eq!(identity.property(FROM_TOKEN_PROPERTY), Some(token.encoded.as_str()));
    }

    #[tokio::test]
    async fn token_is_valid_just_before_expiry_and_invalid_after() {
        let age = 60;
        let entry = SimpleTokenEntry::with_options(signature(), None, age, "");
        let alice = Identity::new("urn:users:alice");

        let fresh = entry.new_token(&alice, Utc::now() - Duration::seconds(age - 5));
        assert!(!entry.enter(&fresh.encoded).await.unwrap().is_anonymous());

        let stale = entry.new_token(&alice, Utc::now() - Duration::seconds(age + 5));
        assert!(entry.enter(&stale.encoded).await.unwrap().is_anonymous());
    }

    #[tokio::test]
    async fn foreign_key_resolves_to_anonymous() {
        let issuer = SimpleTokenEntry::new(Arc::new(HmacSignature::sha256(*b"key-one")));
        let verifier = SimpleTokenEntry::new(Arc::new(HmacSignature::sha256(*b"key-two")));
        let token = issuer.new_token(&Identity::new("urn:users:alice"), Utc::now());
        assert!(verifier.enter(&token.encoded).await.unwrap().is_anonymous());
    }

    #[tokio::test]
    async fn refresh_token_cannot_enter_the_access_entry() {
        let access = AccessTokenEntry::new(signature());
        let refresh = RefreshTokenEntry::new(signature());
        let alice = Identity::new("urn:users:alice");

        let refresh_token = refresh.new_token(&alice, Utc::now());
        assert!(access.enter(&refresh_token.encoded).await.unwrap().is_anonymous());

        let access_token = access.new_token(&alice, Utc::now());
        assert!(refresh.enter(&access_token.encoded).await.unwrap().is_anonymous());
        assert!(!access.enter(&access_token.encoded).await.unwrap().is_anonymous());
    }

    #[tokio::test]
    async fn wrong_segment_count_is_a_hard_error() {
        let entry = SimpleTokenEntry::new(signature());
        assert!(matches!(
            entry.enter("only.two").await.unwrap_err(),
            Error::Malformed { .. }
        ));
        assert!(matches!(
            entry.enter("a.b.c.d").await.unwrap_err(),
            Error::Malformed { .. }
        ));
    }

    #[tokio::test]
    async fn unparseable_segments_are_hard_errors() {
        let entry = SimpleTokenEntry::new(signature());
        // Bad base64.
        assert!(entry.enter("!!!.???.###").await.is_err());
        // Good base64, bad JSON.
        let garbage = format!(
            "{}.{}.{}",
            URL_SAFE.encode("not json"),
            URL_SAFE.encode("not json"),
            URL_SAFE.encode("sig"),
        );
        assert!(matches!(
            entry.enter(&garbage).await.unwrap_err(),
            Error::Malformed { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_claims_survive_the_resign_comparison() {
        let sig = signature();
        let header = JwtHeader::new(sig.name());
        let mut extra = serde_json::Map::new();
        extra.insert("scope".to_string(), serde_json::json!("billing"));
        let payload = JwtPayload {
            iat: Utc::now(),
            exp: Utc::now() + Duration::seconds(60),
            sub: "urn:users:alice".to_string(),
            dest: String::new(),
            extra,
        };
        let encoded = encoded_token(sig.as_ref(), &header, &payload);

        let entry = SimpleTokenEntry::new(sig);
        let identity = entry.enter(&encoded).await.unwrap();
        assert_eq!(identity.urn(), "urn:users:alice");
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let header = JwtHeader::new("HS256");
        assert_eq!(canonical_json(&header), r#"{"alg":"HS256","typ":"JWT"}"#);
    }

    #[test]
    fn issued_tokens_carry_the_purpose_tag() {
        let access = AccessTokenEntry::new(signature());
        let token = access.new_token(&Identity::new("urn:users:alice"), Utc::now());
        assert_eq!(token.payload.dest, ACCESS_DEST);
    }
}
