//! Authentication subsystem for the Palisade pipeline.
//!
//! The model is small: an [`Identity`] is the resolved principal of a
//! request, a [`Pass`] is a strategy that resolves one on the way in and
//! decorates the response on the way out, and a [`Codec`] moves
//! identities through opaque strings, optionally protected by a keyed
//! [`Signature`]. On top of that sit signed expiring tokens
//! ([`TokenEntry`]) and the [`AuthHandler`]/[`SecureHandler`] pair that
//! separates identity *resolution* from access *enforcement*.
//!
//! Throughout, "could not authenticate" resolves to
//! [`Identity::anonymous`] while "could not parse" is a hard error; the
//! two outcomes are never conflated.

mod codec;
mod cookies;
mod handlers;
mod identity;
mod jwt;
pub mod passes;
mod signature;

pub use codec::{Codec, PlainCodec, SignedCodec};
pub use cookies::cookies_of;
pub use handlers::{
    authenticated_identity, identity_header, request_with_identity, AuthHandler,
    SecureHandler, IDENTITY_HEADER,
};
pub use identity::Identity;
pub use jwt::{
    AccessTokenEntry, AccessTokenValidation, ExpirationValidation, Jwt, JwtHeader,
    JwtPayload, RefreshTokenEntry, RefreshTokenValidation, SequenceValidation,
    SignatureValidation, SimpleTokenEntry, TokenEntry, Validation, Verdict,
    ACCESS_DEST, DEFAULT_TOKEN_AGE_SECS, FROM_TOKEN_PROPERTY, REFRESH_DEST,
};
pub use passes::{
    AllPass, BasicPass, ChainPass, CookiePass, CredentialEntry, FixedPass, LogoutPass,
    Pass, TokenPass,
};
pub use signature::{HmacSignature, ShaBits, Signature};
