//! Authentication strategies.
//!
//! A [`Pass`] is a bidirectional strategy: it resolves an [`Identity`]
//! from an inbound request and may decorate the outbound response with
//! credentials (a cookie, a freshly minted token). Strategies hold only
//! construction-time configuration and are freely shared across in-flight
//! requests.
//!
//! Failing to authenticate is not an error: a pass that finds no usable
//! or trustworthy credentials resolves to the anonymous identity, so
//! combinators can keep trying and enforcement points can decide what
//! anonymity means for them.

mod all;
mod basic;
mod chain;
mod cookie;
mod fixed;
mod logout;
mod token;

pub use all::AllPass;
pub use basic::{BasicPass, CredentialEntry};
pub use chain::ChainPass;
pub use cookie::{CookiePass, DEFAULT_COOKIE_DAYS};
pub use fixed::FixedPass;
pub use logout::LogoutPass;
pub use token::TokenPass;

use crate::Identity;
use palisade_core::{BoxFuture, Request, Response, Result};

/// A bidirectional authentication strategy.
pub trait Pass: Send + Sync {
    /// Resolves the identity carried by a request.
    ///
    /// Resolution soft-fails to [`Identity::anonymous`] when credentials
    /// are absent or untrustworthy; only malformed input errors.
    fn enter<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Identity>>;

    /// Decorates an outbound response for the resolved identity.
    fn exit<'a>(
        &'a self,
        response: Response,
        identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>>;
}
