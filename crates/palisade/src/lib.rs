//! # Palisade
//!
//! A composable request-handling pipeline: a small algebra of interfaces
//! (handler, fork, fallback, authentication pass) that lets independent
//! pieces of request logic combine without inheritance.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use palisade::prelude::*;
//! use regex::Regex;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let signature: Arc<dyn Signature> = Arc::new(HmacSignature::sha256(*b"change-me"));
//!
//! // A login endpoint: basic credentials in, a fresh JWT out.
//! # struct Users;
//! # impl CredentialEntry for Users {
//! #     fn enter<'a>(&'a self, _: &'a str, _: &'a str)
//! #         -> BoxFuture<'a, palisade::Result<Identity>> {
//! #         Box::pin(async { Ok(Identity::new("urn:users:demo")) })
//! #     }
//! # }
//! let login = AuthHandler::new(
//!     SecureHandler::new(FixedHandler::new(http::StatusCode::OK)),
//!     ChainPass::new(vec![
//!         Box::new(BasicPass::new("api", Users)),
//!         Box::new(TokenPass::new(AccessTokenEntry::new(Arc::clone(&signature)))),
//!     ]),
//! );
//!
//! let pipeline = FallbackHandler::new(
//!     ForkHandler::new(vec![
//!         Box::new(PathFork::new(Regex::new("^/login$")?, Arc::new(login) as Arc<dyn Handler>)),
//!         Box::new(PathFork::new(Regex::new("^/$")?, "welcome")),
//!     ]),
//!     LogFallback::new(StatusFallback),
//! );
//!
//! Server::new(ServerConfig::default(), pipeline).run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → Fallback ─ Fork router ─ Auth (resolve) ─ Secure (enforce) → Handler
//!                ↑                        │
//!                └── recovery        Pass::exit (cookie / fresh token)
//! ```
//!
//! Identity resolution ([`AuthHandler`](prelude::AuthHandler)) and access
//! enforcement ([`SecureHandler`](prelude::SecureHandler)) are separate
//! layers bridged by a private header, so one authentication pass can
//! guard any number of secured subtrees.

pub use palisade_auth as auth;
pub use palisade_core as core;
pub use palisade_router as router;
pub use palisade_server as server;

pub use palisade_core::{Error, Result};

/// Convenient imports for composing a pipeline.
pub mod prelude {
    pub use palisade_auth::{
        authenticated_identity, cookies_of, identity_header, request_with_identity,
        AccessTokenEntry, AllPass, AuthHandler, BasicPass, ChainPass, Codec, CookiePass,
        CredentialEntry, FixedPass, HmacSignature, Identity, LogoutPass, Pass, PlainCodec,
        RefreshTokenEntry, SecureHandler, ShaBits, Signature, SignedCodec, SimpleTokenEntry,
        TokenEntry, TokenPass,
    };
    pub use palisade_core::{
        Body, BoxFuture, Error, FixedHandler, FnHandler, ForwardHandler, Handler, HttpError,
        Request, RequestHead, Response, Result,
    };
    pub use palisade_router::{
        route_path, AuthenticatedFork, ContentTypeFork, Fallback, FallbackHandler, FixedFork,
        Fork, ForkChain, ForkHandler, HostFork, LogFallback, MethodFork, ParamFork, PathFork,
        ReqFallback, RouteTarget, StatusFallback,
    };
    pub use palisade_server::{Server, ServerConfig};
}
