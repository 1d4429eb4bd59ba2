//! Core types and traits for the Palisade request pipeline.
//!
//! Palisade is a small algebra of request-handling interfaces that compose
//! without inheritance: a [`Handler`] responds to a [`Request`] with a
//! [`Response`] or an [`Error`], and every layer that wraps a handler
//! (routers, authentication, fallbacks) speaks the same contract.
//!
//! Two rules hold everywhere:
//!
//! - **Values are immutable.** Rewriting a request or response produces a
//!   new value; sibling layers holding the old one are unaffected.
//! - **Failures are values.** Errors travel through [`Result`] across
//!   every boundary, so composition layers can inspect and redirect
//!   without unwinding.

mod body;
mod error;
mod handler;
mod request;
mod response;

pub use body::Body;
pub use error::{Error, HttpError, Result};
pub use handler::{BoxFuture, FixedHandler, FnHandler, ForwardHandler, Handler};
pub use request::{Request, RequestHead};
pub use response::Response;
