//! Routing and recovery for the Palisade pipeline.
//!
//! A [`Fork`] is a side-effect-free predicate that selects zero or one
//! downstream handler; [`ForkHandler`] evaluates forks in order and
//! dispatches to the first match. A [`Fallback`] recovers a response when
//! a handler chain fails; [`FallbackHandler`] wires one around any
//! handler. Both layers forward the first error they meet verbatim;
//! declining to match and declining to recover are represented as `None`,
//! never as errors.

mod fallback;
mod fork;
pub mod forks;
mod handler;

pub use fallback::{Fallback, FallbackHandler, LogFallback, ReqFallback, StatusFallback};
pub use fork::{Fork, RouteTarget};
pub use forks::{
    AuthenticatedFork, ContentTypeFork, FixedFork, ForkChain, HostFork, MethodFork,
    ParamFork, PathFork,
};
pub use handler::{route_path, ForkHandler};
