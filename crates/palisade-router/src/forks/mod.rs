//! Fork combinators.

mod authenticated;
mod chain;
mod content_type;
mod fixed;
mod host;
mod methods;
mod params;
mod path;

pub use authenticated::AuthenticatedFork;
pub use chain::ForkChain;
pub use content_type::ContentTypeFork;
pub use fixed::FixedFork;
pub use host::HostFork;
pub use methods::MethodFork;
pub use params::ParamFork;
pub use path::PathFork;
