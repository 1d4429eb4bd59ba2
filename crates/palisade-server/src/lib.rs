//! Transport adapter for the Palisade pipeline.
//!
//! A thin bridge between hyper's wire types and the pipeline's immutable
//! request/response values. HTTP parsing and framing belong to hyper;
//! everything behavioral lives in the handlers this crate serves.

mod config;
mod server;

pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_BIND_ADDR, DEFAULT_SHUTDOWN_TIMEOUT_SECS};
pub use server::{BoundServer, Server, ServerError};
