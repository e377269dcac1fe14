//! Adapters Layer
//!
//! Implementations of the driven ports.

pub mod http_side_config;
pub mod in_memory;

pub use http_side_config::{HttpSideConfigFetcher, NoSideConfigFetcher, DEFAULT_SIDE_CONFIG_TIMEOUT};
pub use in_memory::{StaticContainer, StaticScriptLoader};
