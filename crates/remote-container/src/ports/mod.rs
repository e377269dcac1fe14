//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for callers retrieving modules
//! - Driven Ports (outbound) - Script loading and side config fetching

pub mod inbound;
pub mod outbound;

pub use inbound::RemoteModuleApi;
pub use outbound::{FederatedContainer, ModuleFactory, ScriptLoader, SideConfigFetcher};
