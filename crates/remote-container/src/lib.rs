//! # Remote Container
//!
//! Lifecycle manager for federated remote module containers: a remote is a
//! separately deployed bundle that, once executed, binds a container object
//! to a global name. This crate loads each remote at most once, caches the
//! container, and serves modules and page maps out of it.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `LoadStatus`: `Unloaded -> Loading -> Loaded | Errored`
//!   - `ModuleLookup`: Result of a module or export lookup
//!   - `SideConfigSource`: How a remote's side config is supplied
//!   - `cache_busted`: Bundle URL with a fresh `t` query parameter
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `RemoteModuleApi`: Driving port (inbound API)
//!   - `ScriptLoader`: Driven port, injects a bundle and returns its container
//!   - `SideConfigFetcher`: Driven port, fetches side config JSON
//!   - `FederatedContainer`: The loaded container's `get` surface
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `RemoteContainer`: Implements `RemoteModuleApi`
//!
//! - **Bus** (`bus/`): Per-container lifecycle events
//!   (`loadStart`, `loadComplete`, `loadError`)
//!
//! - **Registry** (`registry/`): One container per global name
//!
//! - **Adapters Layer** (`adapters/`): HTTP side config fetcher, in-memory
//!   loader and container
//!
//! ## Invariants
//!
//! - At most one load attempt is in flight per container; concurrent callers
//!   share its outcome.
//! - Once loaded, every caller gets the same container instance.
//! - A failed load stays failed until `reset`.
//! - Side config failures are logged, never propagated.
//!
//! ## Usage Example
//!
//! ```ignore
//! use remote_container::{RemoteRegistry, RemoteModuleApi, SideConfigSource};
//! use std::sync::Arc;
//!
//! let registry = RemoteRegistry::new(loader, Arc::new(config.http_fetcher()?));
//! let home = registry.get_or_create(
//!     "home@http://localhost:3000/_next/static/chunks/remoteEntry.js",
//!     SideConfigSource::Undeclared,
//! )?;
//!
//! let pages = home.get_page_map().await?;
//! let nav = home.get_module("./Nav", Some("default")).await?;
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod bus;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod registry;
pub mod service;

#[cfg(test)]
mod test_utils;

/// Buffered lifecycle events per container before slow subscribers lag.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

// Re-exports for convenience
pub use adapters::{
    HttpSideConfigFetcher, NoSideConfigFetcher, StaticContainer, StaticScriptLoader,
    DEFAULT_SIDE_CONFIG_TIMEOUT,
};
pub use bus::{
    EventFilter, EventPublisher, EventStream, EventTopic, InMemoryEventBus, LifecycleEvent,
    Subscription, SubscriptionError,
};
pub use config::{RegistryConfig, RemoteEntry};
pub use domain::{cache_busted, LoadStatus, ModuleLookup, SideConfigSource, CACHE_BUST_PARAM};
pub use error::{RegistryConfigError, RemoteError, ScriptLoadError, SideConfigError};
pub use ports::{FederatedContainer, ModuleFactory, RemoteModuleApi, ScriptLoader, SideConfigFetcher};
pub use registry::RemoteRegistry;
pub use service::{RemoteContainer, WeakRemoteContainer};

pub use shared_types::{
    ConfigurationError, ModuleValue, PageMap, RemoteData, RemoteDescriptor, RemoteIdentity,
    SideConfig,
};
