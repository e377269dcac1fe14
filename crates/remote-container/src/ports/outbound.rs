//! Outbound Ports (Driven Ports)
//!
//! Collaborators the runtime depends on but does not implement: putting a
//! bundle into the host and evaluating it, the container that bundle binds,
//! and fetching side configs.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ModuleValue, SideConfig};
use url::Url;

use crate::error::{ScriptLoadError, SideConfigError};

/// Zero-argument factory yielding a module's exported value.
pub type ModuleFactory = Box<dyn FnOnce() -> ModuleValue + Send>;

/// The object a remote bundle binds to its global name.
#[async_trait]
pub trait FederatedContainer: Send + Sync {
    /// Factory for `module_path`, or `None` when the container does not
    /// expose that module.
    async fn get(&self, module_path: &str) -> Option<ModuleFactory>;
}

/// Script loader (Driven Port)
///
/// Given a global name and a URL, makes the script present in the host and
/// resolves with the value bound to that global name.
///
/// The runtime appends a fresh cache-busting parameter to every URL it passes
/// in, so implementations may treat each call as a fresh injection.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    /// `Ok(None)` means the script ran but bound nothing usable.
    async fn inject(
        &self,
        global: &str,
        url: &Url,
    ) -> Result<Option<Arc<dyn FederatedContainer>>, ScriptLoadError>;
}

/// Side config fetcher (Driven Port)
#[async_trait]
pub trait SideConfigFetcher: Send + Sync {
    /// GET `url` and parse the body as a `SideConfig`.
    async fn fetch(&self, url: &Url) -> Result<SideConfig, SideConfigError>;
}
