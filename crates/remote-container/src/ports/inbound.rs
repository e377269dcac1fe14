//! Inbound Ports (Driving Ports)
//!
//! The API callers use to pull modules out of a federated remote.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{PageMap, SideConfig};

use crate::domain::ModuleLookup;
use crate::error::RemoteError;
use crate::ports::outbound::FederatedContainer;

/// Module retrieval API of one remote (Driving Port)
#[async_trait]
pub trait RemoteModuleApi: Send + Sync {
    /// Whether the remote's container has been loaded.
    fn is_loaded(&self) -> bool;

    /// Return the loaded container, loading it first if needed.
    ///
    /// At most one load attempt runs per remote; every concurrent and later
    /// caller observes that attempt's outcome. Once a load has failed, later
    /// calls return the recorded error without a new attempt and without
    /// publishing lifecycle events again.
    async fn ensure_container(&self) -> Result<Arc<dyn FederatedContainer>, RemoteError>;

    /// Resolve the remote's side config.
    ///
    /// Fetch and parse failures resolve to `None`; they never fail the
    /// container load.
    async fn resolve_side_config(&self) -> Option<Arc<SideConfig>>;

    /// Get a module, or one export of it.
    ///
    /// # Arguments
    /// * `module_path` - Exposed module path, e.g. `./pages/index`
    /// * `export_name` - Export to pick out of the module, e.g. `default`
    ///
    /// # Returns
    /// `ModuleLookup::Missing` when the container does not expose the module.
    async fn get_module(
        &self,
        module_path: &str,
        export_name: Option<&str>,
    ) -> Result<ModuleLookup, RemoteError>;

    /// Route → module path table of the remote.
    ///
    /// Empty when the remote exposes no page map.
    async fn get_page_map(&self) -> Result<PageMap, RemoteError>;
}
