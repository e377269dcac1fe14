//! # Remote Registry
//!
//! Process-wide index of remote containers, keyed by global name.
//!
//! At most one `RemoteContainer` exists per global. The first registration
//! of a global wins: later calls with the same global get the existing
//! instance back, whatever URL or side config they carry.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                RemoteRegistry                 │
//! │                                               │
//! │   "home" ──► RemoteContainer (Loaded)         │
//! │   "shop" ──► RemoteContainer (Unloaded)       │
//! │                                               │
//! │   shared: Arc<dyn ScriptLoader>               │
//! │           Arc<dyn SideConfigFetcher>          │
//! └───────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{ConfigurationError, RemoteDescriptor};
use tracing::{debug, info, warn};

use crate::adapters::NoSideConfigFetcher;
use crate::config::RegistryConfig;
use crate::domain::SideConfigSource;
use crate::error::RegistryConfigError;
use crate::ports::{ScriptLoader, SideConfigFetcher};
use crate::service::RemoteContainer;

/// Registry of remote containers, one per global name.
pub struct RemoteRegistry {
    /// Containers by global name.
    remotes: RwLock<HashMap<String, RemoteContainer>>,
    /// Loader handed to every container.
    loader: Arc<dyn ScriptLoader>,
    /// Side config fetcher handed to every container.
    fetcher: Arc<dyn SideConfigFetcher>,
}

impl RemoteRegistry {
    pub fn new(loader: Arc<dyn ScriptLoader>, fetcher: Arc<dyn SideConfigFetcher>) -> Self {
        Self {
            remotes: RwLock::new(HashMap::new()),
            loader,
            fetcher,
        }
    }

    /// Registry whose containers never fetch side configs.
    pub fn with_loader(loader: Arc<dyn ScriptLoader>) -> Self {
        Self::new(loader, Arc::new(NoSideConfigFetcher))
    }

    /// Return the container registered for the remote's global, creating it
    /// on first use.
    ///
    /// The remote is validated before the registry is consulted, so a
    /// malformed descriptor fails even if its global is already known.
    /// Creation performs no I/O.
    pub fn get_or_create(
        &self,
        remote: impl Into<RemoteDescriptor>,
        side_config: SideConfigSource,
    ) -> Result<RemoteContainer, ConfigurationError> {
        let identity = remote.into().resolve()?;

        if let Some(existing) = self.remotes.read().get(identity.global()) {
            Self::check_same_url(existing, identity.url().as_str());
            return Ok(existing.clone());
        }

        let mut remotes = self.remotes.write();
        // Another caller may have registered between the two locks.
        if let Some(existing) = remotes.get(identity.global()) {
            Self::check_same_url(existing, identity.url().as_str());
            return Ok(existing.clone());
        }

        let global = identity.global().to_string();
        info!("[Registry] Registering remote: {}", identity);
        let container = RemoteContainer::new(
            identity,
            side_config,
            Arc::clone(&self.loader),
            Arc::clone(&self.fetcher),
        );
        remotes.insert(global, container.clone());
        Ok(container)
    }

    fn check_same_url(existing: &RemoteContainer, url: &str) {
        if existing.url().as_str() != url {
            warn!(
                remote = %existing.global(),
                registered = %existing.url(),
                requested = %url,
                "[Registry] Remote already registered with another url, keeping the first"
            );
        } else {
            debug!(remote = %existing.global(), "[Registry] Reusing remote container");
        }
    }

    /// Register every remote of `config`.
    ///
    /// Stops at the first invalid entry; entries before it stay registered.
    pub fn preload(
        &self,
        config: &RegistryConfig,
    ) -> Result<Vec<RemoteContainer>, RegistryConfigError> {
        config
            .remotes
            .iter()
            .map(|entry| -> Result<RemoteContainer, RegistryConfigError> {
                let side_config = entry.side_config_source()?;
                Ok(self.get_or_create(entry.remote.clone(), side_config)?)
            })
            .collect()
    }

    /// Container registered for `global`, if any.
    pub fn get(&self, global: &str) -> Option<RemoteContainer> {
        self.remotes.read().get(global).cloned()
    }

    pub fn contains(&self, global: &str) -> bool {
        self.remotes.read().contains_key(global)
    }

    pub fn len(&self) -> usize {
        self.remotes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.read().is_empty()
    }

    /// Registered global names, sorted.
    pub fn globals(&self) -> Vec<String> {
        let mut globals: Vec<String> = self.remotes.read().keys().cloned().collect();
        globals.sort();
        globals
    }
}

impl std::fmt::Debug for RemoteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRegistry")
            .field("remotes", &self.globals())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{StaticContainer, StaticScriptLoader};
    use crate::ports::RemoteModuleApi;
    use shared_types::RemoteData;

    fn registry() -> (RemoteRegistry, Arc<StaticScriptLoader>) {
        let loader = Arc::new(
            StaticScriptLoader::new().with_container("home", Arc::new(StaticContainer::new())),
        );
        (RemoteRegistry::with_loader(loader.clone()), loader)
    }

    #[test]
    fn test_get_or_create_returns_same_instance() {
        let (registry, _) = registry();

        let a = registry
            .get_or_create("home@http://localhost:3000/remoteEntry.js", SideConfigSource::Undeclared)
            .unwrap();
        let b = registry
            .get_or_create(
                RemoteData::new("home", "http://localhost:3000/remoteEntry.js"),
                SideConfigSource::Absent,
            )
            .unwrap();

        assert!(a.ptr_eq(&b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_writer_wins() {
        let (registry, _) = registry();

        let first = registry
            .get_or_create("home@http://localhost:3000/remoteEntry.js", SideConfigSource::Undeclared)
            .unwrap();
        let second = registry
            .get_or_create("home@http://localhost:4000/remoteEntry.js", SideConfigSource::Undeclared)
            .unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(second.url().port(), Some(3000));
    }

    #[test]
    fn test_malformed_remote_is_not_registered() {
        let (registry, loader) = registry();

        let err = registry
            .get_or_create("@http://x", SideConfigSource::Undeclared)
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::EmptyGlobal { .. }));
        assert!(registry.is_empty());
        assert_eq!(loader.injections(), 0);
    }

    #[test]
    fn test_lookup_helpers() {
        let (registry, _) = registry();
        registry
            .get_or_create("shop@http://localhost:3001/r.js", SideConfigSource::Undeclared)
            .unwrap();
        registry
            .get_or_create("home@http://localhost:3000/r.js", SideConfigSource::Undeclared)
            .unwrap();

        assert!(registry.contains("shop"));
        assert!(registry.get("cart").is_none());
        assert_eq!(registry.globals(), vec!["home".to_string(), "shop".to_string()]);
        assert!(format!("{:?}", registry).contains("shop"));
    }

    #[tokio::test]
    async fn test_registry_containers_share_load() {
        let (registry, loader) = registry();

        let a = registry
            .get_or_create("home@http://localhost:3000/r.js", SideConfigSource::Undeclared)
            .unwrap();
        a.ensure_container().await.unwrap();

        let b = registry.get("home").unwrap();
        assert!(b.is_loaded());
        assert_eq!(loader.injections(), 1);
    }

    #[test]
    fn test_preload() {
        let (registry, _) = registry();
        let config = RegistryConfig::from_lookup(|key| match key {
            "MF_REMOTES" => Some("home@http://localhost:3000/r.js,shop@http://localhost:3001/r.js".into()),
            "MF_SIDE_CONFIG_SHOP" => Some("http://localhost:3001/next-config.json".into()),
            _ => None,
        })
        .unwrap();

        let remotes = registry.preload(&config).unwrap();

        assert_eq!(remotes.len(), 2);
        assert_eq!(registry.globals(), vec!["home".to_string(), "shop".to_string()]);
    }

    #[test]
    fn test_preload_rejects_bad_side_config_url() {
        let (registry, _) = registry();
        let mut config = RegistryConfig::default();
        config.remotes.push(crate::config::RemoteEntry {
            remote: RemoteData::new("shop", "http://localhost:3001/r.js"),
            side_config_url: Some("::".into()),
        });

        let err = registry.preload(&config).unwrap_err();
        assert!(matches!(err, RegistryConfigError::InvalidSideConfigUrl { .. }));
        assert!(registry.is_empty());
    }
}
