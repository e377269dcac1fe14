//! In-memory adapters
//!
//! A container backed by a module table and a loader backed by a table of
//! containers. Used for hosts that link remotes in-process, for warm caches,
//! and in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{ModuleValue, PageMap, PAGE_MAP_EXPORT, PAGE_MAP_MODULE};
use tracing::debug;
use url::Url;

use crate::error::ScriptLoadError;
use crate::ports::{FederatedContainer, ModuleFactory, ScriptLoader};

/// Container exposing a fixed table of module values.
#[derive(Debug, Default, Clone)]
pub struct StaticContainer {
    modules: HashMap<String, ModuleValue>,
}

impl StaticContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `value` under `path`.
    #[must_use]
    pub fn with_module(mut self, path: impl Into<String>, value: ModuleValue) -> Self {
        self.modules.insert(path.into(), value);
        self
    }

    /// Expose `pages` as the default export of the page map module.
    #[must_use]
    pub fn with_page_map(self, pages: &PageMap) -> Self {
        let routes = pages
            .iter()
            .map(|(route, path)| (route.clone(), ModuleValue::String(path.clone())))
            .collect();

        let mut module = serde_json::Map::new();
        module.insert(PAGE_MAP_EXPORT.to_string(), ModuleValue::Object(routes));
        self.with_module(PAGE_MAP_MODULE, ModuleValue::Object(module))
    }

    /// Exposed module paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

#[async_trait]
impl FederatedContainer for StaticContainer {
    async fn get(&self, module_path: &str) -> Option<ModuleFactory> {
        let value = self.modules.get(module_path)?.clone();
        Some(Box::new(move || value))
    }
}

/// Script loader resolving globals from a fixed table.
///
/// Records every injection so callers can check how often a bundle was
/// requested and with which URL.
#[derive(Default)]
pub struct StaticScriptLoader {
    globals: HashMap<String, Option<Arc<dyn FederatedContainer>>>,
    injections: AtomicUsize,
    last_url: Mutex<Option<Url>>,
}

impl StaticScriptLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `container` to `global`.
    #[must_use]
    pub fn with_container(
        mut self,
        global: impl Into<String>,
        container: Arc<dyn FederatedContainer>,
    ) -> Self {
        self.globals.insert(global.into(), Some(container));
        self
    }

    /// Make `global` resolve to nothing, as a bundle that binds no container.
    #[must_use]
    pub fn with_empty(mut self, global: impl Into<String>) -> Self {
        self.globals.insert(global.into(), None);
        self
    }

    /// Number of `inject` calls so far.
    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    /// URL passed to the most recent `inject` call.
    pub fn last_url(&self) -> Option<Url> {
        self.last_url.lock().clone()
    }
}

#[async_trait]
impl ScriptLoader for StaticScriptLoader {
    async fn inject(
        &self,
        global: &str,
        url: &Url,
    ) -> Result<Option<Arc<dyn FederatedContainer>>, ScriptLoadError> {
        self.injections.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock() = Some(url.clone());
        debug!(global = global, url = %url, "Static script injection");

        match self.globals.get(global) {
            Some(container) => Ok(container.clone()),
            None => Err(ScriptLoadError::MissingGlobal {
                global: global.to_string(),
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_container_get() {
        let container = StaticContainer::new().with_module("./Nav", json!({"default": "nav"}));

        let factory = container.get("./Nav").await.expect("factory");
        assert_eq!(factory(), json!({"default": "nav"}));
        assert!(container.get("./missing").await.is_none());
    }

    #[tokio::test]
    async fn test_static_container_page_map() {
        let pages = PageMap::from([("/".to_string(), "./pages/index".to_string())]);
        let container = StaticContainer::new().with_page_map(&pages);

        let factory = container.get(PAGE_MAP_MODULE).await.expect("factory");
        assert_eq!(factory(), json!({"default": {"/": "./pages/index"}}));
        assert_eq!(container.paths().collect::<Vec<_>>(), vec![PAGE_MAP_MODULE]);
    }

    #[tokio::test]
    async fn test_static_loader_records_injections() {
        let loader = StaticScriptLoader::new()
            .with_container("home", Arc::new(StaticContainer::new()))
            .with_empty("ghost");
        let url = Url::parse("http://localhost:3000/remoteEntry.js?t=1").unwrap();

        assert!(loader.inject("home", &url).await.unwrap().is_some());
        assert!(loader.inject("ghost", &url).await.unwrap().is_none());
        assert!(matches!(
            loader.inject("nobody", &url).await,
            Err(ScriptLoadError::MissingGlobal { .. })
        ));
        assert_eq!(loader.injections(), 3);
        assert_eq!(loader.last_url(), Some(url));
    }
}
