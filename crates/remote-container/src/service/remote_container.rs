//! Remote Container Service
//!
//! Lazy loader of one federated remote. Constructed without any I/O; the
//! bundle is loaded on first use and cached for every later caller.

use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use federation_telemetry::{
    log_remote_event, metric_inc, time_histogram, MODULE_LOOKUPS, REMOTE_LOADS_COMPLETED,
    REMOTE_LOADS_FAILED, REMOTE_LOADS_STARTED, REMOTE_LOAD_DURATION, SIDE_CONFIG_FAILURES,
};
use futures::FutureExt;
use parking_lot::Mutex;
use shared_types::{
    ModuleValue, PageMap, RemoteIdentity, SideConfig, PAGE_MAP_EXPORT, PAGE_MAP_MODULE,
};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

use crate::bus::{EventFilter, EventPublisher, InMemoryEventBus, LifecycleEvent, Subscription};
use crate::domain::{
    cache_busted, now_millis, LoadOutcome, LoadState, LoadStatus, ModuleLookup, PendingLoad,
    SideConfigSource,
};
use crate::error::RemoteError;
use crate::ports::{FederatedContainer, RemoteModuleApi, ScriptLoader, SideConfigFetcher};

/// Handle to one remote's container lifecycle.
///
/// Cheap to clone; clones share state. `ptr_eq` tells whether two handles
/// are the same instance.
#[derive(Clone)]
pub struct RemoteContainer {
    inner: Arc<Inner>,
}

struct Inner {
    identity: RemoteIdentity,
    /// Set only for `SideConfigSource::Url`
    side_config_url: Option<Url>,
    /// `Some(None)` is the terminal "no config" value
    side_config: OnceCell<Option<Arc<SideConfig>>>,
    loader: Arc<dyn ScriptLoader>,
    fetcher: Arc<dyn SideConfigFetcher>,
    state: Mutex<LoadState>,
    last_error: Mutex<Option<RemoteError>>,
    page_map: Mutex<Option<PageMap>>,
    events: InMemoryEventBus,
}

impl RemoteContainer {
    /// Create a container. Performs no I/O.
    pub fn new(
        identity: RemoteIdentity,
        side_config: SideConfigSource,
        loader: Arc<dyn ScriptLoader>,
        fetcher: Arc<dyn SideConfigFetcher>,
    ) -> Self {
        let (side_config_url, side_config) = match side_config {
            SideConfigSource::Url(url) => (Some(url), OnceCell::new()),
            SideConfigSource::Resolved(cfg) => (None, OnceCell::new_with(Some(Some(Arc::new(cfg))))),
            SideConfigSource::Absent | SideConfigSource::Undeclared => {
                (None, OnceCell::new_with(Some(None)))
            }
        };

        Self {
            inner: Arc::new(Inner {
                identity,
                side_config_url,
                side_config,
                loader,
                fetcher,
                state: Mutex::new(LoadState::Unloaded),
                last_error: Mutex::new(None),
                page_map: Mutex::new(None),
                events: InMemoryEventBus::new(),
            }),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &RemoteIdentity {
        &self.inner.identity
    }

    /// Global name the container is bound to.
    #[must_use]
    pub fn global(&self) -> &str {
        self.inner.identity.global()
    }

    /// Bundle URL, without cache-buster.
    #[must_use]
    pub fn url(&self) -> &Url {
        self.inner.identity.url()
    }

    /// Snapshot of the load state.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.inner.state.lock().status()
    }

    /// Error of the last failed attempt.
    #[must_use]
    pub fn last_error(&self) -> Option<RemoteError> {
        self.inner.last_error.lock().clone()
    }

    /// Whether both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle to this container.
    #[must_use]
    pub fn downgrade(&self) -> WeakRemoteContainer {
        WeakRemoteContainer {
            identity: self.inner.identity.clone(),
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Lifecycle channel of this container.
    #[must_use]
    pub fn events(&self) -> &InMemoryEventBus {
        &self.inner.events
    }

    /// Subscribe to lifecycle events published from now on.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.inner.events.subscribe(filter)
    }

    /// Put an errored container back to `Unloaded` so the next access
    /// starts a new attempt.
    ///
    /// Returns `false`, doing nothing, unless the container is errored.
    pub fn reset(&self) -> bool {
        let mut state = self.inner.state.lock();
        if !matches!(*state, LoadState::Errored(_)) {
            return false;
        }
        *state = LoadState::Unloaded;
        *self.inner.last_error.lock() = None;
        log_remote_event!(info, self.global(), self.url(), "Remote container reset");
        true
    }

    /// Value of export `name` of module `module_path`; `None` when either is
    /// absent.
    pub async fn get_export(
        &self,
        module_path: &str,
        name: &str,
    ) -> Result<Option<ModuleValue>, RemoteError> {
        Ok(self.get_module(module_path, Some(name)).await?.into_value())
    }

    fn start_attempt(&self) -> PendingLoad {
        let this = self.clone();
        async move { this.run_attempt().await }.boxed().shared()
    }

    /// One load attempt: bundle and side config in parallel, then settle
    /// the state and publish the outcome.
    async fn run_attempt(self) -> LoadOutcome {
        let global = self.global().to_string();
        let url = cache_busted(self.url(), now_millis());

        metric_inc!(REMOTE_LOADS_STARTED);
        let _timer = time_histogram!(REMOTE_LOAD_DURATION);
        log_remote_event!(info, global, url, "Loading remote container");
        self.inner
            .events
            .publish(LifecycleEvent::LoadStart {
                remote: self.downgrade(),
            })
            .await;

        let (injected, _) = tokio::join!(
            self.inner.loader.inject(&global, &url),
            self.resolve_side_config()
        );

        let outcome = match injected {
            Ok(Some(container)) => Ok(container),
            Ok(None) => Err(RemoteError::EmptyContainer {
                url: self.url().to_string(),
            }),
            Err(e) => Err(RemoteError::from(e)),
        };

        match &outcome {
            Ok(container) => {
                *self.inner.state.lock() = LoadState::Loaded(Arc::clone(container));
                metric_inc!(REMOTE_LOADS_COMPLETED);
                log_remote_event!(info, global, self.url(), "Remote container loaded");
                self.inner
                    .events
                    .publish(LifecycleEvent::LoadComplete {
                        remote: self.downgrade(),
                    })
                    .await;
            }
            Err(error) => {
                *self.inner.last_error.lock() = Some(error.clone());
                *self.inner.state.lock() = LoadState::Errored(error.clone());
                metric_inc!(REMOTE_LOADS_FAILED, &[error.reason()]);
                log_remote_event!(error, global, self.url(), "Remote container failed to load", error = %error);
                self.inner
                    .events
                    .publish(LifecycleEvent::LoadError {
                        message: error.to_string(),
                        remote: self.downgrade(),
                    })
                    .await;
            }
        }

        outcome
    }

    async fn fetch_side_config(&self) -> Option<Arc<SideConfig>> {
        let url = self.inner.side_config_url.as_ref()?;

        match self.inner.fetcher.fetch(url).await {
            Ok(cfg) => {
                debug!(remote = %self.global(), url = %url, "Side config loaded");
                Some(Arc::new(cfg))
            }
            Err(e) => {
                metric_inc!(SIDE_CONFIG_FAILURES);
                log_remote_event!(error, self.global(), url, "Cannot load side config for remote", error = %e);
                None
            }
        }
    }

    fn page_map_from(&self, value: Option<ModuleValue>) -> PageMap {
        let parsed = match value {
            Some(value @ ModuleValue::Object(_)) => serde_json::from_value::<PageMap>(value).ok(),
            _ => None,
        };

        parsed.unwrap_or_else(|| {
            warn!(
                remote = %self.global(),
                module = PAGE_MAP_MODULE,
                "Container {} does not expose \"{}\" module",
                self.global(),
                PAGE_MAP_MODULE
            );
            PageMap::new()
        })
    }
}

/// Non-owning handle carried by lifecycle events.
///
/// Events can sit in a subscriber's buffer indefinitely; a weak handle
/// lets the container drop once every `RemoteContainer` is gone. The
/// identity stays readable after that.
#[derive(Clone)]
pub struct WeakRemoteContainer {
    identity: RemoteIdentity,
    inner: Weak<Inner>,
}

impl WeakRemoteContainer {
    #[must_use]
    pub fn identity(&self) -> &RemoteIdentity {
        &self.identity
    }

    #[must_use]
    pub fn global(&self) -> &str {
        self.identity.global()
    }

    /// The container, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<RemoteContainer> {
        self.inner.upgrade().map(|inner| RemoteContainer { inner })
    }

    /// Whether this handle points at `container`.
    #[must_use]
    pub fn ptr_eq(&self, container: &RemoteContainer) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Arc::as_ptr(&container.inner))
    }
}

impl fmt::Debug for WeakRemoteContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRemoteContainer")
            .field("global", &self.global())
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[async_trait]
impl RemoteModuleApi for RemoteContainer {
    fn is_loaded(&self) -> bool {
        matches!(*self.inner.state.lock(), LoadState::Loaded(_))
    }

    async fn ensure_container(&self) -> Result<Arc<dyn FederatedContainer>, RemoteError> {
        let pending = {
            let mut state = self.inner.state.lock();
            let pending = match &*state {
                LoadState::Loaded(container) => return Ok(Arc::clone(container)),
                LoadState::Errored(error) => return Err(error.clone()),
                LoadState::Loading(pending) => pending.clone(),
                LoadState::Unloaded => self.start_attempt(),
            };
            if matches!(*state, LoadState::Unloaded) {
                *state = LoadState::Loading(pending.clone());
            }
            pending
        };

        pending.await
    }

    async fn resolve_side_config(&self) -> Option<Arc<SideConfig>> {
        self.inner
            .side_config
            .get_or_init(|| self.fetch_side_config())
            .await
            .clone()
    }

    async fn get_module(
        &self,
        module_path: &str,
        export_name: Option<&str>,
    ) -> Result<ModuleLookup, RemoteError> {
        let container = self.ensure_container().await?;

        let Some(factory) = container.get(module_path).await else {
            metric_inc!(MODULE_LOOKUPS, &["missing"]);
            debug!(remote = %self.global(), module = module_path, "Module not exposed");
            return Ok(ModuleLookup::Missing);
        };

        metric_inc!(MODULE_LOOKUPS, &["found"]);
        Ok(ModuleLookup::from_module(factory(), export_name))
    }

    async fn get_page_map(&self) -> Result<PageMap, RemoteError> {
        let cached = self.inner.page_map.lock().clone();
        if let Some(pages) = cached {
            return Ok(pages);
        }

        let lookup = self
            .get_module(PAGE_MAP_MODULE, Some(PAGE_MAP_EXPORT))
            .await?;
        let pages = self.page_map_from(lookup.into_value());

        *self.inner.page_map.lock() = Some(pages.clone());
        Ok(pages)
    }
}

impl fmt::Debug for RemoteContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteContainer")
            .field("global", &self.global())
            .field("url", &self.url().as_str())
            .field("status", &self.status())
            .finish()
    }
}
