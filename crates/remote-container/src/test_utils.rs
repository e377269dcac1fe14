//! Shared test helpers

use std::sync::Arc;

use shared_types::RemoteIdentity;

use crate::adapters::{NoSideConfigFetcher, StaticScriptLoader};
use crate::domain::SideConfigSource;
use crate::service::RemoteContainer;

/// A container whose loader knows no globals. Fine for event plumbing.
pub fn unused_remote(global: &str) -> RemoteContainer {
    let identity = RemoteIdentity::new(global, "http://localhost:3000/remoteEntry.js")
        .expect("valid identity");
    RemoteContainer::new(
        identity,
        SideConfigSource::Undeclared,
        Arc::new(StaticScriptLoader::new()),
        Arc::new(NoSideConfigFetcher),
    )
}
