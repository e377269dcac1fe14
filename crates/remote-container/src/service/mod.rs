//! Service Layer
//!
//! `RemoteContainer` implements `RemoteModuleApi` on top of the injected
//! script loader and side config fetcher.

pub mod remote_container;

pub use remote_container::{RemoteContainer, WeakRemoteContainer};
