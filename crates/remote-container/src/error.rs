//! Error types for the remote container runtime

use shared_types::ConfigurationError;
use thiserror::Error;

/// Failure reported by a `ScriptLoader` while fetching or executing a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptLoadError {
    #[error("Network error loading {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Script {url} failed to execute: {reason}")]
    Script { url: String, reason: String },

    #[error("Script {url} did not bind global `{global}`")]
    MissingGlobal { global: String, url: String },
}

/// Failure of a remote container load attempt.
///
/// `Clone` because one attempt's outcome is handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The script ran but bound no usable container.
    #[error("Remote container {url} is empty")]
    EmptyContainer { url: String },

    /// Network or script-injection failure, verbatim from the loader.
    #[error(transparent)]
    Transport(#[from] ScriptLoadError),
}

impl RemoteError {
    /// Short label for metrics.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyContainer { .. } => "empty_container",
            Self::Transport(_) => "transport",
        }
    }
}

/// Failure fetching or parsing a side config. Never leaves the container.
#[derive(Debug, Error)]
pub enum SideConfigError {
    #[error("HTTP error fetching side config: {0}")]
    Http(String),

    #[error("Side config {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Side config is not valid JSON: {0}")]
    Parse(String),

    #[error("No side config fetcher available for {url}")]
    Unavailable { url: String },
}

/// Invalid registry configuration.
#[derive(Debug, Error)]
pub enum RegistryConfigError {
    #[error(transparent)]
    Remote(#[from] ConfigurationError),

    #[error("Invalid side config url `{url}` for remote `{global}`: {reason}")]
    InvalidSideConfigUrl {
        global: String,
        url: String,
        reason: String,
    },

    #[error("Invalid side config timeout `{0}` (expected milliseconds)")]
    InvalidTimeout(String),

    #[error("Cannot build HTTP client: {0}")]
    HttpClient(String),
}
