//! Load state machine
//!
//! ```text
//! Unloaded ──► Loading ──► Loaded
//!                  │
//!                  └─────► Errored ──reset()──► Unloaded
//! ```
//!
//! `Loading` holds the single pending attempt every caller attaches to.

use std::sync::Arc;

use futures::future::{BoxFuture, Shared};

use crate::error::RemoteError;
use crate::ports::FederatedContainer;

/// Outcome of one load attempt.
pub type LoadOutcome = Result<Arc<dyn FederatedContainer>, RemoteError>;

/// The one in-flight attempt, shared by all waiters.
pub(crate) type PendingLoad = Shared<BoxFuture<'static, LoadOutcome>>;

pub(crate) enum LoadState {
    Unloaded,
    Loading(PendingLoad),
    Loaded(Arc<dyn FederatedContainer>),
    Errored(RemoteError),
}

impl LoadState {
    pub(crate) fn status(&self) -> LoadStatus {
        match self {
            Self::Unloaded => LoadStatus::Unloaded,
            Self::Loading(_) => LoadStatus::Loading,
            Self::Loaded(_) => LoadStatus::Loaded,
            Self::Errored(_) => LoadStatus::Errored,
        }
    }
}

/// Observable snapshot of a container's load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No attempt made yet.
    Unloaded,
    /// An attempt is in flight.
    Loading,
    /// The container is cached.
    Loaded,
    /// The attempt failed; sticky until `reset()`.
    Errored,
}

impl LoadStatus {
    /// Terminal for the current attempt.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded | Self::Errored)
    }
}
