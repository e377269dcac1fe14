//! # Lifecycle Events
//!
//! The three notifications a remote container publishes while loading.
//! Each carries a weak handle to the container, so subscribers (UI spinners,
//! logging) can inspect it while it is alive, and an unread event never
//! keeps it alive.

use serde::{Deserialize, Serialize};

use crate::service::WeakRemoteContainer;

/// Lifecycle notification of one remote container.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// A load attempt started.
    LoadStart { remote: WeakRemoteContainer },

    /// The load attempt produced a container.
    LoadComplete { remote: WeakRemoteContainer },

    /// The load attempt failed.
    LoadError {
        /// Error message of the failure.
        message: String,
        remote: WeakRemoteContainer,
    },
}

impl LifecycleEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::LoadStart { .. } => EventTopic::LoadStart,
            Self::LoadComplete { .. } => EventTopic::LoadComplete,
            Self::LoadError { .. } => EventTopic::LoadError,
        }
    }

    /// The container that published this event.
    #[must_use]
    pub fn remote(&self) -> &WeakRemoteContainer {
        match self {
            Self::LoadStart { remote }
            | Self::LoadComplete { remote }
            | Self::LoadError { remote, .. } => remote,
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTopic {
    LoadStart,
    LoadComplete,
    LoadError,
    /// Matches every topic.
    All,
}

impl EventTopic {
    /// Wire name of the topic.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadStart => "loadStart",
            Self::LoadComplete => "loadComplete",
            Self::LoadError => "loadError",
            Self::All => "all",
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Only the two outcome events of an attempt.
    #[must_use]
    pub fn outcomes() -> Self {
        Self::topics(vec![EventTopic::LoadComplete, EventTopic::LoadError])
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LifecycleEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
