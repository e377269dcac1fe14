//! Lifecycle event channel
//!
//! Each remote container owns one `InMemoryEventBus` and publishes
//! `loadStart`, `loadComplete` and `loadError` on it.

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, LifecycleEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};
