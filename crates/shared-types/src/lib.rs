//! # Shared Types Crate
//!
//! Value types shared by every crate of the federation runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: remote identities, side configs and module
//!   values are defined here and nowhere else.
//! - **Fail Fast**: a `RemoteIdentity` can only exist in validated form;
//!   malformed declarations surface as `ConfigurationError` at startup.

pub mod entities;
pub mod errors;
pub mod identity;

pub use entities::*;
pub use errors::*;
pub use identity::{RemoteData, RemoteDescriptor, RemoteIdentity, REMOTE_SEPARATOR};
