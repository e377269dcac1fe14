//! # Error Types
//!
//! Defines error types shared across crates.

use thiserror::Error;

/// Accepted remote notation, quoted in every configuration error.
pub const REMOTE_FORMAT_HINT: &str = "accepts string \"shop@http://example.com/_next/static/chunks/remoteEntry.js\" \
     OR object { global: \"shop\", url: \"http://example.com/_next/static/chunks/remoteEntry.js\" }";

/// Malformed remote declaration.
///
/// Raised synchronously while building a `RemoteIdentity`, before any
/// network activity takes place. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Compact form without the `@` separator.
    #[error("Remote `{input}` has no `@` separator; remote {hint}", hint = REMOTE_FORMAT_HINT)]
    MissingSeparator { input: String },

    /// Global name is empty or whitespace.
    #[error("Remote `{input}` has an empty global name; remote {hint}", hint = REMOTE_FORMAT_HINT)]
    EmptyGlobal { input: String },

    /// URL is empty or whitespace.
    #[error("Remote `{input}` has an empty url; remote {hint}", hint = REMOTE_FORMAT_HINT)]
    EmptyUrl { input: String },

    /// URL does not parse as an absolute URL.
    #[error("Remote `{global}` has an invalid url `{url}`: {reason}")]
    InvalidUrl {
        global: String,
        url: String,
        reason: String,
    },
}
