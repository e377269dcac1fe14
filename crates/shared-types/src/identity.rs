//! # Remote Identity
//!
//! A federated remote is identified by the global name its bundle binds the
//! container to, and the URL of that bundle.
//!
//! Two notations are accepted:
//!
//! - compact: `"shop@http://localhost:3001/_next/static/chunks/remoteEntry.js"`
//! - structured: `RemoteData { global: "shop", url: "http://..." }`
//!
//! Both are validated once, at construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigurationError;

/// Separator between global name and URL in the compact form.
pub const REMOTE_SEPARATOR: char = '@';

/// Structured, unvalidated remote declaration.
///
/// This is the shape remote lists take in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteData {
    /// Global variable name the container is bound to.
    pub global: String,
    /// Bundle URL.
    pub url: String,
}

impl RemoteData {
    pub fn new(global: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            global: global.into(),
            url: url.into(),
        }
    }
}

/// Either notation of a remote, prior to validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteDescriptor {
    /// `"<global>@<url>"`
    Compact(String),
    /// `{ global, url }`
    Structured(RemoteData),
}

impl RemoteDescriptor {
    /// Validate into a `RemoteIdentity`.
    pub fn resolve(self) -> Result<RemoteIdentity, ConfigurationError> {
        match self {
            Self::Compact(input) => RemoteIdentity::parse(&input),
            Self::Structured(data) => RemoteIdentity::from_data(data),
        }
    }
}

impl From<&str> for RemoteDescriptor {
    fn from(value: &str) -> Self {
        Self::Compact(value.to_string())
    }
}

impl From<String> for RemoteDescriptor {
    fn from(value: String) -> Self {
        Self::Compact(value)
    }
}

impl From<RemoteData> for RemoteDescriptor {
    fn from(value: RemoteData) -> Self {
        Self::Structured(value)
    }
}

impl From<RemoteIdentity> for RemoteDescriptor {
    fn from(value: RemoteIdentity) -> Self {
        Self::Structured(RemoteData {
            global: value.global,
            url: value.url.to_string(),
        })
    }
}

/// Validated identity of one federated remote. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteIdentity {
    global: String,
    url: Url,
}

impl RemoteIdentity {
    /// Parse the compact `"<global>@<url>"` form.
    ///
    /// Splits at the first `@`, so URLs carrying credentials
    /// (`user@host`) keep their own separator.
    pub fn parse(input: &str) -> Result<Self, ConfigurationError> {
        let Some((global, url)) = input.split_once(REMOTE_SEPARATOR) else {
            return Err(ConfigurationError::MissingSeparator {
                input: input.to_string(),
            });
        };
        Self::validated(global, url, input)
    }

    /// Validate the structured form.
    pub fn from_data(data: RemoteData) -> Result<Self, ConfigurationError> {
        let input = format!("{}{}{}", data.global, REMOTE_SEPARATOR, data.url);
        Self::validated(&data.global, &data.url, &input)
    }

    /// Build directly from parts, with the same validation.
    pub fn new(global: &str, url: &str) -> Result<Self, ConfigurationError> {
        Self::from_data(RemoteData::new(global, url))
    }

    fn validated(global: &str, url: &str, input: &str) -> Result<Self, ConfigurationError> {
        let global = global.trim();
        let url = url.trim();

        if global.is_empty() {
            return Err(ConfigurationError::EmptyGlobal {
                input: input.to_string(),
            });
        }
        if url.is_empty() {
            return Err(ConfigurationError::EmptyUrl {
                input: input.to_string(),
            });
        }

        let parsed = Url::parse(url).map_err(|e| ConfigurationError::InvalidUrl {
            global: global.to_string(),
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            global: global.to_string(),
            url: parsed,
        })
    }

    /// Global name the container is bound to.
    #[must_use]
    pub fn global(&self) -> &str {
        &self.global
    }

    /// Bundle URL, as declared.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FromStr for RemoteIdentity {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<RemoteData> for RemoteIdentity {
    type Error = ConfigurationError;

    fn try_from(value: RemoteData) -> Result<Self, Self::Error> {
        Self::from_data(value)
    }
}

impl fmt::Display for RemoteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.global, REMOTE_SEPARATOR, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact() {
        let id = RemoteIdentity::parse("shop@http://localhost:3001/remoteEntry.js").unwrap();
        assert_eq!(id.global(), "shop");
        assert_eq!(id.url().as_str(), "http://localhost:3001/remoteEntry.js");
    }

    #[test]
    fn test_parse_splits_at_first_separator() {
        let id = RemoteIdentity::parse("shop@http://user@cdn.example.com/remoteEntry.js").unwrap();
        assert_eq!(id.global(), "shop");
        assert_eq!(id.url().host_str(), Some("cdn.example.com"));
        assert_eq!(id.url().username(), "user");
    }

    #[test]
    fn test_parse_empty_global() {
        let err = RemoteIdentity::parse("@http://x").unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyGlobal { .. }));
    }

    #[test]
    fn test_parse_missing_separator() {
        let err = RemoteIdentity::parse("shop").unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingSeparator { .. }));
        assert!(err.to_string().contains("remoteEntry.js"));
    }

    #[test]
    fn test_parse_empty_url() {
        let err = RemoteIdentity::parse("shop@  ").unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyUrl { .. }));
    }

    #[test]
    fn test_parse_relative_url_rejected() {
        let err = RemoteIdentity::parse("shop@/static/remoteEntry.js").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidUrl { .. }));
    }

    #[test]
    fn test_structured_form() {
        let id = RemoteIdentity::try_from(RemoteData::new("home", "http://localhost:3000/r.js"))
            .unwrap();
        assert_eq!(id.global(), "home");

        let err = RemoteIdentity::from_data(RemoteData::new("home", "")).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyUrl { .. }));
    }

    #[test]
    fn test_descriptor_round_trip_through_display() {
        let id: RemoteIdentity = "checkout@http://localhost:3002/r.js".parse().unwrap();
        let again = RemoteDescriptor::from(id.to_string()).resolve().unwrap();
        assert_eq!(id, again);
    }

    #[test]
    fn test_structured_deserializes_from_json() {
        let data: RemoteData =
            serde_json::from_str(r#"{"global":"shop","url":"http://x/y.js"}"#).unwrap();
        assert_eq!(data, RemoteData::new("shop", "http://x/y.js"));
    }
}
