//! # Registry Configuration
//!
//! The list of remotes a host knows about, with optional side config URLs.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MF_REMOTES` | empty | Comma-separated compact remotes, `home@http://...,shop@http://...` |
//! | `MF_SIDE_CONFIG_<GLOBAL>` | unset | Side config URL for one remote (global upper-cased, non-alphanumerics as `_`) |
//! | `MF_SIDE_CONFIG_TIMEOUT_MS` | `10000` | Request timeout of the HTTP side config fetcher |

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::{RemoteData, RemoteIdentity};

use crate::adapters::HttpSideConfigFetcher;
use crate::domain::SideConfigSource;
use crate::error::RegistryConfigError;

const DEFAULT_SIDE_CONFIG_TIMEOUT_MS: u64 = 10_000;

/// One configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    #[serde(flatten)]
    pub remote: RemoteData,

    /// Side config URL, fetched lazily.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_config_url: Option<String>,
}

impl RemoteEntry {
    /// Side config source of this entry.
    pub fn side_config_source(&self) -> Result<SideConfigSource, RegistryConfigError> {
        let Some(url) = &self.side_config_url else {
            return Ok(SideConfigSource::Undeclared);
        };

        SideConfigSource::from_url(url).map_err(|e| RegistryConfigError::InvalidSideConfigUrl {
            global: self.remote.global.clone(),
            url: url.clone(),
            reason: e.to_string(),
        })
    }
}

/// Remotes to register at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub remotes: Vec<RemoteEntry>,

    /// Request timeout of the HTTP side config fetcher.
    #[serde(default = "default_side_config_timeout_ms")]
    pub side_config_timeout_ms: u64,
}

fn default_side_config_timeout_ms() -> u64 {
    DEFAULT_SIDE_CONFIG_TIMEOUT_MS
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            remotes: Vec::new(),
            side_config_timeout_ms: DEFAULT_SIDE_CONFIG_TIMEOUT_MS,
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, RegistryConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RegistryConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let remotes = match lookup("MF_REMOTES") {
            Some(list) => Self::parse_remotes(&list)?,
            None => Vec::new(),
        };

        let remotes = remotes
            .into_iter()
            .map(|remote| {
                let side_config_url = lookup(&side_config_key(&remote.global));
                RemoteEntry {
                    remote,
                    side_config_url,
                }
            })
            .collect();

        let side_config_timeout_ms = match lookup("MF_SIDE_CONFIG_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| RegistryConfigError::InvalidTimeout(raw.clone()))?,
            None => DEFAULT_SIDE_CONFIG_TIMEOUT_MS,
        };

        Ok(Self {
            remotes,
            side_config_timeout_ms,
        })
    }

    /// Parse a comma-separated list of compact remotes.
    ///
    /// Every entry is validated; blank entries are skipped.
    pub fn parse_remotes(list: &str) -> Result<Vec<RemoteData>, RegistryConfigError> {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| -> Result<RemoteData, RegistryConfigError> {
                let identity = RemoteIdentity::parse(entry)?;
                Ok(RemoteData::new(identity.global(), identity.url().as_str()))
            })
            .collect()
    }

    #[must_use]
    pub fn side_config_timeout(&self) -> Duration {
        Duration::from_millis(self.side_config_timeout_ms)
    }

    /// HTTP side config fetcher honoring the configured timeout.
    pub fn http_fetcher(&self) -> Result<HttpSideConfigFetcher, RegistryConfigError> {
        HttpSideConfigFetcher::new(self.side_config_timeout())
    }
}

/// Environment key holding the side config URL of `global`.
pub fn side_config_key(global: &str) -> String {
    let suffix: String = global
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("MF_SIDE_CONFIG_{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_remotes() {
        let remotes = RegistryConfig::parse_remotes(
            "home@http://localhost:3000/remoteEntry.js, shop@http://localhost:3001/remoteEntry.js,",
        )
        .unwrap();

        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].global, "home");
        assert_eq!(remotes[1].url, "http://localhost:3001/remoteEntry.js");
    }

    #[test]
    fn test_parse_remotes_fails_fast() {
        let err = RegistryConfig::parse_remotes("home@http://localhost:3000/r.js,@http://x")
            .unwrap_err();
        assert!(matches!(err, RegistryConfigError::Remote(_)));
    }

    #[test]
    fn test_from_lookup() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            ("MF_REMOTES", "home@http://localhost:3000/r.js,checkout-app@http://localhost:3002/r.js"),
            ("MF_SIDE_CONFIG_CHECKOUT_APP", "http://localhost:3002/next-config.json"),
            ("MF_SIDE_CONFIG_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();

        assert_eq!(config.remotes.len(), 2);
        assert_eq!(config.remotes[0].side_config_url, None);
        assert_eq!(
            config.remotes[1].side_config_url.as_deref(),
            Some("http://localhost:3002/next-config.json")
        );
        assert_eq!(config.side_config_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = RegistryConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_invalid_timeout() {
        let err = RegistryConfig::from_lookup(lookup_from(&[("MF_SIDE_CONFIG_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, RegistryConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn test_side_config_source() {
        let mut entry = RemoteEntry {
            remote: RemoteData::new("shop", "http://localhost:3001/r.js"),
            side_config_url: None,
        };
        assert_eq!(entry.side_config_source().unwrap(), SideConfigSource::Undeclared);

        entry.side_config_url = Some("not a url".into());
        assert!(matches!(
            entry.side_config_source(),
            Err(RegistryConfigError::InvalidSideConfigUrl { .. })
        ));
    }

    #[test]
    fn test_deserialize_flattened_entries() {
        let config: RegistryConfig = serde_json::from_str(
            r#"{"remotes":[{"global":"shop","url":"http://localhost:3001/r.js","side_config_url":"http://localhost:3001/cfg.json"}]}"#,
        )
        .unwrap();

        assert_eq!(config.remotes[0].remote.global, "shop");
        assert_eq!(config.side_config_timeout_ms, 10_000);
    }

    #[test]
    fn test_side_config_key() {
        assert_eq!(side_config_key("shop"), "MF_SIDE_CONFIG_SHOP");
        assert_eq!(side_config_key("checkout-app"), "MF_SIDE_CONFIG_CHECKOUT_APP");
    }
}
