//! # Domain Entities
//!
//! Values a remote hands back to its host: the optional side config and
//! the exported modules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value exported by a federated module.
///
/// `Null` stands for an explicit null export. An absent export is
/// represented by `Option::None` wherever one can occur.
pub type ModuleValue = serde_json::Value;

/// Route → module path table advertised by a remote.
pub type PageMap = BTreeMap<String, String>;

/// Well-known module exposing the remote's page map.
pub const PAGE_MAP_MODULE: &str = "./pages-map-v2";

/// Export of `PAGE_MAP_MODULE` holding the map.
pub const PAGE_MAP_EXPORT: &str = "default";

/// Optional metadata describing a remote application.
///
/// Served as JSON next to the bundle, e.g.
///
/// ```json
/// { "buildId": "a1b2", "assetPrefix": "/shop", "runtimeConfig": { "apiBase": "/api" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideConfig {
    /// Build identifier of the remote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,

    /// Prefix the remote serves its assets under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_prefix: Option<String>,

    /// Public runtime variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_config: Option<BTreeMap<String, serde_json::Value>>,
}

impl SideConfig {
    /// Look up one runtime variable.
    #[must_use]
    pub fn runtime_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.runtime_config.as_ref().and_then(|cfg| cfg.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_config_camel_case() {
        let cfg: SideConfig = serde_json::from_str(
            r#"{"buildId":"b-42","assetPrefix":"/shop","runtimeConfig":{"apiBase":"/api"}}"#,
        )
        .unwrap();

        assert_eq!(cfg.build_id.as_deref(), Some("b-42"));
        assert_eq!(cfg.asset_prefix.as_deref(), Some("/shop"));
        assert_eq!(
            cfg.runtime_value("apiBase"),
            Some(&serde_json::Value::String("/api".into()))
        );
    }

    #[test]
    fn test_side_config_all_fields_optional() {
        let cfg: SideConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SideConfig::default());
        assert!(cfg.runtime_value("anything").is_none());
        assert_eq!(serde_json::to_string(&cfg).unwrap(), "{}");
    }
}
