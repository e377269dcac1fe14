//! Where a remote's side config comes from

use shared_types::SideConfig;
use url::Url;

/// Side config supply mode of one remote. Only one is active per remote.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SideConfigSource {
    /// Nothing declared; resolves to `None`.
    #[default]
    Undeclared,
    /// Explicitly "no config". Terminal, never fetched.
    Absent,
    /// Already-resolved value.
    Resolved(SideConfig),
    /// Fetch and parse lazily, once.
    Url(Url),
}

impl SideConfigSource {
    /// Parse a side config URL.
    pub fn from_url(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::Url)
    }

    /// URL to fetch, if this source is fetchable.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }
}

impl From<SideConfig> for SideConfigSource {
    fn from(value: SideConfig) -> Self {
        Self::Resolved(value)
    }
}

impl From<Url> for SideConfigSource {
    fn from(value: Url) -> Self {
        Self::Url(value)
    }
}

impl From<Option<SideConfig>> for SideConfigSource {
    /// `None` is the explicit "no config" value.
    fn from(value: Option<SideConfig>) -> Self {
        value.map_or(Self::Absent, Self::Resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_undeclared() {
        assert_eq!(SideConfigSource::default(), SideConfigSource::Undeclared);
    }

    #[test]
    fn test_from_url() {
        let source = SideConfigSource::from_url("http://localhost:3001/next-config.json").unwrap();
        assert_eq!(
            source.url().map(Url::as_str),
            Some("http://localhost:3001/next-config.json")
        );
        assert!(SideConfigSource::from_url("not a url").is_err());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SideConfigSource::from(None), SideConfigSource::Absent);
        assert!(matches!(
            SideConfigSource::from(Some(SideConfig::default())),
            SideConfigSource::Resolved(_)
        ));
    }
}
