//! Cache-busting for bundle URLs
//!
//! Every load appends the current time as a query parameter so a reload
//! within a session fetches fresh bytes instead of a cached script.

use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

/// Query parameter carrying the timestamp.
pub const CACHE_BUST_PARAM: &str = "t";

/// `url` with `t=<stamp>` set, replacing any existing `t`.
#[must_use]
pub fn cache_busted(url: &Url, stamp: u128) -> Url {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != CACHE_BUST_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
    busted
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
