//! Structured logging helpers.
//!
//! Every remote-related log line carries the same fields so log queries can
//! group by remote:
//! - `remote`: global name of the remote
//! - `url`: bundle URL of the remote

/// Log a remote-related event with standard fields.
///
/// ```rust,ignore
/// log_remote_event!(info, "shop", url, "Remote container loaded");
/// log_remote_event!(error, "shop", url, "Remote load failed", error = %err);
/// ```
#[macro_export]
macro_rules! log_remote_event {
    ($level:ident, $remote:expr, $url:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            remote = %$remote,
            url = %$url,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macro_expands_without_subscriber() {
        let url = "http://localhost:3000/remoteEntry.js";
        crate::log_remote_event!(info, "home", url, "expanded");
        crate::log_remote_event!(warn, "home", url, "expanded", attempt = 1);
    }
}
