//! Utility functions for timestamping, log-safe truncation, and file system
//! validation.

use crate::error::AgentError;
use chrono::Local;
use tokio::fs;
use tracing::{info, instrument};

/// Current local time formatted the way run log records expect it.
///
/// Every record (query context, summary, run log) is stamped at
/// construction time with this format: `YYYY-MM-DD HH:MM:SS`.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended. Used to keep article digests and LLM
/// responses from flooding the logs.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test
/// by creating and immediately deleting a probe file. Run this at startup
/// so a bad log directory fails fast, before any summaries are computed.
///
/// # Errors
///
/// Returns [`AgentError::Persistence`] if the directory cannot be created
/// or is not writable (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), AgentError> {
    fs::create_dir_all(path).await?;
    let probe = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    fs::write(&probe, b"").await?;
    let _ = fs::remove_file(&probe).await;
    info!("log directory is writable");
    Ok(())
}
