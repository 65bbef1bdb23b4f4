//! Run log persistence.
//!
//! One file per batch invocation:
//!
//! ```text
//! {log_dir}/news_agent_run_id:{RunLog.id}.json
//! ```
//!
//! The content is the run log serialized as indented JSON so it stays
//! readable without tooling. A failed write is fatal to the batch; there
//! is no retry.

use crate::error::AgentError;
use crate::models::RunLog;
use tokio::fs;
use tracing::{info, instrument};

/// File name a run log is stored under, derived from its stable id.
pub fn run_log_filename(log: &RunLog) -> String {
    format!("news_agent_run_id:{}.json", log.id)
}

/// Write the run log into `dir`, creating the folder if needed.
///
/// # Errors
///
/// [`AgentError::Persistence`] if the folder cannot be created or the
/// write fails; [`AgentError::Serialization`] if the log cannot be
/// serialized.
#[instrument(level = "info", skip_all, fields(dir = %dir))]
pub async fn write_run_log(log: &RunLog, dir: &str) -> Result<(), AgentError> {
    let json = log.to_json_pretty()?;

    fs::create_dir_all(dir).await?;
    let path = format!("{}/{}", dir.trim_end_matches('/'), run_log_filename(log));
    fs::write(&path, json).await?;

    info!(%path, summaries = log.summaries.len(), "wrote run log");
    Ok(())
}
