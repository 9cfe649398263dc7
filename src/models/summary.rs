//! Machine-readable audit summary

use super::FtpTarget;
use crate::core::RunResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One finished audit, as printed by `--json`
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub target: FtpTarget,
    pub username: String,
    pub simulated: bool,
    pub result: RunResult,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl AuditSummary {
    pub fn new(
        target: FtpTarget,
        username: impl Into<String>,
        simulated: bool,
        result: RunResult,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            target,
            username: username.into(),
            simulated,
            result,
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
        }
    }
}
