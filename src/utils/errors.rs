//! Error types for ftpprobe
//!
//! All error types use thiserror for clean error handling.
//! SECURITY: Error messages MUST NOT contain passwords or sensitive data.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error for an audit run
///
/// Only setup problems end up here. Per-attempt FTP failures are reported as
/// [`crate::core::AttemptOutcome`] values and never abort a run.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Wordlist error: {0}")]
    Wordlist(#[from] WordlistError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Transport-level failures surfaced by an FTP client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FtpError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Errors from loading a candidate password list
#[derive(Debug, thiserror::Error)]
pub enum WordlistError {
    #[error("Failed to read wordlist {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from building a credential
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Invalid username format: {0}")]
    InvalidUsername(String),
}

/// Errors from parsing the target host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("Target host cannot be empty")]
    Empty,

    #[error("Invalid port in target '{0}'")]
    InvalidPort(String),
}

/// Errors from invalid tuning values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_retries must be at least 1")]
    ZeroRetries,
}
