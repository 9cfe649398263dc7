//! ftpprobe - FTP credential auditing
//!
//! Probes a default credential, then walks a password list with bounded
//! retries and lockout-aware backoff. The decision logic lives in [`core`];
//! sockets and terminal output live in [`platform`].

pub mod config;
pub mod constants;
pub mod core;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod platform;
pub mod utils;

// Re-export commonly used types
pub use config::AuditConfig;
pub use crate::core::{AttemptOutcome, AuthTest, CandidateList, CandidateSource, RunResult, StatusEvent};
pub use models::{Credentials, FtpTarget, SecureString, Username};
pub use utils::{AuditError, ConfigError, CredentialError, FtpError, TargetError, WordlistError};
