//! # Utilities Module
//!
//! Cross-cutting concerns shared by the core and platform layers.
//!
//! ## Modules
//!
//! - [`errors`]: Typed error hierarchy using `thiserror`
//! - [`retry`]: Retry budget, reply-code classification and the injected pause
//!
//! ## Design Notes
//!
//! Error types live here so `core` and `platform` can both depend on them
//! without depending on each other. Transient replies (server busy, throttled)
//! are retried on the same password; permanent replies (credential refused)
//! move straight to the next candidate.

pub mod errors;
pub mod retry;

pub use errors::{AuditError, ConfigError, CredentialError, FtpError, TargetError, WordlistError};
pub use retry::{AttemptConfig, Pause, ReplyClass, ReplyPolicy, TokioPause};
