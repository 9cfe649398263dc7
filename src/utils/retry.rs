//! Retry configuration and FTP reply classification
//!
//! This module holds the knobs that decide how often a single password is
//! retried, how long to wait between retries, and which FTP reply codes are
//! worth retrying at all.

use crate::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, INTER_ATTEMPT_DELAY_MS, LOCKOUT_SIGNAL_CODES,
    PERMANENT_REPLY_CODES, RETRY_PAUSE_MS, TRANSIENT_REPLY_CODES,
};
use super::errors::ConfigError;
use std::collections::HashSet;
use std::time::Duration;

/// Configuration for one password's retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptConfig {
    /// Login attempts per password; zero is rejected by [`validate`](Self::validate)
    pub max_retries: u32,
    /// TCP connect and per-reply read timeout
    pub connect_timeout: Duration,
    /// Delay after a failed password before control returns to the caller
    pub inter_attempt_delay: Duration,
    /// Pause between retries after a transient reply or a timeout
    pub retry_pause: Duration,
}

impl Default for AttemptConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            inter_attempt_delay: Duration::from_millis(INTER_ATTEMPT_DELAY_MS),
            retry_pause: Duration::from_millis(RETRY_PAUSE_MS),
        }
    }
}

impl AttemptConfig {
    /// Single attempt per password (fail fast)
    pub fn no_retry() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Default retry budget with every pause set to zero
    pub fn instant() -> Self {
        Self {
            inter_attempt_delay: Duration::ZERO,
            retry_pause: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Upper bound on login calls for one password
    pub fn attempts(&self) -> u32 {
        self.max_retries
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        Ok(())
    }
}

/// How a rejected login should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyClass {
    /// Credential refused; retrying the same password is pointless
    Permanent,
    /// Server busy or throttling; the same password may be retried
    Transient,
}

/// Mapping table from FTP reply code to retry decision
///
/// Codes listed explicitly win. Anything else falls back to the RFC 959
/// reply families: `4yz` is transient, everything else is permanent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPolicy {
    permanent: HashSet<u16>,
    transient: HashSet<u16>,
    lockout: HashSet<u16>,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self::new(
            PERMANENT_REPLY_CODES.iter().copied(),
            TRANSIENT_REPLY_CODES.iter().copied(),
            LOCKOUT_SIGNAL_CODES.iter().copied(),
        )
    }
}

impl ReplyPolicy {
    pub fn new(
        permanent: impl IntoIterator<Item = u16>,
        transient: impl IntoIterator<Item = u16>,
        lockout: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            permanent: permanent.into_iter().collect(),
            transient: transient.into_iter().collect(),
            lockout: lockout.into_iter().collect(),
        }
    }

    /// Classify a rejected login reply
    pub fn classify(&self, code: u16) -> ReplyClass {
        if self.permanent.contains(&code) {
            return ReplyClass::Permanent;
        }
        if self.transient.contains(&code) {
            return ReplyClass::Transient;
        }

        match code / 100 {
            4 => ReplyClass::Transient,
            _ => ReplyClass::Permanent,
        }
    }

    /// Whether a transient reply suggests the server is throttling this account
    pub fn is_lockout_signal(&self, code: u16) -> bool {
        self.lockout.contains(&code)
    }
}

/// Injected sleep capability
///
/// Every delay in the attempt engine and backoff policy goes through this
/// trait so tests can observe pauses without waiting for them.
#[async_trait::async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Production pause backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait::async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::time::sleep(duration).await;
    }
}
