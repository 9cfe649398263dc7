//! Audit configuration and pipeline assembly
//!
//! [`AuditConfig`] gathers everything one run needs. The CLI fills it from
//! flags; embedders can build it directly and start from `Default`.

use crate::constants::{DEFAULT_PASSWORD, DEFAULT_USERNAME, SIMULATED_SENTINEL_PASSWORD};
use crate::core::{
    AttemptEngine, AuthTest, BackoffPolicy, BruteForceController, CandidateSource,
    FtpAttemptEngine, FtpClient, ReportSink, SimulatedAttemptEngine,
};
use crate::models::{FtpTarget, Username};
use crate::normalize::normalize_target;
use crate::utils::{AttemptConfig, AuditError, Pause, ReplyPolicy};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub target: FtpTarget,
    pub username: Username,
    pub default_password: String,
    pub wordlist: Option<PathBuf>,
    /// Sentinel-driven test mode; forced on for the `demo` target
    pub simulated: bool,
    pub sentinel_password: String,
    pub attempt: AttemptConfig,
    pub backoff: BackoffPolicy,
    pub replies: ReplyPolicy,
}

impl AuditConfig {
    /// Validate raw target/username strings and fill in the defaults
    pub fn new(target: &str, username: &str) -> Result<Self, AuditError> {
        Ok(Self {
            target: normalize_target(target)?,
            username: Username::new(username)?,
            default_password: DEFAULT_PASSWORD.to_string(),
            wordlist: None,
            simulated: false,
            sentinel_password: SIMULATED_SENTINEL_PASSWORD.to_string(),
            attempt: AttemptConfig::default(),
            backoff: BackoffPolicy::default(),
            replies: ReplyPolicy::default(),
        })
    }

    /// Config for the default `FTPUSER` account
    pub fn for_target(target: &str) -> Result<Self, AuditError> {
        Self::new(target, DEFAULT_USERNAME)
    }

    /// Reject tunables that cannot drive a run
    pub fn validate(&self) -> Result<(), AuditError> {
        self.attempt.validate()?;
        Ok(())
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated || self.target.is_demo()
    }

    pub fn candidates(&self) -> Option<CandidateSource> {
        self.wordlist.clone().map(CandidateSource::File)
    }

    /// Wire engine, controller and orchestrator around the given capabilities
    pub fn build(
        &self,
        client: Arc<dyn FtpClient>,
        sink: Arc<dyn ReportSink>,
        pause: Arc<dyn Pause>,
    ) -> AuthTest<Box<dyn AttemptEngine>> {
        let live = FtpAttemptEngine::new(
            client,
            self.target.clone(),
            self.attempt.clone(),
            self.replies.clone(),
            sink.clone(),
            pause.clone(),
        );

        let engine: Box<dyn AttemptEngine> = if self.is_simulated() {
            Box::new(
                SimulatedAttemptEngine::new(live, sink.clone())
                    .with_sentinel(self.sentinel_password.clone()),
            )
        } else {
            Box::new(live)
        };

        let controller =
            BruteForceController::new(engine, self.backoff.clone(), sink.clone(), pause);
        AuthTest::new(controller, sink)
    }
}
