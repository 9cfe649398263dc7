//! Attempt engine: one password, bounded retries
//!
//! [`FtpAttemptEngine`] drives an [`FtpClient`] through the retry loop for a
//! single credential, classifies every reply through the [`ReplyPolicy`] and
//! feeds the backoff counters of the running controller.
//!
//! [`SimulatedAttemptEngine`] wraps any engine for `--test` / `demo` runs.

use super::backoff::BackoffState;
use super::report::{ReportSink, StatusEvent};
use super::session::{FtpClient, LoginReply};
use crate::constants::{DEFAULT_PASSWORD, DEFAULT_USERNAME, SIMULATED_SENTINEL_PASSWORD};
use crate::models::{Credentials, FtpTarget};
use crate::utils::{AttemptConfig, FtpError, Pause, ReplyClass, ReplyPolicy};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one attempt at one credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    PermanentFailure { reason: String },
    TransientFailure { reason: String },
    Timeout,
    ConnectionError { reason: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

/// Something that can test a credential against the target
#[async_trait::async_trait]
pub trait AttemptEngine: Send + Sync {
    /// Single login, no retries, no counters, no delay
    async fn probe(&self, credentials: &Credentials) -> AttemptOutcome;

    /// Full retry loop for one credential
    ///
    /// `counters` belongs to the running controller; engines update it but
    /// never keep it.
    async fn attempt(
        &self,
        credentials: &Credentials,
        counters: Option<&mut BackoffState>,
    ) -> AttemptOutcome;
}

#[async_trait::async_trait]
impl AttemptEngine for Box<dyn AttemptEngine> {
    async fn probe(&self, credentials: &Credentials) -> AttemptOutcome {
        (**self).probe(credentials).await
    }

    async fn attempt(
        &self,
        credentials: &Credentials,
        counters: Option<&mut BackoffState>,
    ) -> AttemptOutcome {
        (**self).attempt(credentials, counters).await
    }
}

/// Attempt engine that talks to a real (or mock) FTP client
pub struct FtpAttemptEngine {
    client: Arc<dyn FtpClient>,
    target: FtpTarget,
    config: AttemptConfig,
    policy: ReplyPolicy,
    sink: Arc<dyn ReportSink>,
    pause: Arc<dyn Pause>,
}

/// What one underlying login call amounted to
enum Step {
    Done(AttemptOutcome),
    Retry(AttemptOutcome),
}

impl FtpAttemptEngine {
    pub fn new(
        client: Arc<dyn FtpClient>,
        target: FtpTarget,
        config: AttemptConfig,
        policy: ReplyPolicy,
        sink: Arc<dyn ReportSink>,
        pause: Arc<dyn Pause>,
    ) -> Self {
        Self {
            client,
            target,
            config,
            policy,
            sink,
            pause,
        }
    }

    pub fn target(&self) -> &FtpTarget {
        &self.target
    }

    /// One connect + login call, classified and reported
    async fn login_once(
        &self,
        credentials: &Credentials,
        attempt: u32,
        max_attempts: u32,
        mut counters: Option<&mut BackoffState>,
    ) -> Step {
        let username = credentials.username().as_str();
        let password = credentials.password().as_str();

        self.sink.emit(StatusEvent::Debug(format!(
            "Trying FTP login with: {username}:{password} (attempt {attempt}/{max_attempts})"
        )));

        let result = self
            .client
            .login(&self.target, credentials, self.config.connect_timeout)
            .await;

        match result {
            Ok(LoginReply::Accepted) => {
                if let Some(state) = counters.as_deref_mut() {
                    state.record_success();
                }
                info!(host = %self.target, username, "login accepted");
                self.sink.emit(StatusEvent::Success {
                    username: username.to_string(),
                    password: password.to_string(),
                    simulated: false,
                });
                Step::Done(AttemptOutcome::Success)
            }
            Ok(LoginReply::Rejected(reply)) => match self.policy.classify(reply.code) {
                ReplyClass::Permanent => {
                    if let Some(state) = counters.as_deref_mut() {
                        state.record_lockout_signal();
                    }
                    debug!(code = reply.code, username, "login rejected");
                    self.sink.emit(StatusEvent::Failed {
                        username: username.to_string(),
                        password: password.to_string(),
                        reason: reply.to_string(),
                    });
                    Step::Done(AttemptOutcome::PermanentFailure {
                        reason: reply.to_string(),
                    })
                }
                ReplyClass::Transient => {
                    let lockout = self.policy.is_lockout_signal(reply.code);
                    if let Some(state) = counters.as_deref_mut() {
                        state.record_transient(lockout);
                    }
                    warn!(code = reply.code, lockout, "transient server reply");
                    self.sink.emit(StatusEvent::TempError {
                        code: reply.code,
                        reason: reply.message.clone(),
                    });
                    Step::Retry(AttemptOutcome::TransientFailure {
                        reason: reply.to_string(),
                    })
                }
            },
            Err(FtpError::Timeout(after)) => {
                if let Some(state) = counters.as_deref_mut() {
                    state.record_timeout();
                }
                warn!(host = %self.target, ?after, "login timed out");
                self.sink.emit(StatusEvent::Timeout {
                    attempt,
                    max_attempts,
                });
                Step::Retry(AttemptOutcome::Timeout)
            }
            Err(FtpError::Connection(reason)) => {
                if let Some(state) = counters.as_deref_mut() {
                    state.record_connection_error();
                }
                warn!(host = %self.target, %reason, "connection failed");
                self.sink.emit(StatusEvent::ConnectionFailure {
                    target: self.target.to_string(),
                    reason: reason.clone(),
                });
                Step::Done(AttemptOutcome::ConnectionError { reason })
            }
        }
    }
}

#[async_trait::async_trait]
impl AttemptEngine for FtpAttemptEngine {
    async fn probe(&self, credentials: &Credentials) -> AttemptOutcome {
        match self.login_once(credentials, 1, 1, None).await {
            Step::Done(outcome) | Step::Retry(outcome) => outcome,
        }
    }

    async fn attempt(
        &self,
        credentials: &Credentials,
        mut counters: Option<&mut BackoffState>,
    ) -> AttemptOutcome {
        let max_attempts = self.config.attempts();
        let mut outcome = AttemptOutcome::Timeout;

        for attempt in 1..=max_attempts {
            match self
                .login_once(credentials, attempt, max_attempts, counters.as_deref_mut())
                .await
            {
                Step::Done(AttemptOutcome::Success) => return AttemptOutcome::Success,
                Step::Done(done) => {
                    outcome = done;
                    break;
                }
                Step::Retry(retry) => {
                    outcome = retry;
                    self.pause.pause(self.config.retry_pause).await;
                }
            }
        }

        self.pause.pause(self.config.inter_attempt_delay).await;
        outcome
    }
}

/// Test-mode engine: fixed sentinels short-circuit the network
///
/// The default-credential probe is a pure comparison against the sentinel
/// pair and never reaches the wrapped engine. During brute-force, the
/// sentinel candidate succeeds locally and every other candidate is handed
/// to the wrapped engine unchanged.
pub struct SimulatedAttemptEngine<E> {
    inner: E,
    sink: Arc<dyn ReportSink>,
    default_username: String,
    default_password: String,
    sentinel_password: String,
}

impl<E: AttemptEngine> SimulatedAttemptEngine<E> {
    pub fn new(inner: E, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            inner,
            sink,
            default_username: DEFAULT_USERNAME.to_string(),
            default_password: DEFAULT_PASSWORD.to_string(),
            sentinel_password: SIMULATED_SENTINEL_PASSWORD.to_string(),
        }
    }

    /// Replace the candidate that succeeds without contacting the target
    pub fn with_sentinel(mut self, password: impl Into<String>) -> Self {
        self.sentinel_password = password.into();
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn simulated_success(&self, credentials: &Credentials) -> AttemptOutcome {
        self.sink.emit(StatusEvent::Success {
            username: credentials.username().as_str().to_string(),
            password: credentials.password().as_str().to_string(),
            simulated: true,
        });
        AttemptOutcome::Success
    }
}

#[async_trait::async_trait]
impl<E: AttemptEngine> AttemptEngine for SimulatedAttemptEngine<E> {
    async fn probe(&self, credentials: &Credentials) -> AttemptOutcome {
        self.sink.emit(StatusEvent::Info(
            "[TEST MODE] Simulated FTP test running...".to_string(),
        ));

        if credentials.matches(&self.default_username, &self.default_password) {
            return self.simulated_success(credentials);
        }

        let reason = "simulated credentials incorrect".to_string();
        self.sink.emit(StatusEvent::Failed {
            username: credentials.username().as_str().to_string(),
            password: credentials.password().as_str().to_string(),
            reason: reason.clone(),
        });
        AttemptOutcome::PermanentFailure { reason }
    }

    async fn attempt(
        &self,
        credentials: &Credentials,
        counters: Option<&mut BackoffState>,
    ) -> AttemptOutcome {
        if credentials.password().as_str() == self.sentinel_password {
            if let Some(state) = counters {
                state.record_success();
            }
            return self.simulated_success(credentials);
        }
        self.inner.attempt(credentials, counters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock_session::{MockFtpClient, MockResponse, RecordingEngine, RecordingPause};
    use crate::core::report::CollectingSink;
    use crate::models::Username;
    use std::time::Duration;

    fn creds(password: &str) -> Credentials {
        Credentials::new(Username::new("FTPUSER").unwrap(), password)
    }

    struct Harness {
        client: Arc<MockFtpClient>,
        sink: Arc<CollectingSink>,
        pause: Arc<RecordingPause>,
        engine: FtpAttemptEngine,
    }

    fn harness(client: MockFtpClient) -> Harness {
        let client = Arc::new(client);
        let sink = Arc::new(CollectingSink::new());
        let pause = Arc::new(RecordingPause::new());
        let engine = FtpAttemptEngine::new(
            client.clone(),
            FtpTarget::new("mock", 21),
            AttemptConfig::default(),
            ReplyPolicy::default(),
            sink.clone(),
            pause.clone(),
        );
        Harness {
            client,
            sink,
            pause,
            engine,
        }
    }

    #[tokio::test]
    async fn test_success_returns_immediately_and_resets_counters() {
        let h = harness(MockFtpClient::accepting("TAIL"));
        let mut state = BackoffState {
            consecutive_timeouts: 2,
            lockout_signals: 2,
        };

        let outcome = h.engine.attempt(&creds("TAIL"), Some(&mut state)).await;

        assert_eq!(outcome, AttemptOutcome::Success);
        assert_eq!(state, BackoffState::default());
        assert_eq!(h.client.call_count(), 1);
        assert!(h.pause.pauses().is_empty());
    }

    #[tokio::test]
    async fn test_permanent_failure_stops_retrying() {
        let h = harness(MockFtpClient::rejecting());
        let mut state = BackoffState::default();

        let outcome = h.engine.attempt(&creds("wrong"), Some(&mut state)).await;

        assert!(matches!(outcome, AttemptOutcome::PermanentFailure { ref reason } if reason.starts_with("530")));
        assert_eq!(h.client.call_count(), 1);
        assert_eq!(state.lockout_signals, 1);
        assert_eq!(h.pause.pauses(), vec![Duration::from_millis(500)]);
    }

    #[tokio::test]
    async fn test_transient_failure_is_bounded_by_max_retries() {
        let h = harness(MockFtpClient::with_fallback(MockResponse::Reject(450)));
        let mut state = BackoffState::default();

        let outcome = h.engine.attempt(&creds("busy"), Some(&mut state)).await;

        assert!(matches!(outcome, AttemptOutcome::TransientFailure { .. }));
        assert_eq!(h.client.call_count(), 2);
        // 450 is not a lockout code
        assert_eq!(state.lockout_signals, 0);
        assert_eq!(
            h.pause.pauses(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_millis(500)
            ]
        );
    }

    #[tokio::test]
    async fn test_transient_lockout_code_counts_signal() {
        let h = harness(MockFtpClient::with_fallback(MockResponse::Reject(421)));
        let mut state = BackoffState::default();

        h.engine.attempt(&creds("busy"), Some(&mut state)).await;

        assert_eq!(state.lockout_signals, 2);
        assert_eq!(
            h.sink
                .count(|e| matches!(e, StatusEvent::TempError { code: 421, .. })),
            2
        );
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let h = harness(
            MockFtpClient::rejecting().script("pw", [MockResponse::Reject(421), MockResponse::Accept]),
        );
        let mut state = BackoffState::default();

        let outcome = h.engine.attempt(&creds("pw"), Some(&mut state)).await;

        assert_eq!(outcome, AttemptOutcome::Success);
        assert_eq!(h.client.call_count(), 2);
        assert_eq!(state, BackoffState::default());
        assert_eq!(h.pause.pauses(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_timeouts_count_and_retry() {
        let h = harness(MockFtpClient::with_fallback(MockResponse::Timeout));
        let mut state = BackoffState::default();

        let outcome = h.engine.attempt(&creds("slow"), Some(&mut state)).await;

        assert_eq!(outcome, AttemptOutcome::Timeout);
        assert_eq!(h.client.call_count(), 2);
        assert_eq!(state.consecutive_timeouts, 2);
        // Every timeout waits out the retry pause, the last one included
        assert_eq!(
            h.pause.pauses(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_millis(500)
            ]
        );
        assert_eq!(
            h.sink.count(|e| matches!(e, StatusEvent::Timeout { .. })),
            2
        );
    }

    #[tokio::test]
    async fn test_non_timeout_resets_timeout_counter() {
        let h = harness(MockFtpClient::rejecting());
        let mut state = BackoffState {
            consecutive_timeouts: 2,
            lockout_signals: 1,
        };

        h.engine.attempt(&creds("wrong"), Some(&mut state)).await;

        assert_eq!(state.consecutive_timeouts, 0);
        assert_eq!(state.lockout_signals, 2);
    }

    #[tokio::test]
    async fn test_connection_error_stops_retrying() {
        let h = harness(MockFtpClient::with_fallback(MockResponse::Refused));

        let outcome = h.engine.attempt(&creds("pw"), None).await;

        assert!(matches!(outcome, AttemptOutcome::ConnectionError { .. }));
        assert_eq!(h.client.call_count(), 1);
        assert_eq!(
            h.sink
                .count(|e| matches!(e, StatusEvent::ConnectionFailure { .. })),
            1
        );
    }

    #[tokio::test]
    async fn test_one_debug_event_per_login_call() {
        let h = harness(MockFtpClient::with_fallback(MockResponse::Timeout));

        h.engine.attempt(&creds("slow"), None).await;

        let debug_lines: Vec<String> = h
            .sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                StatusEvent::Debug(line) => Some(line),
                _ => None,
            })
            .collect();
        assert_eq!(debug_lines.len(), 2);
        assert!(debug_lines[0].contains("FTPUSER:slow"));
    }

    #[tokio::test]
    async fn test_probe_is_single_shot() {
        let h = harness(MockFtpClient::with_fallback(MockResponse::Reject(421)));

        let outcome = h.engine.probe(&creds("TAIL")).await;

        assert!(matches!(outcome, AttemptOutcome::TransientFailure { .. }));
        assert_eq!(h.client.call_count(), 1);
        assert!(h.pause.pauses().is_empty());
    }

    #[tokio::test]
    async fn test_login_calls_never_exceed_max_retries() {
        let client = Arc::new(MockFtpClient::with_fallback(MockResponse::Reject(421)));
        let engine = FtpAttemptEngine::new(
            client.clone(),
            FtpTarget::new("mock", 21),
            AttemptConfig {
                max_retries: 3,
                ..AttemptConfig::instant()
            },
            ReplyPolicy::default(),
            Arc::new(CollectingSink::new()),
            Arc::new(RecordingPause::new()),
        );

        engine.attempt(&creds("pw"), None).await;
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_simulated_probe_matches_default_pair_only() {
        let sink = Arc::new(CollectingSink::new());
        let engine = SimulatedAttemptEngine::new(RecordingEngine::rejecting(), sink.clone());

        assert!(engine.probe(&creds("TAIL")).await.is_success());
        assert!(!engine.probe(&creds("other")).await.is_success());
        assert!(engine.inner().probes().is_empty());
        assert_eq!(
            sink.count(|e| matches!(e, StatusEvent::Success { simulated: true, .. })),
            1
        );
    }

    #[tokio::test]
    async fn test_simulated_sentinel_skips_inner_engine() {
        let sink = Arc::new(CollectingSink::new());
        let engine = SimulatedAttemptEngine::new(RecordingEngine::rejecting(), sink);
        let mut state = BackoffState {
            consecutive_timeouts: 1,
            lockout_signals: 2,
        };

        assert!(engine.attempt(&creds("naruto"), Some(&mut state)).await.is_success());
        assert!(!engine.attempt(&creds("admin"), Some(&mut state)).await.is_success());
        assert_eq!(engine.inner().attempts(), vec!["admin"]);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(AttemptOutcome::PermanentFailure {
            reason: "530 Login incorrect".to_string(),
        })
        .unwrap();
        assert_eq!(json["outcome"], "permanent_failure");
        assert_eq!(json["reason"], "530 Login incorrect");
    }
}
