//! Test doubles for the FTP client, the attempt engine and the pause capability
//!
//! Lets the attempt engine, controller and orchestrator be exercised without a
//! network or a wall clock.

use super::attempt::{AttemptEngine, AttemptOutcome};
use super::backoff::BackoffState;
use super::session::{FtpClient, FtpReply, LoginReply};
use crate::models::{Credentials, FtpTarget};
use crate::utils::{FtpError, Pause};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// One scripted server behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Accept,
    Reject(u16),
    Timeout,
    Refused,
}

impl MockResponse {
    fn into_result(self) -> Result<LoginReply, FtpError> {
        match self {
            MockResponse::Accept => Ok(LoginReply::Accepted),
            MockResponse::Reject(code) => Ok(LoginReply::Rejected(FtpReply::new(
                code,
                format!("mock reply {code}"),
            ))),
            MockResponse::Timeout => Err(FtpError::Timeout(Duration::from_secs(10))),
            MockResponse::Refused => Err(FtpError::Connection("Connection refused".to_string())),
        }
    }
}

/// Mock FTP server with per-password scripts
///
/// Each password maps to a queue of responses; the last entry repeats once
/// the queue is drained. Passwords without a script get the fallback.
pub struct MockFtpClient {
    scripts: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    fallback: MockResponse,
    calls: Mutex<Vec<String>>,
}

impl MockFtpClient {
    /// Server that refuses every password with `530`
    pub fn rejecting() -> Self {
        Self::with_fallback(MockResponse::Reject(530))
    }

    pub fn with_fallback(fallback: MockResponse) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Server that accepts exactly `password` and refuses the rest
    pub fn accepting(password: &str) -> Self {
        Self::rejecting().script(password, [MockResponse::Accept])
    }

    pub fn script(self, password: &str, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(password.to_string(), responses.into_iter().collect());
        self
    }

    /// Passwords sent to the server, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl FtpClient for MockFtpClient {
    async fn login(
        &self,
        _target: &FtpTarget,
        credentials: &Credentials,
        _timeout: Duration,
    ) -> Result<LoginReply, FtpError> {
        let password = credentials.password().as_str().to_string();
        self.calls.lock().unwrap().push(password.clone());

        let mut scripts = self.scripts.lock().unwrap();
        let response = match scripts.get_mut(&password) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| self.fallback.clone()),
            None => self.fallback.clone(),
        };
        response.into_result()
    }
}

/// Pause that returns immediately and remembers what it was asked for
#[derive(Default)]
pub struct RecordingPause {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.pauses.lock().unwrap().iter().sum()
    }
}

#[async_trait::async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

/// Attempt engine that answers from a fixed set of accepted passwords
///
/// Records every invocation so tests can check order and count.
pub struct RecordingEngine {
    accepted: Vec<String>,
    attempts: Mutex<Vec<String>>,
    probes: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub fn accepting(passwords: &[&str]) -> Self {
        Self {
            accepted: passwords.iter().map(|p| p.to_string()).collect(),
            attempts: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self::accepting(&[])
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    fn answer(&self, credentials: &Credentials) -> AttemptOutcome {
        if self
            .accepted
            .iter()
            .any(|p| p == credentials.password().as_str())
        {
            AttemptOutcome::Success
        } else {
            AttemptOutcome::PermanentFailure {
                reason: "530 Login incorrect".to_string(),
            }
        }
    }
}

#[async_trait::async_trait]
impl AttemptEngine for RecordingEngine {
    async fn probe(&self, credentials: &Credentials) -> AttemptOutcome {
        self.probes
            .lock()
            .unwrap()
            .push(credentials.password().as_str().to_string());
        self.answer(credentials)
    }

    async fn attempt(
        &self,
        credentials: &Credentials,
        _counters: Option<&mut BackoffState>,
    ) -> AttemptOutcome {
        self.attempts
            .lock()
            .unwrap()
            .push(credentials.password().as_str().to_string());
        self.answer(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Username;

    fn creds(password: &str) -> Credentials {
        Credentials::new(Username::new("FTPUSER").unwrap(), password)
    }

    #[tokio::test]
    async fn test_mock_script_repeats_last_response() {
        let client = MockFtpClient::rejecting()
            .script("flaky", [MockResponse::Reject(421), MockResponse::Accept]);
        let target = FtpTarget::new("mock", 21);
        let timeout = Duration::from_secs(1);

        let first = client.login(&target, &creds("flaky"), timeout).await.unwrap();
        assert!(matches!(first, LoginReply::Rejected(ref r) if r.code == 421));
        let second = client.login(&target, &creds("flaky"), timeout).await.unwrap();
        assert_eq!(second, LoginReply::Accepted);
        let third = client.login(&target, &creds("flaky"), timeout).await.unwrap();
        assert_eq!(third, LoginReply::Accepted);
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let client = MockFtpClient::accepting("right");
        let target = FtpTarget::new("mock", 21);
        let timeout = Duration::from_secs(1);

        let wrong = client.login(&target, &creds("wrong"), timeout).await.unwrap();
        assert!(matches!(wrong, LoginReply::Rejected(ref r) if r.code == 530));
        let right = client.login(&target, &creds("right"), timeout).await.unwrap();
        assert_eq!(right, LoginReply::Accepted);
        assert_eq!(client.calls(), vec!["wrong", "right"]);
    }

    #[tokio::test]
    async fn test_mock_transport_errors() {
        let target = FtpTarget::new("mock", 21);
        let timeout = Duration::from_secs(1);

        let slow = MockFtpClient::with_fallback(MockResponse::Timeout);
        assert!(matches!(
            slow.login(&target, &creds("x"), timeout).await,
            Err(FtpError::Timeout(_))
        ));

        let down = MockFtpClient::with_fallback(MockResponse::Refused);
        assert!(matches!(
            down.login(&target, &creds("x"), timeout).await,
            Err(FtpError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_recording_pause() {
        let pause = RecordingPause::new();
        pause.pause(Duration::from_secs(1)).await;
        pause.pause(Duration::from_millis(500)).await;
        assert_eq!(pause.pauses().len(), 2);
        assert_eq!(pause.total(), Duration::from_millis(1500));
    }
}
