//! Auth test orchestration: default credential first, wordlist second

use super::attempt::AttemptEngine;
use super::candidates::CandidateSource;
use super::controller::{BruteForceController, RunResult};
use super::report::{ReportSink, StatusEvent};
use crate::models::{Credentials, Username};
use crate::utils::AuditError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs one complete credential audit against a single target
pub struct AuthTest<E> {
    controller: BruteForceController<E>,
    sink: Arc<dyn ReportSink>,
}

impl<E: AttemptEngine> AuthTest<E> {
    pub fn new(controller: BruteForceController<E>, sink: Arc<dyn ReportSink>) -> Self {
        Self { controller, sink }
    }

    pub fn controller(&self) -> &BruteForceController<E> {
        &self.controller
    }

    /// Probe the default credential, then fall back to the candidate list
    ///
    /// The candidate source is not touched when the default credential works.
    pub async fn run_auth_test(
        &self,
        username: &Username,
        default_password: &str,
        candidates: Option<CandidateSource>,
        cancel: &CancellationToken,
    ) -> Result<RunResult, AuditError> {
        let default = Credentials::new(username.clone(), default_password);

        self.sink.emit(StatusEvent::Info(
            "Testing FTP login with default credentials...".to_string(),
        ));
        if self.controller.engine().probe(&default).await.is_success() {
            info!(username = %username, "default credential accepted");
            let result = RunResult::Found {
                credentials: default,
            };
            self.sink.emit(StatusEvent::Finished {
                result: result.clone(),
            });
            return Ok(result);
        }

        match candidates {
            Some(source) => {
                self.sink.emit(StatusEvent::Info(
                    "Default login failed. Starting brute-force with wordlist.".to_string(),
                ));
                Ok(self
                    .controller
                    .run_source(username, source, cancel)
                    .await?)
            }
            None => {
                self.sink.emit(StatusEvent::Info(
                    "No valid credentials and no wordlist provided. Skipping brute-force."
                        .to_string(),
                ));
                let result = RunResult::Exhausted;
                self.sink.emit(StatusEvent::Finished {
                    result: result.clone(),
                });
                Ok(result)
            }
        }
    }
}
