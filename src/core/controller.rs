//! Brute-force controller
//!
//! Walks the candidate list once, in order, one attempt at a time. Before each
//! candidate the backoff policy gets a chance to cool things down; the first
//! accepted password ends the run.

use super::attempt::AttemptEngine;
use super::backoff::{BackoffPolicy, BackoffState};
use super::candidates::{CandidateList, CandidateSource};
use super::report::{ReportSink, StatusEvent};
use crate::models::{Credentials, Username};
use crate::utils::{Pause, WordlistError};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Terminal result of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunResult {
    /// First credential the target accepted
    Found { credentials: Credentials },
    /// Every candidate was tried and refused
    Exhausted,
    /// Stopped between attempts by the cancellation token
    Cancelled { attempted: usize },
}

impl RunResult {
    pub fn found(&self) -> Option<&Credentials> {
        match self {
            RunResult::Found { credentials } => Some(credentials),
            _ => None,
        }
    }
}

/// Drives the candidate list through an attempt engine
pub struct BruteForceController<E> {
    engine: E,
    policy: BackoffPolicy,
    sink: Arc<dyn ReportSink>,
    pause: Arc<dyn Pause>,
}

impl<E: AttemptEngine> BruteForceController<E> {
    pub fn new(
        engine: E,
        policy: BackoffPolicy,
        sink: Arc<dyn ReportSink>,
        pause: Arc<dyn Pause>,
    ) -> Self {
        Self {
            engine,
            policy,
            sink,
            pause,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Try every candidate for `username` until one is accepted
    pub async fn run(
        &self,
        username: &Username,
        candidates: &CandidateList,
        cancel: &CancellationToken,
    ) -> RunResult {
        let mut state = BackoffState::default();
        let total = candidates.len();
        let mut result = RunResult::Exhausted;

        info!(total, username = %username, "brute-force started");

        for (index, password) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                self.sink.emit(StatusEvent::Warning(format!(
                    "Cancelled after {index} of {total} candidates"
                )));
                result = RunResult::Cancelled { attempted: index };
                break;
            }

            self.policy
                .apply(&mut state, self.sink.as_ref(), self.pause.as_ref())
                .await;

            self.sink.emit(StatusEvent::ProgressTick {
                index,
                total,
                current: password.clone(),
            });

            let credentials = Credentials::new(username.clone(), password);
            if self
                .engine
                .attempt(&credentials, Some(&mut state))
                .await
                .is_success()
            {
                result = RunResult::Found { credentials };
                break;
            }
        }

        info!(
            found = result.found().is_some(),
            "brute-force finished"
        );
        self.sink.emit(StatusEvent::Finished {
            result: result.clone(),
        });
        result
    }

    /// Load `source` and run it
    ///
    /// A list that cannot be loaded ends the run before any attempt: the
    /// error is reported, the run finishes as exhausted, and the error is
    /// handed back so the caller can fail the process.
    pub async fn run_source(
        &self,
        username: &Username,
        source: CandidateSource,
        cancel: &CancellationToken,
    ) -> Result<RunResult, WordlistError> {
        match source.load().await {
            Ok(candidates) => Ok(self.run(username, &candidates, cancel).await),
            Err(err) => {
                error!(%err, "wordlist could not be loaded");
                self.sink
                    .emit(StatusEvent::Error(format!("Failed to load wordlist: {err}")));
                self.sink.emit(StatusEvent::Finished {
                    result: RunResult::Exhausted,
                });
                Err(err)
            }
        }
    }
}
