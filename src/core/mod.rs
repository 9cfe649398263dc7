//! Core business logic (platform-agnostic)
//!
//! CRITICAL: This module MUST NOT open sockets or write to the terminal itself.
//! Network access goes through [`session::FtpClient`], output through
//! [`report::ReportSink`].

pub mod attempt;
pub mod backoff;
pub mod candidates;
pub mod controller;
pub mod orchestrator;
pub mod report;
pub mod session;

// Test doubles for clients, engines and pauses (tests only)
#[cfg(test)]
pub mod mock_session;

pub use attempt::{AttemptEngine, AttemptOutcome, FtpAttemptEngine, SimulatedAttemptEngine};
pub use backoff::{BackoffPolicy, BackoffState, Cooldowns};
pub use candidates::{CandidateList, CandidateSource};
pub use controller::{BruteForceController, RunResult};
pub use orchestrator::AuthTest;
pub use report::{CollectingSink, NullSink, ReportSink, StatusEvent};
pub use session::{FtpClient, FtpReply, LoginReply};
