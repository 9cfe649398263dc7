//! Storm backoff: failure counters and the cooldowns they trigger
//!
//! The attempt engine updates [`BackoffState`]; the controller asks
//! [`BackoffPolicy::apply`] before every candidate whether a cooldown is due.

use super::report::{ReportSink, StatusEvent};
use crate::constants::{
    LOCKOUT_STORM_COOLDOWN_MS, LOCKOUT_STORM_THRESHOLD, TIMEOUT_STORM_COOLDOWN_MS,
    TIMEOUT_STORM_THRESHOLD,
};
use crate::utils::Pause;
use std::time::Duration;
use tracing::warn;

/// Failure counters owned by one controller run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackoffState {
    /// Timeouts since the last non-timeout outcome
    pub consecutive_timeouts: u32,
    /// Lockout-like replies since the last success
    pub lockout_signals: u32,
}

impl BackoffState {
    pub fn record_success(&mut self) {
        self.consecutive_timeouts = 0;
        self.lockout_signals = 0;
    }

    pub fn record_timeout(&mut self) {
        self.consecutive_timeouts += 1;
    }

    /// A permanent refusal always counts as a lockout signal
    pub fn record_lockout_signal(&mut self) {
        self.consecutive_timeouts = 0;
        self.lockout_signals += 1;
    }

    pub fn record_transient(&mut self, lockout: bool) {
        self.consecutive_timeouts = 0;
        if lockout {
            self.lockout_signals += 1;
        }
    }

    pub fn record_connection_error(&mut self) {
        self.consecutive_timeouts = 0;
    }
}

/// Which cooldowns fired during one [`BackoffPolicy::apply`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldowns {
    pub timeout_storm: bool,
    pub lockout_storm: bool,
}

impl Cooldowns {
    pub fn any(&self) -> bool {
        self.timeout_storm || self.lockout_storm
    }
}

/// Thresholds and cooldown lengths for storm detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub timeout_threshold: u32,
    pub timeout_cooldown: Duration,
    pub lockout_threshold: u32,
    pub lockout_cooldown: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            timeout_threshold: TIMEOUT_STORM_THRESHOLD,
            timeout_cooldown: Duration::from_millis(TIMEOUT_STORM_COOLDOWN_MS),
            lockout_threshold: LOCKOUT_STORM_THRESHOLD,
            lockout_cooldown: Duration::from_millis(LOCKOUT_STORM_COOLDOWN_MS),
        }
    }
}

impl BackoffPolicy {
    /// Run both storm checks, pausing and resetting each counter that tripped
    ///
    /// The checks are independent; both cooldowns can fire in one call.
    pub async fn apply(
        &self,
        state: &mut BackoffState,
        sink: &dyn ReportSink,
        pause: &dyn Pause,
    ) -> Cooldowns {
        let mut fired = Cooldowns::default();

        if state.consecutive_timeouts >= self.timeout_threshold {
            warn!(
                timeouts = state.consecutive_timeouts,
                cooldown = ?self.timeout_cooldown,
                "timeout storm, cooling down"
            );
            sink.emit(StatusEvent::Warning(format!(
                "{} consecutive timeouts, backing off for {:?}",
                state.consecutive_timeouts, self.timeout_cooldown
            )));
            pause.pause(self.timeout_cooldown).await;
            state.consecutive_timeouts = 0;
            fired.timeout_storm = true;
        }

        if state.lockout_signals >= self.lockout_threshold {
            warn!(
                signals = state.lockout_signals,
                cooldown = ?self.lockout_cooldown,
                "possible lockout, cooling down"
            );
            sink.emit(StatusEvent::Warning(format!(
                "{} lockout signals, possible rate limiting; backing off for {:?}",
                state.lockout_signals, self.lockout_cooldown
            )));
            pause.pause(self.lockout_cooldown).await;
            state.lockout_signals = 0;
            fired.lockout_storm = true;
        }

        fired
    }
}
