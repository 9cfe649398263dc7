//! # Application-Wide Constants
//!
//! Default timings, credentials and reply codes used throughout ftpprobe.
//!
//! Everything here is a default: the CLI and the config structs in
//! [`crate::utils::retry`] and [`crate::core::backoff`] can override them.
//!
//! ## Usage
//!
//! ```rust
//! use ftpprobe::constants::*;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_secs(CONNECT_TIMEOUT_SECS);
//! assert_eq!(timeout.as_secs(), 10);
//! ```

// ============================================================================
// Target Defaults
// ============================================================================

/// Control port used when the target does not carry an explicit `:port`
pub const DEFAULT_FTP_PORT: u16 = 21;

/// Target token that runs the audit in simulated mode without a real host
pub const DEMO_TARGET: &str = "demo";

/// Username tried when none is given on the command line
pub const DEFAULT_USERNAME: &str = "FTPUSER";

/// Factory default password probed before any wordlist is consulted
pub const DEFAULT_PASSWORD: &str = "TAIL";

/// Candidate that the simulated engine accepts without contacting the target
pub const SIMULATED_SENTINEL_PASSWORD: &str = "naruto";

// ============================================================================
// Attempt Engine Timings
// ============================================================================

/// Login attempts made for one password before moving to the next
///
/// Only transient replies and timeouts consume more than one attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// TCP connect and per-reply read timeout (seconds)
///
/// **Rationale**: 10 seconds covers slow greetings from embedded FTP daemons
/// while still surfacing a dead host quickly.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Delay after every failed password before the next one is tried (milliseconds)
pub const INTER_ATTEMPT_DELAY_MS: u64 = 500;

/// Pause between retries of the same password after a transient reply or timeout
pub const RETRY_PAUSE_MS: u64 = 1000;

// ============================================================================
// Storm Backoff
// ============================================================================

/// Consecutive timeouts that trigger the timeout cooldown
pub const TIMEOUT_STORM_THRESHOLD: u32 = 3;

/// Cooldown applied after a timeout storm (milliseconds)
pub const TIMEOUT_STORM_COOLDOWN_MS: u64 = 2000;

/// Accumulated lockout signals that trigger the lockout cooldown
pub const LOCKOUT_STORM_THRESHOLD: u32 = 3;

/// Cooldown applied after a lockout storm (milliseconds)
///
/// Longer than the timeout cooldown: a server that starts refusing logins
/// usually needs more time to release its throttle than a congested link.
pub const LOCKOUT_STORM_COOLDOWN_MS: u64 = 3000;

// ============================================================================
// FTP Reply Codes
// ============================================================================

/// Codes that reject the credential outright (RFC 959 / RFC 2228)
///
/// - **530**: Not logged in
/// - **430**: Invalid username or password (non-standard, seen on IIS)
/// - **332**: Need account for login
pub const PERMANENT_REPLY_CODES: &[u16] = &[530, 430, 332];

/// Codes that indicate the server is busy and the attempt may succeed later
///
/// - **421**: Service not available, closing control connection
/// - **450**: Requested action not taken, file/resource unavailable
/// - **451**: Local error in processing
pub const TRANSIENT_REPLY_CODES: &[u16] = &[421, 450, 451];

/// Transient codes that also count towards the lockout storm detector
///
/// 421 is what most daemons send once a per-IP connection or login limit kicks in.
pub const LOCKOUT_SIGNAL_CODES: &[u16] = &[421];

// ============================================================================
// Logging
// ============================================================================

/// Environment variable holding a `tracing` filter directive
pub const LOG_FILTER_ENV: &str = "FTPPROBE_LOG";

/// Environment variable naming an optional append-mode log file
pub const LOG_FILE_ENV: &str = "FTPPROBE_LOG_FILE";

/// Log file size after which it is rotated to `<name>.log.bak`
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024; // 10 MB

/// Maximum username length accepted for a credential
pub const MAX_USERNAME_LENGTH: usize = 256;
