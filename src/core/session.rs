//! FTP client abstraction
//!
//! This trait allows testing without real servers by supporting mock implementations.
//! The TCP implementation lives in `src/platform/ftp.rs`.

use crate::models::{Credentials, FtpTarget};
use crate::utils::FtpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One FTP server reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtpReply {
    /// Three-digit reply code (e.g. 230, 530)
    pub code: u16,
    /// Reply text without the code prefix
    pub message: String,
}

impl FtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// `1yz` positive preliminary reply
    pub fn is_preliminary(&self) -> bool {
        self.code / 100 == 1
    }

    /// `2yz` positive completion reply
    pub fn is_completion(&self) -> bool {
        self.code / 100 == 2
    }

    /// `3yz` positive intermediate reply
    pub fn is_intermediate(&self) -> bool {
        self.code / 100 == 3
    }
}

impl fmt::Display for FtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// Result of a completed USER/PASS exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReply {
    /// Server answered with a `2yz` completion reply
    Accepted,
    /// Server refused at some stage; carries the refusing reply
    Rejected(FtpReply),
}

/// FTP client trait for abstraction over real/mock implementations
///
/// One call is one scoped session: connect, log in, disconnect. The
/// connection never outlives the call.
#[async_trait::async_trait]
pub trait FtpClient: Send + Sync {
    /// Connect to `target` and try to log in with `credentials`
    ///
    /// Protocol-level refusals come back as `Ok(LoginReply::Rejected(..))`.
    /// `Err` is reserved for timeouts and transport failures.
    async fn login(
        &self,
        target: &FtpTarget,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<LoginReply, FtpError>;
}
