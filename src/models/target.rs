//! FTP target description

use crate::constants::DEMO_TARGET;
use serde::Serialize;
use std::fmt;

/// Host and control port of the FTP service under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FtpTarget {
    pub host: String,
    pub port: u16,
}

impl FtpTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The `demo` token selects simulated mode instead of a real host
    pub fn is_demo(&self) -> bool {
        self.host.eq_ignore_ascii_case(DEMO_TARGET)
    }

    /// Address string accepted by `TcpStream::connect`
    pub fn socket_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for FtpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.socket_addr())
    }
}
