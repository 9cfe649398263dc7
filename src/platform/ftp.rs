//! FTP login over a plain TCP control connection
//!
//! Implements just enough of RFC 959 to answer "does this USER/PASS pair log
//! in": greeting, USER, PASS, QUIT. No data connections are opened.

use crate::core::session::{FtpClient, FtpReply, LoginReply};
use crate::models::{Credentials, FtpTarget};
use crate::utils::FtpError;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Longest reply line accepted before the server is treated as broken
const MAX_REPLY_LINE: usize = 4096;

/// Most lines accepted in one multi-line reply
const MAX_REPLY_LINES: usize = 64;

/// Production FTP client
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpFtpClient;

impl TcpFtpClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl FtpClient for TcpFtpClient {
    async fn login(
        &self,
        target: &FtpTarget,
        credentials: &Credentials,
        limit: Duration,
    ) -> Result<LoginReply, FtpError> {
        let addr = target.socket_addr();
        debug!(%addr, "connecting");

        let stream = timeout(limit, TcpStream::connect(&addr))
            .await
            .map_err(|_| FtpError::Timeout(limit))?
            .map_err(|e| FtpError::Connection(format!("{addr}: {e}")))?;

        // The whole greeting/USER/PASS exchange shares one deadline
        let mut control = ControlConnection::new(stream, limit);
        let result = timeout(limit, control.authenticate(credentials))
            .await
            .unwrap_or(Err(FtpError::Timeout(limit)));
        control.quit().await;
        result
    }
}

/// One control connection; dropped (and closed) at the end of `login`
struct ControlConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    limit: Duration,
}

impl ControlConnection {
    fn new(stream: TcpStream, limit: Duration) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: write,
            limit,
        }
    }

    async fn authenticate(&mut self, credentials: &Credentials) -> Result<LoginReply, FtpError> {
        let username = credentials.username().as_str();
        let password = credentials.password().as_str();
        if password.contains(['\r', '\n']) {
            return Ok(LoginReply::Rejected(FtpReply::new(
                501,
                "Password contains line breaks",
            )));
        }

        // 120 means "ready in nnn minutes"; the real greeting follows
        let mut greeting = self.read_reply().await?;
        while greeting.is_preliminary() {
            greeting = self.read_reply().await?;
        }
        if !greeting.is_completion() {
            return Ok(LoginReply::Rejected(greeting));
        }

        self.send(&format!("USER {username}")).await?;
        let user_reply = self.read_reply().await?;
        if user_reply.is_completion() {
            return Ok(LoginReply::Accepted);
        }
        if !user_reply.is_intermediate() {
            return Ok(LoginReply::Rejected(user_reply));
        }

        self.send(&format!("PASS {password}")).await?;
        let pass_reply = self.read_reply().await?;
        if pass_reply.is_completion() {
            Ok(LoginReply::Accepted)
        } else {
            Ok(LoginReply::Rejected(pass_reply))
        }
    }

    /// Best-effort polite close
    async fn quit(&mut self) {
        let _ = timeout(self.limit, self.writer.write_all(b"QUIT\r\n")).await;
        let _ = timeout(self.limit, self.writer.shutdown()).await;
    }

    async fn send(&mut self, command: &str) -> Result<(), FtpError> {
        // Never trace the PASS argument
        trace!(command = command.split(' ').next().unwrap_or(""), "send");
        let line = format!("{command}\r\n");
        timeout(self.limit, self.writer.write_all(line.as_bytes()))
            .await
            .map_err(|_| FtpError::Timeout(self.limit))?
            .map_err(|e| FtpError::Connection(e.to_string()))
    }

    async fn read_line(&mut self) -> Result<String, FtpError> {
        let mut line = String::new();
        let mut bounded = (&mut self.reader).take(MAX_REPLY_LINE as u64 + 1);
        let read = timeout(self.limit, bounded.read_line(&mut line))
            .await
            .map_err(|_| FtpError::Timeout(self.limit))?
            .map_err(|e| FtpError::Connection(e.to_string()))?;
        if read == 0 {
            return Err(FtpError::Connection(
                "Connection closed by server".to_string(),
            ));
        }
        if line.len() > MAX_REPLY_LINE {
            return Err(FtpError::Connection("Reply line too long".to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read a complete (possibly multi-line) reply
    async fn read_reply(&mut self) -> Result<FtpReply, FtpError> {
        let first = self.read_line().await?;
        let (code, separator, text) = split_reply_line(&first)
            .ok_or_else(|| FtpError::Connection(format!("Malformed reply: {first}")))?;

        let mut message = text.to_string();
        if separator == '-' {
            // Continuation lines run until "<code> " on a line of its own
            let mut lines = 1;
            loop {
                if lines >= MAX_REPLY_LINES {
                    return Err(FtpError::Connection(format!(
                        "Reply {code} exceeds {MAX_REPLY_LINES} lines"
                    )));
                }
                lines += 1;
                let line = self.read_line().await?;
                match split_reply_line(&line) {
                    Some((end, ' ', text)) if end == code => {
                        message.push('\n');
                        message.push_str(text);
                        break;
                    }
                    _ => {
                        message.push('\n');
                        message.push_str(line.trim());
                    }
                }
            }
        }

        trace!(code, "reply");
        Ok(FtpReply::new(code, message))
    }
}

/// Split `"530 Login incorrect"` into `(530, ' ', "Login incorrect")`
fn split_reply_line(line: &str) -> Option<(u16, char, &str)> {
    let digits = line.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code = digits.parse().ok()?;
    let mut rest = line[3..].chars();
    let separator = match rest.next() {
        None => ' ',
        Some(c @ (' ' | '-')) => c,
        Some(_) => return None,
    };
    Some((code, separator, rest.as_str().trim()))
}
