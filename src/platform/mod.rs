//! Platform implementations of the core traits
//!
//! All socket and terminal code is isolated here.

pub mod console;
pub mod ftp;

pub use console::ConsoleSink;
pub use ftp::TcpFtpClient;
