//! # Domain Models
//!
//! Credential types and the FTP target description.
//!
//! ## Security Design
//!
//! [`SecureString`] keeps passwords in zeroizing storage and never exposes
//! them through `Debug`. Passwords only leave the type when they are written
//! to the FTP control connection or reported as a found credential.

pub mod credentials;
pub mod summary;
pub mod target;

pub use credentials::{Credentials, SecureString, Username};
pub use summary::AuditSummary;
pub use target::FtpTarget;
