//! Credential types
//!
//! SECURITY: Password memory is zeroed on drop.

use crate::constants::MAX_USERNAME_LENGTH;
use crate::utils::CredentialError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// FTP account name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new username after validation
    pub fn new(username: impl Into<String>) -> Result<Self, CredentialError> {
        let username = username.into();

        if username.trim().is_empty() {
            return Err(CredentialError::InvalidUsername(
                "Username cannot be empty".to_string(),
            ));
        }

        if username.len() > MAX_USERNAME_LENGTH {
            return Err(CredentialError::InvalidUsername(format!(
                "Username exceeds maximum length ({MAX_USERNAME_LENGTH})"
            )));
        }

        // CR/LF would let a username inject extra FTP commands
        if username.contains(['\r', '\n']) {
            return Err(CredentialError::InvalidUsername(
                "Username cannot contain line breaks".to_string(),
            ));
        }

        Ok(Username(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Username {
    type Error = CredentialError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Username::new(value)
    }
}

/// Password that zeros memory on drop
///
/// SECURITY: `Debug` never reveals the content, and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(Zeroizing<String>);

impl SecureString {
    pub fn new(password: impl Into<String>) -> Self {
        SecureString(Zeroizing::new(password.into()))
    }

    /// Use this sparingly and only when the value has to go on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(*** {} bytes ***)", self.0.len())
    }
}

/// Username/password pair tested against the target
///
/// The password is trimmed of surrounding whitespace on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: SecureString,
}

impl Credentials {
    pub fn new(username: Username, password: impl AsRef<str>) -> Self {
        Credentials {
            username,
            password: SecureString::new(password.as_ref().trim()),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &SecureString {
        &self.password
    }

    /// Whether this pair matches the given plain-text values exactly
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username.as_str() == username && self.password.as_str() == password
    }
}

// A found credential is the product of an audit, so the summary carries it in full.
impl Serialize for Credentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Credentials", 2)?;
        state.serialize_field("username", self.username.as_str())?;
        state.serialize_field("password", self.password.as_str())?;
        state.end()
    }
}
