//! Input normalisation helpers for targets and wordlist entries.
//!
//! Every user-supplied host string and candidate line passes through one of
//! these functions before it reaches the attempt engine.

use crate::constants::DEFAULT_FTP_PORT;
use crate::models::FtpTarget;
use crate::utils::TargetError;

/// Parse `host`, `host:port`, `[v6]:port` or a bare IPv6 address.
///
/// Whitespace is trimmed and the port defaults to 21.
pub fn normalize_target(input: &str) -> Result<FtpTarget, TargetError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TargetError::Empty);
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| TargetError::InvalidPort(trimmed.to_string()))?;
        if host.is_empty() {
            return Err(TargetError::Empty);
        }
        let port = match tail.strip_prefix(':') {
            Some(port) => parse_port(port, trimmed)?,
            None if tail.is_empty() => DEFAULT_FTP_PORT,
            None => return Err(TargetError::InvalidPort(trimmed.to_string())),
        };
        return Ok(FtpTarget::new(host, port));
    }

    // More than one colon without brackets: a bare IPv6 address
    if trimmed.matches(':').count() > 1 {
        return Ok(FtpTarget::new(trimmed, DEFAULT_FTP_PORT));
    }

    match trimmed.split_once(':') {
        Some((host, port)) => {
            let host = host.trim();
            if host.is_empty() {
                return Err(TargetError::Empty);
            }
            Ok(FtpTarget::new(host, parse_port(port, trimmed)?))
        }
        None => Ok(FtpTarget::new(trimmed, DEFAULT_FTP_PORT)),
    }
}

fn parse_port(raw: &str, target: &str) -> Result<u16, TargetError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(TargetError::InvalidPort(target.to_string())),
    }
}

/// Normalise one wordlist line: trim, and drop it when nothing is left.
pub fn normalize_candidate(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target_defaults_port() {
        let target = normalize_target("  192.168.1.20 ").unwrap();
        assert_eq!(target.host, "192.168.1.20");
        assert_eq!(target.port, 21);
    }

    #[test]
    fn test_normalize_target_explicit_port() {
        let target = normalize_target("relay.local:2121").unwrap();
        assert_eq!(target, FtpTarget::new("relay.local", 2121));
    }

    #[test]
    fn test_normalize_target_ipv6() {
        assert_eq!(
            normalize_target("[fe80::1]:990").unwrap(),
            FtpTarget::new("fe80::1", 990)
        );
        assert_eq!(normalize_target("[::1]").unwrap(), FtpTarget::new("::1", 21));
        assert_eq!(normalize_target("::1").unwrap(), FtpTarget::new("::1", 21));
    }

    #[test]
    fn test_normalize_target_rejects_bad_input() {
        assert_eq!(normalize_target("   "), Err(TargetError::Empty));
        assert_eq!(normalize_target(":21"), Err(TargetError::Empty));
        assert!(matches!(
            normalize_target("host:ftp"),
            Err(TargetError::InvalidPort(_))
        ));
        assert!(matches!(
            normalize_target("host:0"),
            Err(TargetError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_normalize_target_keeps_demo_token() {
        assert!(normalize_target("demo").unwrap().is_demo());
    }

    #[test]
    fn test_normalize_candidate_trims_and_drops_blanks() {
        assert_eq!(normalize_candidate("  admin \r"), Some("admin".to_string()));
        assert_eq!(normalize_candidate("\t\r"), None);
        assert_eq!(normalize_candidate(""), None);
    }
}
