// File: errors.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum TransportError {
    Connect(std::io::Error),
    Handshake(String),
    Timeout { stage: &'static str, after: Duration },
    InvalidTarget(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(e) => write!(f, "Connection failed: {}", e),
            Self::Handshake(msg) => write!(f, "TLS handshake failed: {}", msg),
            Self::Timeout { stage, after } => {
                write!(f, "{} timed out after {:.1}s", stage, after.as_secs_f64())
            }
            Self::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect(e) => Some(e),
            Self::Handshake(_) => None,
            Self::Timeout { .. } => None,
            Self::InvalidTarget(_) => None,
        }
    }
}

impl From<rustls::Error> for TransportError {
    fn from(error: rustls::Error) -> Self {
        Self::Handshake(error.to_string())
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::ErrorKind;

    #[test]
    fn test_display_messages_are_descriptive() {
        let refused = TransportError::Connect(std::io::Error::new(
            ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(refused.to_string(), "Connection failed: connection refused");
        assert!(refused.source().is_some());

        let timeout = TransportError::Timeout {
            stage: "Connect",
            after: Duration::from_millis(2500),
        };
        assert_eq!(timeout.to_string(), "Connect timed out after 2.5s");
        assert!(timeout.source().is_none());

        let handshake = TransportError::Handshake("bad record".to_string());
        assert!(handshake.to_string().contains("bad record"));
    }
}
