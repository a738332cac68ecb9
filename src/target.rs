// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde::Serialize;
use std::fmt;

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    EmptyHost,
    InvalidHost(String),
    InvalidPort,
    InvalidPath(String),
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHost => write!(f, "Target host is empty"),
            Self::InvalidHost(host) => write!(f, "Target host contains invalid characters: {:?}", host),
            Self::InvalidPort => write!(f, "Target port must be between 1 and 65535"),
            Self::InvalidPath(path) => {
                write!(f, "Request path contains whitespace or control characters: {:?}", path)
            }
        }
    }
}

impl std::error::Error for TargetError {}

/// One endpoint under test. A target is plain or TLS, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    host: String,
    port: u16,
    secure: bool,
}

impl Target {
    pub fn new(host: &str, port: u16, secure: bool) -> Result<Self, TargetError> {
        if host.is_empty() {
            return Err(TargetError::EmptyHost);
        }

        // The host is spliced into the request line and Host header verbatim.
        if host
            .chars()
            .any(|c| c.is_ascii_control() || c.is_whitespace() || c == '/')
        {
            return Err(TargetError::InvalidHost(host.to_string()));
        }

        if port == 0 {
            return Err(TargetError::InvalidPort);
        }

        Ok(Self {
            host: host.to_string(),
            port,
            secure,
        })
    }

    pub fn plain(host: &str, port: Option<u16>) -> Result<Self, TargetError> {
        Self::new(host, port.unwrap_or(DEFAULT_HTTP_PORT), false)
    }

    pub fn secure(host: &str, port: Option<u16>) -> Result<Self, TargetError> {
        Self::new(host, port.unwrap_or(DEFAULT_HTTPS_PORT), true)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn scheme_label(&self) -> &'static str {
        if self.secure {
            "HTTPS"
        } else {
            "HTTP"
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.host, self.port, self.scheme_label())
    }
}

/// Ensures the request path has a leading slash; empty becomes `/`.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Normalizes `path` and rejects anything that would break the request line.
pub fn checked_path(path: &str) -> Result<String, TargetError> {
    // Same rule as the host: the path is spliced into `POST {path} HTTP/1.1`.
    if path.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(TargetError::InvalidPath(path.to_string()));
    }
    Ok(normalize_path(path))
}
