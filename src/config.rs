// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::time::Duration;

use crate::target::{checked_path, Target, TargetError, DEFAULT_HTTPS_PORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    Plain,
    Secure,
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    mode: ProbeMode,
    port: Option<u16>,
    https_port: u16,
    path: String,
    timeout: Duration,
    verbose: bool,
    skip_certificate_verification: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self {
            mode: ProbeMode::Plain,
            port: None,
            https_port: DEFAULT_HTTPS_PORT,
            path: "/".to_string(),
            timeout: Duration::from_secs(10),
            verbose: false,
            skip_certificate_verification: true,
        }
    }

    pub fn set_mode(&mut self, mode: ProbeMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ProbeMode {
        self.mode
    }

    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn set_https_port(&mut self, https_port: u16) {
        self.https_port = https_port;
    }

    pub fn https_port(&self) -> u16 {
        self.https_port
    }

    /// Normalizes and stores the request path. The stored path is left
    /// untouched when `path` is rejected.
    pub fn set_path(&mut self, path: &str) -> Result<(), TargetError> {
        self.path = checked_path(path)?;
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_skip_certificate_verification(&mut self, skip: bool) {
        self.skip_certificate_verification = skip;
    }

    pub fn skip_certificate_verification(&self) -> bool {
        self.skip_certificate_verification
    }

    /// Targets to probe, in run order. In `Both` mode `port` applies to the
    /// plain target and `https_port` to the secure one.
    pub fn targets(&self, host: &str) -> Result<Vec<Target>, TargetError> {
        match self.mode {
            ProbeMode::Plain => Ok(vec![Target::plain(host, self.port)?]),
            ProbeMode::Secure => Ok(vec![Target::secure(host, self.port)?]),
            ProbeMode::Both => Ok(vec![
                Target::plain(host, self.port)?,
                Target::secure(host, Some(self.https_port))?,
            ]),
        }
    }
}
