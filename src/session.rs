// File: session.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::classifier::{self, ResponseSummary, Verdict};
use crate::payloads::PayloadVariant;
use crate::target::Target;

/// Outcome of one payload against one target.
///
/// Fields are private so a failed probe always carries an error and no
/// bytes, and a successful one never carries an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    variant: PayloadVariant,
    ok: bool,
    response: Vec<u8>,
    error: Option<String>,
}

impl ProbeResult {
    pub fn received(variant: PayloadVariant, response: Vec<u8>) -> Self {
        Self {
            variant,
            ok: true,
            response,
            error: None,
        }
    }

    pub fn failed(variant: PayloadVariant, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "unknown transport failure".to_string();
        }
        Self {
            variant,
            ok: false,
            response: Vec::new(),
            error: Some(error),
        }
    }

    pub fn variant(&self) -> &PayloadVariant {
        &self.variant
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn response(&self) -> &[u8] {
        &self.response
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn summary(&self) -> ResponseSummary {
        if !self.ok {
            return ResponseSummary {
                status_line: None,
                status_code: None,
                status_lines: 0,
                verdict: Verdict::ConnectionFailed,
            };
        }
        classifier::classify(&self.response)
    }

    pub fn verdict(&self) -> Verdict {
        self.summary().verdict
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSession {
    target: Target,
    path: String,
    results: Vec<ProbeResult>,
}

impl TestSession {
    pub(crate) fn new(target: Target, path: &str) -> Self {
        Self {
            target,
            path: path.to_string(),
            results: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, result: ProbeResult) {
        self.results.push(result);
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.ok()).count()
    }

    pub fn anomalies(&self) -> Vec<&ProbeResult> {
        self.results
            .iter()
            .filter(|r| r.verdict().is_anomaly())
            .collect()
    }

    pub fn has_anomaly(&self) -> bool {
        !self.anomalies().is_empty()
    }
}
