// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::{Result, Write};

use crate::classifier::{self, ResponseSummary, Verdict};
use crate::payloads::AmbiguityClass;
use crate::session::{ProbeResult, TestSession};
use crate::target::Target;

#[derive(Debug, Serialize)]
pub struct ProbeEntry {
    pub variant: String,
    pub ambiguity: AmbiguityClass,
    pub ok: bool,
    pub error: Option<String>,
    pub request: String,
    pub response: String,
    pub summary: ResponseSummary,
}

#[derive(Debug, Serialize)]
pub struct SessionEntry {
    pub target: Target,
    pub path: String,
    pub anomalies: usize,
    pub probes: Vec<ProbeEntry>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub sessions: Vec<SessionEntry>,
}

impl From<&ProbeResult> for ProbeEntry {
    fn from(result: &ProbeResult) -> Self {
        Self {
            variant: result.variant().name.clone(),
            ambiguity: result.variant().ambiguity,
            ok: result.ok(),
            error: result.error().map(str::to_string),
            request: result.variant().request_text(),
            response: String::from_utf8_lossy(result.response()).into_owned(),
            summary: result.summary(),
        }
    }
}

impl From<&TestSession> for SessionEntry {
    fn from(session: &TestSession) -> Self {
        Self {
            target: session.target().clone(),
            path: session.path().to_string(),
            anomalies: session.anomalies().len(),
            probes: session.results().iter().map(ProbeEntry::from).collect(),
        }
    }
}

impl RunReport {
    pub fn new(sessions: &[TestSession]) -> Self {
        Self {
            tool: format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            sessions: sessions.iter().map(SessionEntry::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(std::io::Error::other)
    }

    pub fn write_json(&self, output_path: &str) -> Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(output_path)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

fn verdict_label(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::MultipleResponses | Verdict::NoResponse => verdict.label().bright_red().bold(),
        Verdict::Rejected => verdict.label().yellow(),
        Verdict::Accepted => verdict.label().green(),
        Verdict::ConnectionFailed | Verdict::Unparseable => verdict.label().dimmed(),
    }
}

/// Console rendering of one session.
pub fn render_session(session: &TestSession, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n",
        format!("[+] Target: {} {}", session.target(), session.path()).bold()
    ));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    for result in session.results() {
        let summary = result.summary();
        output.push_str(&format!(
            "{} [{}]\n",
            result.variant().name.cyan().bold(),
            result.variant().ambiguity.description()
        ));
        output.push_str(&format!("  Verdict: {}\n", verdict_label(summary.verdict)));

        match result.error() {
            Some(error) => output.push_str(&format!("  Error: {}\n", error.red())),
            None => {
                let text = classifier::summarize(result.response(), verbose);
                if verbose {
                    output.push_str("  Response:\n");
                    for line in text.lines() {
                        output.push_str(&format!("    {}\n", line));
                    }
                } else {
                    output.push_str(&format!("  Response: {}\n", text));
                }
            }
        }
        output.push('\n');
    }

    let anomalies = session.anomalies();
    if anomalies.is_empty() {
        output.push_str("No framing anomalies observed\n");
    } else {
        output.push_str(&format!(
            "{}\n",
            format!("{} variant(s) need manual review:", anomalies.len())
                .bright_yellow()
                .bold()
        ));
        for result in anomalies {
            output.push_str(&format!(
                "  - {} ({})\n",
                result.variant().name,
                result.verdict().label()
            ));
        }
    }

    output
}
