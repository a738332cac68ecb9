// File: classifier.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const NO_RESPONSE: &str = "(no response)";

static STATUS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^HTTP/\d(?:\.\d)? (\d{3})\b").unwrap());

/// Statuses a parser returns when it refuses the message framing.
const FRAMING_REJECTIONS: &[u16] = &[400, 411, 413, 431, 501, 505];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Verdict {
    ConnectionFailed,
    NoResponse,
    MultipleResponses,
    Rejected,
    Accepted,
    Unparseable,
}

impl Verdict {
    /// True for outcomes that point at a front-end / back-end disagreement.
    pub fn is_anomaly(&self) -> bool {
        matches!(self, Self::NoResponse | Self::MultipleResponses)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ConnectionFailed => "connection failed",
            Self::NoResponse => "no response (possible desync hang)",
            Self::MultipleResponses => "multiple responses (smuggled request parsed)",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
            Self::Unparseable => "unparseable response",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status_line: Option<String>,
    pub status_code: Option<u16>,
    pub status_lines: usize,
    pub verdict: Verdict,
}

/// Human readable view of a drained response.
pub fn summarize(response: &[u8], verbose: bool) -> String {
    if response.is_empty() {
        return NO_RESPONSE.to_string();
    }

    let text = String::from_utf8_lossy(response);
    if verbose {
        return text.into_owned();
    }

    first_line(&text).to_string()
}

pub fn classify(response: &[u8]) -> ResponseSummary {
    if response.is_empty() {
        return ResponseSummary {
            status_line: None,
            status_code: None,
            status_lines: 0,
            verdict: Verdict::NoResponse,
        };
    }

    let text = String::from_utf8_lossy(response);
    let statuses: Vec<(u16, &str)> = STATUS_LINE
        .captures_iter(&text)
        .filter_map(|c| {
            let start = c.get(0)?.start();
            let code = c.get(1)?.as_str().parse().ok()?;
            Some((code, first_line(&text[start..])))
        })
        .collect();
    // Interim 1xx replies precede the final response on the same exchange.
    let finals: Vec<(u16, &str)> = statuses
        .iter()
        .copied()
        .filter(|(code, _)| !is_informational(*code))
        .collect();

    let line = first_line(&text);
    let (status_code, status_line) = if STATUS_LINE.is_match(line) {
        match finals.first().or(statuses.first()) {
            Some(&(code, status)) => (Some(code), status),
            None => (None, line),
        }
    } else {
        (None, line)
    };

    let verdict = match (status_code, finals.len()) {
        (_, n) if n > 1 => Verdict::MultipleResponses,
        (Some(code), _) if FRAMING_REJECTIONS.contains(&code) => Verdict::Rejected,
        (Some(_), _) => Verdict::Accepted,
        (None, _) => Verdict::Unparseable,
    };

    ResponseSummary {
        status_line: Some(status_line.to_string()),
        status_code,
        status_lines: finals.len(),
        verdict,
    }
}

fn is_informational(code: u16) -> bool {
    (100..200).contains(&code)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
