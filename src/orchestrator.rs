// File: orchestrator.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, info, warn};
use std::time::Duration;

use crate::classifier;
use crate::payloads::{self, PayloadVariant};
use crate::session::{ProbeResult, TestSession};
use crate::target::Target;
use crate::transport::Transport;

/// Receives progress events from the orchestrator.
pub trait ProbeSink {
    fn target_started(&self, _target: &Target, _path: &str, _variants: usize) {}
    fn probe_finished(&self, _target: &Target, _result: &ProbeResult) {}
    fn target_finished(&self, _session: &TestSession) {}
}

/// Forwards progress to the `log` facade.
pub struct LogSink {
    verbose: bool,
}

impl LogSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProbeSink for LogSink {
    fn target_started(&self, target: &Target, path: &str, variants: usize) {
        info!("[+] Target: {} path {}", target, path);
        debug!("{} payload variants queued", variants);
    }

    fn probe_finished(&self, target: &Target, result: &ProbeResult) {
        let name = &result.variant().name;
        match result.error() {
            Some(error) => warn!("[-] {} on {}: {}", name, target, error),
            None => info!(
                "[+] {}: {}",
                name,
                classifier::summarize(result.response(), self.verbose)
            ),
        }
    }

    fn target_finished(&self, session: &TestSession) {
        info!(
            "[+] {} finished: {} probes, {} failed, {} anomalous",
            session.target(),
            session.results().len(),
            session.failures(),
            session.anomalies().len()
        );
    }
}

pub struct Orchestrator {
    transport: Transport,
    sink: Box<dyn ProbeSink>,
}

impl Orchestrator {
    pub fn new(transport: Transport, sink: Box<dyn ProbeSink>) -> Self {
        Self { transport, sink }
    }

    /// Sends every variant on its own connection, in order. Failures are
    /// recorded and the run continues.
    pub async fn run(
        &self,
        target: &Target,
        path: &str,
        timeout: Duration,
        variants: &[PayloadVariant],
    ) -> TestSession {
        let mut session = TestSession::new(target.clone(), path);
        self.sink.target_started(target, path, variants.len());

        for variant in variants {
            let result = match self
                .transport
                .send(target, &variant.raw_bytes, timeout)
                .await
            {
                Ok(response) => ProbeResult::received(variant.clone(), response),
                Err(e) => ProbeResult::failed(variant.clone(), e.to_string()),
            };
            self.sink.probe_finished(target, &result);
            session.push(result);
        }

        self.sink.target_finished(&session);
        session
    }

    /// Runs the full catalog against each target, one after another.
    pub async fn run_all(
        &self,
        targets: &[Target],
        path: &str,
        timeout: Duration,
    ) -> Vec<TestSession> {
        let mut sessions = Vec::with_capacity(targets.len());
        for target in targets {
            let variants = payloads::build(target.host(), path);
            sessions.push(self.run(target, path, timeout, &variants).await);
        }
        sessions
    }
}
