// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use std::time::Duration;

use crate::config::{ProbeMode, RunOptions};
use crate::target::{checked_path, TargetError, DEFAULT_HTTPS_PORT};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[arg(help = "Target host (IP or domain)")]
    pub host: String,

    #[arg(
        short = 'p',
        long = "port",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Target port (default: 80, or 443 with --https)"
    )]
    pub port: Option<u16>,

    #[arg(long = "https", conflicts_with = "both", help = "Probe over HTTPS only")]
    pub https: bool,

    #[arg(long = "both", help = "Probe over HTTP, then over HTTPS")]
    pub both: bool,

    #[arg(
        long = "https-port",
        default_value_t = DEFAULT_HTTPS_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "HTTPS port used with --both"
    )]
    pub https_port: u16,

    #[arg(
        long = "path",
        default_value = "/",
        value_parser = parse_path,
        help = "Request path"
    )]
    pub path: String,

    #[arg(
        short = 't',
        long = "timeout",
        default_value = "10.0",
        value_parser = parse_timeout,
        help = "Connect, send and idle-read timeout in seconds"
    )]
    pub timeout: Duration,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Print full responses instead of the status line"
    )]
    pub verbose: bool,

    #[arg(
        long = "log-level",
        help = "Log level: off, error, warn, info, debug, trace (default: info, debug with -v)"
    )]
    pub log_level: Option<String>,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    #[arg(
        long = "verify-certs",
        help = "Verify TLS certificates and host names (off by default for probing)"
    )]
    pub verify_certs: bool,

    #[arg(long = "json", help = "Write a JSON report to this file")]
    pub json: Option<String>,

    #[arg(
        long = "fail-on-anomaly",
        help = "Exit with status 2 when any probe looks desynchronized"
    )]
    pub fail_on_anomaly: bool,

    #[arg(
        long = "i-have-authorization",
        help = "Skip authorization prompt (requires explicit written permission)"
    )]
    pub i_have_authorization: bool,
}

impl Cli {
    pub fn mode(&self) -> ProbeMode {
        if self.both {
            ProbeMode::Both
        } else if self.https {
            ProbeMode::Secure
        } else {
            ProbeMode::Plain
        }
    }

    pub fn run_options(&self) -> Result<RunOptions, TargetError> {
        let mut options = RunOptions::new();
        options.set_mode(self.mode());
        options.set_port(self.port);
        options.set_https_port(self.https_port);
        options.set_path(&self.path)?;
        options.set_timeout(self.timeout);
        options.set_verbose(self.verbose);
        options.set_skip_certificate_verification(!self.verify_certs);
        Ok(options)
    }

    /// An explicit `--log-level` always wins; `-v` only raises the default.
    pub fn log_level(&self) -> log::LevelFilter {
        match &self.log_level {
            Some(level) => level.parse().unwrap_or(log::LevelFilter::Info),
            None if self.verbose => log::LevelFilter::Debug,
            None => log::LevelFilter::Info,
        }
    }
}

pub fn parse_path(value: &str) -> Result<String, String> {
    checked_path(value).map_err(|e| e.to_string())
}

pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err("timeout must be a positive number of seconds".to_string());
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| e.to_string())
}
