// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use colored::*;
use log::{error, info};
use simple_logger::SimpleLogger;
use std::io;

use rsmuggle::cli::Cli;
use rsmuggle::orchestrator::{LogSink, Orchestrator};
use rsmuggle::report::{render_session, RunReport};
use rsmuggle::transport::{Transport, TransportConfig};

const ANOMALY_EXIT_CODE: i32 = 2;

fn print_banner() {
    println!("{}", "=".repeat(60).bright_red());
    println!(
        "{}",
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .bright_red()
            .bold()
    );
    println!("{}", "TE/CL request smuggling probe".bright_red());
    println!("{}", "=".repeat(60).bright_red());
    println!(
        "{}",
        "This tool sends ambiguous-framing requests that can desynchronize proxies"
            .bright_yellow()
    );
    println!("and disturb other users' traffic. Only test systems you are authorized to test.");
    println!();
}

fn confirm_authorization() -> io::Result<bool> {
    println!(
        "{}",
        "Do you have explicit written authorization to test this target? (yes/NO):"
            .bright_yellow()
    );
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("yes"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    SimpleLogger::new()
        .with_level(cli.log_level())
        .without_timestamps()
        .init()?;

    print_banner();

    if !cli.i_have_authorization && !confirm_authorization()? {
        println!("{}", "Authorization not confirmed. Exiting.".red());
        println!("   Use --i-have-authorization only if you have proper authorization.");
        return Ok(());
    }

    let options = cli.run_options()?;
    let targets = options.targets(&cli.host)?;

    let transport = Transport::new(TransportConfig {
        skip_certificate_verification: options.skip_certificate_verification(),
        ..TransportConfig::default()
    })?;
    let orchestrator = Orchestrator::new(transport, Box::new(LogSink::new(options.verbose())));

    let sessions = orchestrator
        .run_all(&targets, options.path(), options.timeout())
        .await;

    println!();
    for session in &sessions {
        println!("{}", render_session(session, options.verbose()));
    }

    if let Some(path) = &cli.json {
        match RunReport::new(&sessions).write_json(path) {
            Ok(()) => info!("JSON report written to {}", path),
            Err(e) => {
                error!("Failed to write JSON report to {}: {}", path, e);
                return Err(e.into());
            }
        }
    }

    if cli.fail_on_anomaly && sessions.iter().any(|s| s.has_anomaly()) {
        std::process::exit(ANOMALY_EXIT_CODE);
    }

    Ok(())
}
