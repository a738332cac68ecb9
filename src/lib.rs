// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::bool_assert_comparison)]

pub mod classifier;
pub mod cli;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod payloads;
pub mod report;
pub mod session;
pub mod target;
pub mod tls;
pub mod transport;
