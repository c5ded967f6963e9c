// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use offsync::Cli;
use tracing_subscriber::EnvFilter;

fn setup_logging() {
    let filter = offsync::env::log_filter()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging();
    if let Err(e) = offsync::run(cli) {
        eprintln!("{}", offsync::colors::notice(offsync::colors::Level::Error, &e.to_string()));
        std::process::exit(1);
    }
}
