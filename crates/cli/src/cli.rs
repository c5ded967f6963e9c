// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::colors;
use crate::data::ConflictStrategy;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn help_template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

fn commands_help() -> String {
    colors::examples(
        "\
Records:
  send            Save a message (remote when reachable, local otherwise)
  upload          Save a PDF file
  messages        List messages
  pdfs            List PDF files
  show-message    Show one message
  show-pdf        Show one PDF file
  delete-message  Delete a message from the local store
  delete-pdf      Delete a PDF from the local store

Synchronization:
  status          Probe the API and show pending work
  pending         Show pending records and queued requests
  sync            Push pending records, then replay queued requests
  merge           Replace local records with the server's

Cache & Context:
  warm            Install and activate the asset cache
  clear-cache     Drop and re-warm the current cache generation
  fetch           Run one request through the fetch interceptor
  run             Run the background context in the foreground
",
    )
}

fn quickstart_help() -> String {
    colors::examples(
        "\
Get started:
  offsync status              Check connectivity and pending work
  offsync send \"hello\"        Save a message
  offsync sync                Push everything saved while offline",
    )
}

#[derive(Parser)]
#[command(name = "offsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first data engine: cache, queue, and sync against a remote API")]
#[command(
    long_about = "Offline-first data engine.\n\n\
    Writes land in a local store when the remote API is unreachable and are \
    pushed once it comes back. Requests are served from a versioned cache when offline."
)]
#[command(help_template = help_template())]
#[command(before_help = commands_help())]
#[command(after_help = quickstart_help())]
#[command(styles = colors::styles())]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: $OFFSYNC_CONFIG or <state-dir>/config.toml)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// State directory holding the local store and cache
    #[arg(long, global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────
    /// Save a message
    #[command(after_help = colors::examples("\
Examples:
  offsync send \"Meeting at 3\"     Save remotely, or locally when offline
  offsync send \"x\" --json         Print the saved record as JSON"))]
    Send {
        /// Message text
        #[arg(value_parser = non_empty_string)]
        text: String,
    },

    /// Save a PDF file (at most 10 MiB)
    #[command(after_help = colors::examples("\
Examples:
  offsync upload report.pdf       Store and upload when reachable"))]
    Upload {
        /// Path to the PDF
        path: PathBuf,
    },

    /// List messages
    Messages,

    /// List PDF files
    Pdfs,

    /// Show one message, from the API when reachable
    ShowMessage {
        /// Message ID
        id: String,
    },

    /// Show one PDF file, from the API when reachable
    ShowPdf {
        /// PDF ID
        id: String,
    },

    /// Delete a message from the local store
    DeleteMessage {
        /// Message ID
        id: String,
    },

    /// Delete a PDF from the local store
    DeletePdf {
        /// PDF ID
        id: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Synchronization
    // ─────────────────────────────────────────────────────────────────────────
    /// Probe the API and show pending work
    Status,

    /// Show pending records and queued requests
    Pending,

    /// Push pending records, then replay queued requests
    Sync,

    /// Replace local records with the server's
    #[command(after_help = colors::examples("\
Examples:
  offsync merge                          Keep the server's records
  offsync merge --strategy client-wins   Record a preference for local edits"))]
    Merge {
        /// Preferred side when local and remote records disagree
        #[arg(long, value_enum, default_value_t = ConflictStrategy::ServerWins)]
        strategy: ConflictStrategy,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Cache & context
    // ─────────────────────────────────────────────────────────────────────────
    /// Install and activate the asset cache
    Warm,

    /// Drop and re-warm the current cache generation
    ClearCache,

    /// Run one request through the fetch interceptor
    #[command(after_help = colors::examples("\
Examples:
  offsync fetch ./index.html --navigate          Network first, cached fallback
  offsync fetch http://localhost:3000/api/messages
  offsync fetch http://localhost:3000/api/messages --post '{\"msg\":\"hi\"}'"))]
    Fetch {
        /// Absolute URL, or a path relative to the configured origin
        url: String,

        /// Treat the request as a page navigation
        #[arg(long, conflicts_with = "post")]
        navigate: bool,

        /// Send a POST with this JSON body
        #[arg(long, value_name = "json")]
        post: Option<String>,
    },

    /// Run the background context in the foreground until Ctrl-C
    #[command(after_help = colors::examples("\
Examples:
  offsync run                     Probe, sync, and replay periodically
  OFFSYNC_LOG=debug offsync run   Run with debug logging"))]
    Run,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
