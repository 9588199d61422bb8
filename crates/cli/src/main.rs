// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cairn - git-driven database migrations

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod env;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cairn_core::Direction;
use commands::{generate, hook, init, migrate, named, status, Workspace};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cairn",
    version,
    about = "Run database migrations named in git commit messages"
)]
struct Cli {
    /// Database connection string (sqlite://PATH or postgres://...)
    #[arg(long, env = env::DB_VAR, global = true, hide_env_values = true)]
    db: Option<String>,

    /// Repository working copy
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up configuration, the commit hook and the migration table
    Init(init::InitArgs),
    /// Show the last migration and the work still to do
    Status,
    /// Apply every migration named in commits since the last run
    Migrate,
    /// Run the up entry point of named migrations
    Up(named::NamedArgs),
    /// Run the down entry point of named migrations
    Down(named::NamedArgs),
    /// Create a new migration manifest
    Generate(generate::GenerateArgs),
    /// Git prepare-commit-msg hook entry point
    #[command(name = "prepare-commit-msg", hide = true)]
    PrepareCommitMsg(hook::HookArgs),
}

#[tokio::main]
async fn main() {
    setup_logging();
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered so
/// context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let workspace = Workspace::new(cli.dir, cli.db);
    let format = cli.output;

    match cli.command {
        Commands::Init(args) => init::handle(args, &workspace).await,
        Commands::Status => status::handle(&workspace, format).await,
        Commands::Migrate => migrate::handle(&workspace, format).await,
        Commands::Up(args) => named::handle(args, Direction::Up, &workspace, format).await,
        Commands::Down(args) => named::handle(args, Direction::Down, &workspace, format).await,
        Commands::Generate(args) => generate::handle(args, &workspace, format),
        Commands::PrepareCommitMsg(args) => hook::handle(args, &workspace).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
