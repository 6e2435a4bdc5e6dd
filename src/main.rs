//! hashicon - Deterministic symmetric identicons from hash strings.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod identicon;
mod logger;
mod sse;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{AppConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(AppConfig::load(cli)?);

    match &cli.command {
        Commands::Init { force } => cli::init::write_config(&config, *force),
        Commands::Render { args } => cli::render::render_hashes(args, &config),
        Commands::Inspect { args } => cli::inspect::inspect_hash(args, &config),
        Commands::Serve { .. } => cli::serve::serve(),
    }
}
