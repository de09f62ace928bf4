//! assetline - front-end asset pipelines with a live-reload development server.

mod actor;
mod asset;
mod cli;
mod config;
mod core;
mod embed;
mod freshness;
mod logger;
mod pipeline;
mod reload;
mod sequence;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(ProjectConfig::load(&cli)?);

    match cli.command() {
        Commands::Build => cli::build::build(config),
        Commands::Develop => cli::develop::develop(config),
    }
}
