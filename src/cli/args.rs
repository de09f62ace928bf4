//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Front-end asset pipelines with a live-reload development server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: assetline.toml)
    #[arg(short = 'C', long, global = true, default_value = "assetline.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands (runs `develop` when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Clean the output directory and run every pipeline once
    #[command(visible_alias = "b")]
    Build,

    /// Run every pipeline, then watch sources and serve with live reload
    #[command(visible_alias = "d")]
    Develop,
}

impl Cli {
    /// Resolved command, `develop` being the default entry point.
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Develop)
    }
}
