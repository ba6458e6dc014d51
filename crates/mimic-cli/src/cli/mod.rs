//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::SettingsStore;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Settings directory from CLI, env, or the platform default
    let store = match cli.settings_dir {
        Some(dir) => SettingsStore::at(dir),
        None => SettingsStore::open_default()?,
    };

    let ctx = commands::Context {
        store,
        output_format: cli.output.unwrap_or_default(),
    };

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(&ctx, args),
        Commands::Watch(args) => commands::watch::execute(&ctx, args).await,
        Commands::Settings(args) => commands::settings::execute(&ctx, args),
    }
}

/// Log to stderr so stdout only carries generated values.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
