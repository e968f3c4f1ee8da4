// src/bin/dicc.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use dicc::{
    cli::{Cli, dispatcher},
    core::config_loader,
    models::Settings,
};

/// Loads the configuration, sets up logging, dispatches the command and
/// reports any error in one place.
fn main() {
    if let Err(e) = run() {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = config_loader::load_settings()?;
    init_logging(&settings);

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);
    dispatcher::dispatch(cli.args, &settings)
}

/// `RUST_LOG` wins over the configured `log.log_level`.
fn init_logging(settings: &Settings) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log.log_level.as_str()),
    )
    .init();
}
