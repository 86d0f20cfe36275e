use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod daemon;
mod lock;
mod notify;
mod otp;
mod schedule;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::Args::parse();

    init_logging(args.verbose);

    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    match args.command {
        cli::Commands::Init { output, force } => {
            commands::setup::init(output.unwrap_or(config_path), force)
        }
        cli::Commands::Run => commands::control::run(&config_path),
        cli::Commands::Status { json } => commands::control::status(&config_path, json),
        cli::Commands::Code { real } => commands::control::code(&config_path, real),
        cli::Commands::Verify { code } => commands::control::verify(&config_path, &code),
    }
}

/// Initialize logging
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();
}
