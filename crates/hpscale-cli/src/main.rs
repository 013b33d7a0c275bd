mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!(
        "🚀 HP-Scale CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let progress = CliProgressHandler::new(!cli.quiet);
    let command_result = match cli.command {
        Commands::Pilot(args) => {
            info!("Dispatching to 'pilot' command.");
            commands::pilot::run(args, &progress)
        }
        Commands::Validate(args) => {
            info!("Dispatching to 'validate' command.");
            commands::validate::run(args, &progress)
        }
        Commands::Analyze(args) => {
            info!("Dispatching to 'analyze' command.");
            commands::analyze::run(args, &progress)
        }
        Commands::Run(args) => {
            info!("Dispatching to 'run' command.");
            commands::run::run(args, &progress)
        }
    };

    match &command_result {
        Ok(()) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!(exit_code = e.exit_code(), "❌ Command failed: {}", e);
        }
    }

    command_result
}
