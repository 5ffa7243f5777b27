mod cli;
mod client;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("pbx v{} starting up", env!("CARGO_PKG_VERSION"));
    debug!("Parsed CLI arguments: {:?}", &cli);

    let app_config = config::builder::build_config(&cli)?;
    let quiet = cli.quiet;

    let command_result = match cli.command {
        Commands::Properties(args) => {
            info!("Dispatching to 'properties' command");
            commands::properties::run(args, &app_config).await
        }
        Commands::Enumerate(args) => {
            info!("Dispatching to 'enumerate' command");
            commands::enumerate::run(args, &app_config)
        }
        Commands::Download(args) => {
            info!("Dispatching to 'download' command");
            commands::download::run(args, &app_config, quiet).await
        }
        Commands::Decompose(args) => {
            info!("Dispatching to 'decompose' command");
            commands::decompose::run(args, &app_config, quiet).await
        }
        Commands::Annotate(args) => {
            info!("Dispatching to 'annotate' command");
            commands::annotate::run(args, &app_config, quiet).await
        }
        Commands::Merge(args) => {
            info!("Dispatching to 'merge' command");
            commands::merge::run(args)
        }
    };

    match &command_result {
        Ok(()) => {
            info!("Command completed successfully");
            if !quiet {
                println!("✅ Command completed successfully.");
            }
        }
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}
