use boxclaim::cli::{Cli, Commands};
use boxclaim::config::AppConfig;
use boxclaim::Components;
use clap::Parser;
use tracing::error;

mod main_modes;
mod main_runtime;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command();

    let config = match AppConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match command {
        Commands::Run | Commands::Once => main_runtime::init_logging(&config.logging),
        Commands::Status | Commands::Cooldown => main_runtime::init_logging_simple(),
    }

    // Missing or malformed settings stop the process before any claim traffic
    let components = match Components::from_config(&config) {
        Ok(components) => components,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match command {
        Commands::Run => main_modes::run_loop(components).await,
        Commands::Once => main_modes::run_once(components).await,
        Commands::Status => main_modes::show_status(&components).await,
        Commands::Cooldown => main_modes::show_cooldown(&components).await,
    }
}
