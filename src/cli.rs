use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "boxclaim")]
#[command(version = "0.1.0")]
#[command(about = "Claims the cooldown-gated box on-chain, falling back to the claim API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml and <BOXCLAIM_ENV>.toml are read from here)
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the claim loop forever (default)
    Run,
    /// Run a single cycle: wait out the cooldown if needed, claim, report
    Once,
    /// Show current points and rank
    Status,
    /// Show last open time and remaining cooldown
    Cooldown,
}

impl Cli {
    /// Subcommand to execute, defaulting to the claim loop
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}
