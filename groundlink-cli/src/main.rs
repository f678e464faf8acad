//! ## groundlink-cli
//! **Operational entrypoint**
//!
//! - `groundlink run`: UDP telemetry gateway over an in-memory store
//! - `groundlink generate`: synthetic telemetry emitter

use clap::Parser;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run_gateway(args).await,
        Commands::Generate(args) => commands::run_generator(args).await,
    }
}
