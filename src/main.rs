use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use payplan::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    init_tracing();

    // Dispatch to appropriate command handler
    match &args.command {
        cli::Commands::Quote { plan, json } => {
            let settings = config::load_settings(&args.config)?;
            commands::quote::execute(&settings, plan, *json)?;
        }
        cli::Commands::Submit { plan, name } => {
            let settings = config::load_settings(&args.config)?;
            commands::submit::execute(&settings, plan, name).await?;
        }
        cli::Commands::Config { action } => {
            let settings = config::load_settings(&args.config)?;
            match action {
                cli::ConfigCommands::Show => commands::config::show(&settings)?,
                cli::ConfigCommands::Validate => commands::config::validate(&settings)?,
            }
        }
        cli::Commands::Version => {
            println!("payplan v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
