use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "payplan", version, about = "Payment plan calculator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "payplan.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute a payment plan and print it
    Quote {
        #[command(flatten)]
        plan: PlanArgs,

        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute a payment plan and submit it to the webhook
    Submit {
        #[command(flatten)]
        plan: PlanArgs,

        /// Name to submit the plan under
        #[arg(short, long)]
        name: String,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

/// Launch parameters and the user's selections
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Launch query string, e.g. "slidingScale=true&dueDate=2025-06-01"
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Sliding-scale price
    #[arg(short, long)]
    pub price: Option<i64>,

    /// Number of monthly payments
    #[arg(short, long)]
    pub months: Option<u32>,

    /// Deposit preset as a fraction of the total, e.g. 0.25
    #[arg(long, conflicts_with = "custom")]
    pub preset: Option<f64>,

    /// Custom deposit amount, as typed into the deposit field
    #[arg(long)]
    pub custom: Option<String>,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Validate configuration file
    Validate,
}
