mod config;
mod doctor_cmd;
mod products_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::Config;
use modfed_config::mode_from_value;

#[derive(Parser)]
#[command(name = "modfed")]
#[command(about = "modfed — host tooling for runtime-loaded UI modules")]
#[command(version)]
struct Cli {
    /// Override the environment mode (production|development)
    #[arg(long, global = true)]
    env: Option<String>,

    /// Override the configuration feed URL
    #[arg(long, global = true)]
    config_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products enabled in the configuration feed
    Products {
        /// Print the raw JSON document instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check every enabled remote: origin policy plus entry-script probe
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(env) = &cli.env {
        config.mode = mode_from_value(Some(env.as_str()));
    }
    if let Some(config_url) = &cli.config_url {
        config.config_url = config_url.clone();
    }

    match &config.log_dir {
        Some(log_dir) => logging::init_logger(log_dir, &config.log_level),
        None => logging::init_console(&config.log_level),
    }

    match cli.command {
        Commands::Products { json } => products_cmd::run(&config, json).await,
        Commands::Doctor => doctor_cmd::run(&config).await,
    }
}
