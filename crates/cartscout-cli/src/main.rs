mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cartscout")]
#[command(about = "Answer shopping questions with Amazon and Walmart search results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan, search and summarize a natural-language shopping question
    Ask {
        /// The question, e.g. "white sneakers under $70 by Friday"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Seed for the shipping and return-policy draws
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Decode a reasoning reply into an intent (no network)
    Decode {
        /// Read the reply from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Decode a reasoning reply and run the marketplace pipeline on it
    Run {
        /// Read the reply from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Seed for the shipping and return-policy draws
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file } => {
            init_tracing("warn")?;
            commands::run_decode(file.as_deref())
        }
        Commands::Run { file, seed } => {
            let config = cartscout_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            tracing::debug!(env = %config.env, config = ?config, "configuration loaded");
            commands::run_pipeline(&config, file.as_deref(), seed).await
        }
        Commands::Ask { question, seed } => {
            let config = cartscout_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            tracing::debug!(env = %config.env, config = ?config, "configuration loaded");
            commands::run_ask(&config, &question.join(" "), seed).await
        }
    }
}

/// Installs the `fmt` subscriber on stderr so stdout carries only JSON.
/// `RUST_LOG` wins over `fallback_level`.
fn init_tracing(fallback_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
