//! Subcommand handlers. Each prints its JSON result to stdout.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use cartscout_agent::{OpenAiCompletionClient, Pipeline, RunOptions, ShoppingAssistant};
use cartscout_core::{decode_intent, AppConfig, Intent};

/// Reads the reasoning reply from `file`, or from stdin when `None`.
pub(crate) fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

pub(crate) fn decode(raw: &str) -> anyhow::Result<Intent> {
    decode_intent(raw).context("failed to decode the reasoning reply")
}

pub(crate) fn run_options(seed: Option<u64>) -> RunOptions {
    RunOptions {
        seed,
        ..RunOptions::default()
    }
}

pub(crate) fn run_decode(file: Option<&Path>) -> anyhow::Result<()> {
    let intent = decode(&read_input(file)?)?;
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}

pub(crate) async fn run_pipeline(
    config: &AppConfig,
    file: Option<&Path>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let intent = decode(&read_input(file)?)?;
    let pipeline =
        Pipeline::from_config(config).context("failed to build marketplace adapters")?;

    let results = pipeline.run(&intent, run_options(seed)).await?;

    let failed: Vec<String> = results
        .iter()
        .filter(|(_, entry)| entry.is_failed())
        .map(|(platform, _)| platform.to_string())
        .collect();
    if !failed.is_empty() {
        tracing::warn!(platforms = ?failed, "some platforms failed during the run");
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

pub(crate) async fn run_ask(
    config: &AppConfig,
    question: &str,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let service = OpenAiCompletionClient::from_config(config)?;
    let pipeline =
        Pipeline::from_config(config).context("failed to build marketplace adapters")?;
    let mut assistant = ShoppingAssistant::new(service, pipeline);

    let outcome = assistant.search(question, run_options(seed)).await?;

    println!("{}\n", outcome.summary);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
