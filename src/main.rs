// Ideanator - develop vague ideas through guided questioning
// Main entry point

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ideanator::arise::progress::read_stdin_line;
use ideanator::arise::AriseLoop;
use ideanator::cli::{
    batch_banner, idea_header, interactive_banner, synthesis_block, BatchSummary, ConsoleProgress,
};
use ideanator::config::{load_settings, Backend, Settings};
use ideanator::llm::OpenAiCompatClient;
use ideanator::prompts::PromptSet;
use ideanator::storage::{load_batch_ideas, save_result, ResultWriter};

/// Develop a vague idea through the ARISE interview and refactoring pipeline
#[derive(Debug, Parser)]
#[command(name = "ideanator", version, about)]
struct Cli {
    /// JSON file of ideas ({"ideas": [{"content": "..."}]}); runs batch mode
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Model id (defaults to the backend preset)
    #[arg(short, long)]
    model: Option<String>,

    /// Where to write results (batch default: arise_results.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model server flavour
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Full base URL of the chat-completions server, including /v1
    #[arg(long)]
    server_url: Option<String>,

    /// Settings file (default: ~/.ideanator/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prompt template override file
    #[arg(long)]
    prompts: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{} {error:#}", "ideanator error:".red().bold());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    apply_cli_overrides(&mut settings, &cli);
    settings
        .validate()
        .context("Invalid command-line settings")?;
    init_tracing(&settings.log_level, cli.verbose)?;

    let prompts = Arc::new(PromptSet::load(settings.prompts_path.as_deref())?);

    let base_url = cli
        .server_url
        .clone()
        .unwrap_or_else(|| settings.backend_url(settings.backend));
    let model = settings.backend_model(settings.backend);
    let mut client = OpenAiCompatClient::with_timeout(
        &base_url,
        &model,
        Duration::from_secs(settings.request_timeout_secs),
    )?
    .with_name(settings.backend.as_str());
    if let Ok(key) = std::env::var("IDEANATOR_API_KEY") {
        client = client.with_api_key(key);
    }

    if let Err(e) = client.check_server().await {
        tracing::warn!(url = %base_url, "Model server preflight failed: {e}");
        eprintln!("{}", format!("Warning: {e}; requests may fail.").yellow());
    }

    let cancel = CancellationToken::new();
    install_ctrlc(cancel.clone())?;

    let arise = AriseLoop::new(Arc::new(client), prompts).with_cancellation(cancel.clone());

    match &cli.file {
        Some(file) => {
            let output = cli.output.clone().unwrap_or_else(|| settings.output_file.clone());
            run_batch(arise, file, &output, &model).await
        }
        None => run_interactive(arise, cli.output.as_deref(), &cancel).await,
    }
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    if let Some(model) = &cli.model {
        settings.model = Some(model.clone());
    }
    if let Some(prompts) = &cli.prompts {
        settings.prompts_path = Some(prompts.clone());
    }
}

/// `RUST_LOG` wins, then `--verbose`, then the configured level
fn init_tracing(log_level: &str, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug".to_string()
    } else {
        log_level.to_ascii_lowercase()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// First Ctrl-C cancels the run gracefully; a second one exits immediately.
fn install_ctrlc(cancel: CancellationToken) -> Result<()> {
    ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        eprintln!("\nInterrupted, finishing up...");
        cancel.cancel();
    })
    .context("Failed to install Ctrl-C handler")
}

async fn run_batch(arise: AriseLoop, file: &Path, output: &Path, model: &str) -> Result<()> {
    let ideas = load_batch_ideas(file)?;
    let arise = arise.with_callback(Arc::new(ConsoleProgress::batch()));
    let mut writer = ResultWriter::new(output)?;

    println!("{}", batch_banner(ideas.len(), model));

    for (i, idea) in ideas.iter().enumerate() {
        println!("{}", idea_header(i + 1, ideas.len(), idea));

        let result = arise.run_batch(idea).await;
        let cancelled = result.cancelled;
        writer.push(result)?;
        if cancelled {
            break;
        }
    }

    let summary = BatchSummary::from_results(writer.results());
    println!("{}", summary.render(writer.path()));
    Ok(())
}

async fn run_interactive(
    arise: AriseLoop,
    output: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<()> {
    println!("\n{}\n", interactive_banner());

    let idea = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(()),
        line = read_stdin_line("What's your idea? ") => line.context("Failed to read idea")?,
    };
    let idea = idea.trim();
    if idea.is_empty() {
        eprintln!("No idea provided. Exiting.");
        return Ok(());
    }
    println!();

    let arise = arise.with_callback(Arc::new(ConsoleProgress::interactive()));
    let result = arise.run_interactive(idea).await;

    if !result.cancelled {
        println!("{}", synthesis_block(&result.synthesis));
    }

    if let Some(path) = output {
        save_result(path, &result)?;
        println!("\n  Results saved to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_batch_flags() {
        let cli = Cli::parse_from([
            "ideanator",
            "-f",
            "ideas.json",
            "--backend",
            "ollama",
            "-m",
            "qwen2.5:7b",
            "-v",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("ideas.json")));
        assert_eq!(cli.backend, Some(Backend::Ollama));
        assert!(cli.verbose);

        let mut settings = Settings::default();
        apply_cli_overrides(&mut settings, &cli);
        assert_eq!(settings.backend, Backend::Ollama);
        assert_eq!(settings.backend_model(settings.backend), "qwen2.5:7b");
    }

    #[test]
    fn test_cli_defaults_to_interactive() {
        let cli = Cli::parse_from(["ideanator"]);
        assert!(cli.file.is_none());
        assert!(cli.output.is_none());
        assert!(cli.backend.is_none());
    }
}
