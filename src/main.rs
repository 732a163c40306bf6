use std::io::{BufRead, IsTerminal};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use precis_core::{Summarizer, SummaryRequest};
use precis_core::config::{Config, ProviderKind};
use precis_document::load_document_with_limit;
use precis_llm::any::AnyProvider;
use precis_llm::ollama::OllamaProvider;
use precis_llm::openai::OpenAiProvider;
use precis_llm::provider::LlmProvider;

const PATH_PROMPT: &str = "Enter the file path (PDF, DOCX, or TXT)";

#[derive(Debug, Parser)]
#[command(name = "precis")]
#[command(about = "Summarize a PDF, DOCX or plain-text document with an LLM")]
#[command(version)]
struct Args {
    /// Document to summarize. Prompted for when omitted.
    path: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Target summary length in words
    #[arg(short, long, value_name = "N")]
    words: Option<NonZeroU32>,

    /// Characters of document text sent to the model
    #[arg(long, value_name = "N")]
    max_chars: Option<usize>,

    /// LLM backend: openai or ollama
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Print the prompt instead of calling the model
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_subscriber();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", render_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config_path = resolve_config_path(args.config.as_deref());
    let mut config = Config::load(&config_path)?;
    apply_args(&mut config, &args);
    config.validate()?;

    let path = match args.path {
        Some(path) => path,
        None => prompt_for_path()?,
    };
    let target_words = config.summary.target_words;

    let document = load_document_with_limit(&path, config.document.max_file_size).await?;
    tracing::info!(
        source = %document.metadata.source,
        content_type = %document.metadata.content_type,
        "document loaded"
    );

    if args.dry_run {
        let request = SummaryRequest::new(
            &document.content,
            target_words,
            config.summary.max_input_chars,
        );
        println!("{}", request.prompt());
        return Ok(());
    }

    config.resolve_secrets();
    let provider = create_provider(&config)?;
    health_check(&provider).await;
    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        "summarizing"
    );

    let summarizer =
        Summarizer::new(provider).with_max_input_chars(config.summary.max_input_chars);
    let summary = summarizer.summarize(&document.content, target_words).await?;

    println!("Summary:");
    println!("{summary}");
    Ok(())
}

/// Command-line flags take precedence over file and env settings.
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(words) = args.words {
        config.summary.target_words = words;
    }
    if let Some(max_chars) = args.max_chars {
        config.summary.max_input_chars = max_chars;
    }
    if let Some(kind) = args.provider {
        config.llm.provider = kind;
    }
}

/// Interactive prompt on a terminal, otherwise the first line of stdin.
fn prompt_for_path() -> anyhow::Result<PathBuf> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return read_path_line(stdin.lock());
    }
    let input: String = dialoguer::Input::new()
        .with_prompt(PATH_PROMPT)
        .interact_text()
        .context("failed to read file path")?;
    Ok(PathBuf::from(input.trim()))
}

fn read_path_line(mut reader: impl BufRead) -> anyhow::Result<PathBuf> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read file path")?;
    let path = line.trim();
    if path.is_empty() {
        bail!("no file path given");
    }
    Ok(PathBuf::from(path))
}

fn create_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let llm = &config.llm;
    match llm.provider {
        ProviderKind::OpenAi => {
            let api_key = config.secrets.openai_api_key.as_ref().context(
                "OpenAI API key not found (set PRECIS_OPENAI_API_KEY or OPENAI_API_KEY)",
            )?;
            let client =
                precis_llm::http::client_with_timeout(Duration::from_secs(llm.timeout_secs))
                    .context("failed to build HTTP client")?;
            Ok(AnyProvider::OpenAi(OpenAiProvider::new(
                client,
                api_key.expose().to_owned(),
                llm.effective_base_url().to_owned(),
                llm.effective_model().to_owned(),
                llm.temperature,
                llm.max_tokens,
            )))
        }
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(OllamaProvider::new(
            llm.effective_base_url(),
            llm.effective_model().to_owned(),
            llm.temperature,
        ))),
    }
}

async fn health_check(provider: &AnyProvider) {
    if let AnyProvider::Ollama(ollama) = provider
        && let Err(e) = ollama.health_check().await
    {
        tracing::warn!("ollama health check failed: {e:#}");
    }
}

fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("PRECIS_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

/// Join the error chain with `: `, skipping causes whose message is already
/// embedded in the previous one.
fn render_error(err: &anyhow::Error) -> String {
    let mut out = err.to_string();
    let mut prev = out.clone();
    for cause in err.chain().skip(1) {
        let msg = cause.to_string();
        if !prev.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        prev = msg;
    }
    out
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
