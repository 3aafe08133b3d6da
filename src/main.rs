//! okrd CLI entry point
//!
//! Owns the lifecycle of the shared capabilities: the LLM client and the
//! exemplar index are built once here and injected into each component.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use okrd::cli::{Cli, Command};
use okrd::config::Config;
use okrd::decompose::{DecomposerConfig, TaskDecomposer};
use okrd::domain::{Task, UserContext};
use okrd::extract::{ExtractorConfig, OkrExtractor};
use okrd::index::ExemplarIndex;
use okrd::llm::{LlmClient, create_client};
use okrd::reminder::{InMemorySentStore, LoggingSink, ReminderScheduler, SchedulerConfig};

fn setup_logging(verbose: bool) -> Result<()> {
    // Write to a log file, keep stdout for command output
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("okrd")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("okrd.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

/// Read OKR text from the argument or stdin
fn read_okr_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read OKR text from stdin")?;
            Ok(buf)
        }
    }
}

fn build_index(config: &Config) -> Result<Arc<ExemplarIndex>> {
    let index = if config.index.corpus_file.exists() {
        ExemplarIndex::from_corpus_file(&config.index.corpus_file, &config.index)?
    } else {
        tracing::warn!(
            "corpus file {} not found, queries will return no exemplars",
            config.index.corpus_file.display()
        );
        ExemplarIndex::build(&[], &config.index)
    };
    Ok(Arc::new(index))
}

fn build_extractor(config: &Config, llm: Arc<dyn LlmClient>, index: Arc<ExemplarIndex>) -> OkrExtractor {
    OkrExtractor::new(
        llm,
        index,
        ExtractorConfig {
            top_k: config.index.top_k,
            ..ExtractorConfig::default()
        },
    )
}

async fn cmd_parse(config: &Config, text: Option<String>) -> Result<()> {
    let okr_text = read_okr_text(text)?;
    let llm = create_client(&config.llm)?;
    let index = build_index(config)?;

    let objective = build_extractor(config, llm, index)
        .extract(&okr_text)
        .await
        .context("Failed to extract objective")?;

    println!("{}", serde_json::to_string_pretty(&objective)?);
    Ok(())
}

async fn cmd_decompose(config: &Config, text: Option<String>) -> Result<()> {
    let okr_text = read_okr_text(text)?;
    let llm = create_client(&config.llm)?;
    let index = build_index(config)?;

    let objective = build_extractor(config, llm.clone(), index)
        .extract(&okr_text)
        .await
        .context("Failed to extract objective")?;

    let tasks = TaskDecomposer::new(llm, DecomposerConfig::default())
        .decompose(&objective)
        .await;

    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(())
}

async fn cmd_remind(config: &Config, tasks_path: &PathBuf, users_path: &PathBuf) -> Result<()> {
    let tasks: Vec<Task> = serde_yaml::from_str(
        &fs::read_to_string(tasks_path).context(format!("Failed to read {}", tasks_path.display()))?,
    )
    .context("Failed to parse task file")?;

    let users: Vec<UserContext> = serde_yaml::from_str(
        &fs::read_to_string(users_path).context(format!("Failed to read {}", users_path.display()))?,
    )
    .context("Failed to parse user file")?;

    let llm = create_client(&config.llm)?;
    let index = build_index(config)?;

    let mut scheduler = ReminderScheduler::new(
        llm,
        index,
        Arc::new(LoggingSink::new("email")),
        Arc::new(LoggingSink::new("dashboard")),
        Box::new(InMemorySentStore::new()),
        SchedulerConfig {
            window_close_hours: config.reminder.window_close_hours,
            window_open_hours: config.reminder.window_open_hours,
            mark_sent_on_failure: config.reminder.mark_sent_on_failure,
            top_k: config.index.top_k,
            ..SchedulerConfig::default()
        },
    );

    scheduler
        .run(&tasks, &users)
        .await
        .context("Reminder cycle failed")?;

    info!(task_count = tasks.len(), user_count = users.len(), "reminder cycle complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(
        "okrd loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Parse { text } => cmd_parse(&config, text).await,
        Command::Decompose { text } => cmd_decompose(&config, text).await,
        Command::Remind { tasks, users } => cmd_remind(&config, &tasks, &users).await,
    }
}
