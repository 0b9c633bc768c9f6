//! CLI entrypoint for startup-dojo
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod args;
mod output;
mod progress;
mod repl;

use anyhow::{Result, bail};
use args::Cli;
use clap::Parser;
use colored::Colorize;
use dojo_application::{
    BuildContextUseCase, ChatSession, ConversationLogger, NoConversationLogger, NoTurnProgress,
    RunTurnUseCase,
};
use dojo_infrastructure::config::{optional_credential, require_credential};
use dojo_infrastructure::{
    BuiltinToolExecutor, ConfigLoader, FileConfig, JsonSchemaToolConverter,
    JsonlConversationLogger, OpenAiCompatClient, OpenAiEmbeddingClient, PerplexitySearch,
    PythonCalculator, QdrantStore, WebPageReader,
};
use output::ConsoleFormatter;
use progress::TurnSpinner;
use repl::ChatRepl;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting startup-dojo");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_overrides(&mut config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("{} {}", "config:".red().bold(), issue);
        }
        bail!("{} configuration error(s)", issues.len());
    }

    // === Dependency Injection ===
    let mut session = build_session(&config)?;

    // Single question mode
    if let Some(question) = cli.question {
        let outcome = if cli.quiet {
            session.send(&question, &NoTurnProgress).await
        } else {
            session.send(&question, &TurnSpinner::new()).await
        };
        println!("{}", ConsoleFormatter::format(&outcome));
        return Ok(());
    }

    let mut repl = ChatRepl::new(session).with_progress(!cli.quiet);
    repl.run().await?;
    Ok(())
}

/// Command-line flags take precedence over every config source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(mode) = &cli.mode {
        config.session.mode = mode.clone();
    }
    if let Some(model) = &cli.model {
        config.chat.model = model.clone();
    }
    if let Some(k) = cli.top_k {
        config.retrieval.top_k = k;
    }
    if let Some(path) = &cli.log_file {
        config.session.log_file = Some(path.clone());
    }
}

fn build_session(config: &FileConfig) -> Result<ChatSession> {
    let execution = config.execution_params();
    let settings = config.session_settings()?;

    // Chat completion
    let api_key = require_credential(&config.chat.api_key_env, "chat completion")?;
    let client = Arc::new(OpenAiCompatClient::new(
        &config.chat.base_url,
        api_key,
        Duration::from_secs(config.chat.timeout_seconds),
    )?);

    // Retrieval
    let retrieval = &config.retrieval;
    let retrieval_timeout = Duration::from_secs(retrieval.timeout_seconds);
    let embedder = OpenAiEmbeddingClient::new(
        &retrieval.embedding_base_url,
        &retrieval.embedding_model,
        retrieval_timeout,
    )?
    .with_api_key(optional_credential(&retrieval.embedding_api_key_env));
    let store = QdrantStore::new(&retrieval.qdrant_url, retrieval_timeout)?
        .with_api_key(optional_credential(&retrieval.qdrant_api_key_env));

    // Tools
    let tools = &config.tools;
    let search_key = optional_credential(&tools.perplexity_api_key_env);
    if search_key.is_none() {
        warn!(
            env = %tools.perplexity_api_key_env,
            "Search key not set; search_via_perplexity will report it as missing"
        );
    }
    let search = PerplexitySearch::new(
        &tools.search_base_url,
        tools.search_model.clone(),
        search_key,
        Duration::from_secs(tools.search_timeout_seconds),
    )?
    .with_key_env(tools.perplexity_api_key_env.clone());

    let mut reader = WebPageReader::new(Duration::from_secs(tools.fetch_timeout_seconds))?
        .with_max_chars(tools.read_max_chars);
    if tools.use_reader {
        reader = reader.with_reader(
            tools.reader_base_url.clone(),
            optional_credential(&tools.jina_api_key_env),
        );
    }

    let calculator = PythonCalculator::new(&tools.calculator_interpreter)
        .with_timeout(Duration::from_secs(tools.calculator_timeout_seconds))
        .with_memory_limit_mb(tools.calculator_memory_mb);

    let executor = Arc::new(BuiltinToolExecutor::new(search, reader, calculator));

    // Transcript
    let logger: Arc<dyn ConversationLogger> = match config
        .session
        .log_file
        .as_ref()
        .and_then(JsonlConversationLogger::new)
    {
        Some(logger) => {
            info!(path = %logger.path().display(), "Writing JSONL transcript");
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    };

    let build_context = Arc::new(
        BuildContextUseCase::new(Arc::new(embedder), Arc::new(store))
            .with_collections(config.collections())
            .with_timeout(execution.retrieval_timeout)
            .with_conversation_logger(logger.clone()),
    );
    let run_turn = Arc::new(
        RunTurnUseCase::new(client, executor, Arc::new(JsonSchemaToolConverter))
            .with_conversation_logger(logger),
    );

    Ok(ChatSession::new(build_context, run_turn, execution, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "startup-dojo",
            "--mode",
            "compliance",
            "-m",
            "zai-glm-4.6",
            "-k",
            "7",
            "--log-file",
            "/tmp/t.jsonl",
        ]);
        let mut config = FileConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.session.mode, "compliance");
        assert_eq!(config.chat.model, "zai-glm-4.6");
        assert_eq!(config.retrieval.top_k, 7);
        assert!(config.session.log_file.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_missing_chat_key_fails_startup() {
        let mut config = FileConfig::default();
        config.chat.api_key_env = "DOJO_TEST_UNSET_CHAT_KEY_VARIABLE".into();

        let err = build_session(&config).err().unwrap();
        assert!(err.to_string().contains("DOJO_TEST_UNSET_CHAT_KEY_VARIABLE"));
    }
}
