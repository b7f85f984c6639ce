//! CLI entrypoint for mrce
//!
//! Wires the layers together: config, oracle adapter, transcript, and
//! either a single deliberation or the interactive prompt.
//!
//! Exit codes: 0 on any completed or cancelled session, 1 on an invariant
//! violation, 2 on a configuration error.

use anyhow::Result;
use clap::Parser;
use mrce_application::ConversationLogger;
use mrce_infrastructure::{ConfigLoader, JsonlTranscriptLogger, OpenAiCompatibleOracle, OracleSettings};
use mrce_presentation::{
    ChatRepl, Cli, QueryRunner, ReplError, SessionSettings, configure_color,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_INVARIANT: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
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

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let file_config = match ConfigLoader::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };

    let issues = file_config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("Configuration error: {}", issue);
        }
        return Ok(ExitCode::from(EXIT_CONFIG));
    }

    let settings = SessionSettings::from_sources(&cli, &file_config);
    if let Err(e) = settings.params.validate() {
        eprintln!("Configuration error: {}", e);
        return Ok(ExitCode::from(EXIT_CONFIG));
    }
    configure_color(settings.color);

    // === Dependency Injection ===
    let oracle_settings = match OracleSettings::from_env(&file_config.oracle) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };
    info!("Using oracle {:?}", oracle_settings);
    let oracle = Arc::new(OpenAiCompatibleOracle::new(oracle_settings));

    let mut runner = QueryRunner::new(oracle, settings);
    if let Some(path) = &cli.transcript
        && let Some(logger) = JsonlTranscriptLogger::new(path)
    {
        info!("Writing transcript to {}", logger.path().display());
        runner = runner.with_conversation_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
    }

    // Interactive mode
    let Some(question) = cli.question_text() else {
        let mut repl = ChatRepl::new(runner);
        return match repl.run().await {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(ReplError::Fatal(e)) => {
                error!("{}", e);
                Ok(ExitCode::from(EXIT_INVARIANT))
            }
            Err(e) => Err(e.into()),
        };
    };

    match runner.run(&question).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_fatal() => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(EXIT_INVARIANT))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(EXIT_CONFIG))
        }
    }
}
