//! Runs one query end to end: build, deliberate, print, persist hints.
//!
//! Shared by single-shot invocations and the interactive prompt. Hints
//! carry over from one query to the next for the life of the runner.

use crate::cli::commands::OutputFormat;
use crate::config::SessionSettings;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use mrce_application::{
    ConversationLogger, DeliberationOutcome, DeliberationProgress, NoConversationLogger,
    NoProgress, ReasoningOracle, RunDeliberationError, RunDeliberationInput,
    RunDeliberationUseCase,
};
use mrce_domain::{DomainError, HintSnapshot, Query};
use mrce_infrastructure::HintFileStore;
use std::io::IsTerminal;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    InvalidQuery(DomainError),

    #[error(transparent)]
    Deliberation(#[from] RunDeliberationError),
}

impl SessionError {
    /// Only invariant violations are fatal to the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Deliberation(e) if e.is_invariant_violation())
    }
}

pub struct QueryRunner<O: ReasoningOracle + 'static> {
    oracle: Arc<O>,
    settings: SessionSettings,
    logger: Arc<dyn ConversationLogger>,
    hint_store: Option<HintFileStore>,
    hints: Option<HintSnapshot>,
    print: bool,
}

impl<O: ReasoningOracle + 'static> QueryRunner<O> {
    /// Create a runner; hints are loaded from `settings.hints_cache` if set.
    pub fn new(oracle: Arc<O>, settings: SessionSettings) -> Self {
        let hint_store = settings.hints_cache.clone().map(HintFileStore::new);
        let hints = hint_store.as_ref().and_then(HintFileStore::load);
        if hints.is_some() {
            info!("Restored hints from cache");
        }
        Self {
            oracle,
            settings,
            logger: Arc::new(NoConversationLogger),
            hint_store,
            hints,
            print: true,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Disable printing (used by tests and embedding callers)
    pub fn silent(mut self) -> Self {
        self.print = false;
        self
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Hints that the next query will start from
    pub fn hints(&self) -> Option<&HintSnapshot> {
        self.hints.as_ref()
    }

    /// Deliberate one question. Ctrl-C cancels the running session.
    pub async fn run(&mut self, text: &str) -> Result<DeliberationOutcome, SessionError> {
        let query = self.settings.query(text).map_err(SessionError::InvalidQuery)?;

        let token = CancellationToken::new();
        let watcher = {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            })
        };

        let use_case = RunDeliberationUseCase::new(Arc::clone(&self.oracle))
            .with_conversation_logger(Arc::clone(&self.logger))
            .with_cancellation(token);
        let input = RunDeliberationInput::new(query.clone(), self.settings.params.clone())
            .with_prior(self.hints.clone());

        let progress = self.progress();
        let result = use_case
            .execute_with_progress(input, progress.as_ref())
            .await;
        watcher.abort();
        let outcome = result?;

        if self.print {
            self.print_outcome(&query, &outcome);
        }
        self.remember(&outcome);
        Ok(outcome)
    }

    fn progress(&self) -> Box<dyn DeliberationProgress> {
        if !self.print || !self.settings.show_progress {
            Box::new(NoProgress)
        } else if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        }
    }

    fn print_outcome(&self, query: &Query, outcome: &DeliberationOutcome) {
        let text = match self.settings.output {
            OutputFormat::Full => {
                ConsoleFormatter::format_full(query, outcome, self.settings.params.keep_judge_payload)
            }
            OutputFormat::Summary => ConsoleFormatter::format_summary(outcome),
            OutputFormat::Json => ConsoleFormatter::format_json(outcome),
        };
        println!("{}", text);
    }

    fn remember(&mut self, outcome: &DeliberationOutcome) {
        self.hints = Some(outcome.snapshot.clone());
        if let Some(store) = &self.hint_store
            && let Err(e) = store.save(&outcome.snapshot)
        {
            warn!("Could not save hints: {}", e);
        }
    }
}
