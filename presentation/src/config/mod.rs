//! Session settings: CLI flags layered over the loaded file config.

use crate::cli::commands::{Cli, OutputFormat};
use mrce_application::DeliberationParams;
use mrce_domain::{DomainError, Query, RoundMode};
use mrce_infrastructure::FileConfig;
use std::path::PathBuf;

/// Everything a session needs besides the oracle
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub params: DeliberationParams,
    pub mode: RoundMode,
    pub goal: String,
    pub output: OutputFormat,
    pub color: bool,
    pub show_progress: bool,
    pub hints_cache: Option<PathBuf>,
}

impl SessionSettings {
    /// Explicit CLI flags win over every file and environment source.
    pub fn from_sources(cli: &Cli, file: &FileConfig) -> Self {
        let d = &file.deliberation;
        let mut params = d.to_params().with_judge_payload(cli.print_judge_payload);
        if let Some(max_rounds) = cli.max_rounds {
            params = params.with_max_rounds(max_rounds);
        }
        if let Some(top_k) = cli.top_k {
            params = params.with_top_k(top_k);
        }
        if let Some(min_conf) = cli.gate_min_conf {
            params = params.with_gate_min_conf(min_conf);
        }
        if let Some(lambda) = cli.gate_lambda {
            params = params.with_gate_lambda(lambda);
        }

        let goal = cli
            .goal
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| d.goal_or_default())
            .to_string();

        Self {
            params,
            mode: cli.mode.or_else(|| d.parse_mode()).unwrap_or_default(),
            goal,
            output: cli.output,
            color: file.output.color && !cli.no_color,
            show_progress: !cli.quiet && cli.output != OutputFormat::Json,
            hints_cache: cli.hints_cache.clone(),
        }
    }

    /// Build a query carrying this session's goal and mode.
    pub fn query(&self, text: &str) -> Result<Query, DomainError> {
        Ok(Query::try_new(text)?
            .with_goal(self.goal.clone())
            .with_mode(self.mode))
    }
}
