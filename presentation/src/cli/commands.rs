//! CLI command definitions

use clap::{Parser, ValueEnum};
use mrce_domain::RoundMode;
use std::path::PathBuf;

/// What to print once a deliberation finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Per-round trace followed by the final answer
    #[default]
    Full,
    /// Final answer and condensed summary only
    Summary,
    /// JSON of the whole outcome
    Json,
}

/// CLI arguments for mrce
#[derive(Parser, Debug)]
#[command(name = "mrce")]
#[command(author, version, about = "Multi-round expert deliberation over a reasoning oracle")]
#[command(long_about = r#"
mrce runs a bounded number of deliberation rounds over a question.

Each round:
1. Route: classify the query into a vibe (analytic, creative, critical, plan)
2. Schedule: gate every expert persona, keep a confident and diverse top-k
3. Judge: rank the selected experts' answers
4. Critique: score the round and leave hints for the next one

The session stops at the round budget, on convergence, or after two
consecutive low-quality rounds. With no question, an interactive prompt
starts instead.

Configuration files are loaded from (in priority order):
1. MRCE_* environment variables
2. --config <path>
3. ./mrce.toml or ./.mrce.toml
4. ~/.config/mrce/config.toml

Example:
  mrce "Is P != NP provable with relativizing techniques?" --mode attack
  mrce --max_rounds 5 --top_k 2 --hints_cache ~/.cache/mrce/hints.json
"#)]
pub struct Cli {
    /// The question to deliberate; quoting is optional (omit for interactive mode)
    #[arg(value_name = "QUESTION")]
    pub question: Vec<String>,

    /// What the deliberation should reach
    #[arg(long, value_name = "TEXT")]
    pub goal: Option<String>,

    /// Round mode: explore, verify, attack, plan
    #[arg(long, value_name = "MODE")]
    pub mode: Option<RoundMode>,

    /// Round budget
    #[arg(long = "max_rounds", alias = "max-rounds", value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Experts selected per round
    #[arg(long = "top_k", alias = "top-k", value_name = "K")]
    pub top_k: Option<usize>,

    /// Minimum gate confidence for an expert to be eligible
    #[arg(long = "gate_min_conf", alias = "gate-min-conf", value_name = "CONF")]
    pub gate_min_conf: Option<f64>,

    /// Diversity penalty weight for expert selection
    #[arg(long = "gate_lambda", alias = "gate-lambda", value_name = "LAMBDA")]
    pub gate_lambda: Option<f64>,

    /// Print the judge request payload each round
    #[arg(long = "print_judge_payload", alias = "print-judge-payload")]
    pub print_judge_payload: bool,

    /// Load hints from and save hints to this JSON file
    #[arg(long = "hints_cache", alias = "hints-cache", value_name = "PATH")]
    pub hints_cache: Option<PathBuf>,

    /// Append a JSONL transcript of every oracle exchange and round
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// The question words joined with single spaces, or `None` when no
    /// question was given.
    pub fn question_text(&self) -> Option<String> {
        let joined = self.question.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
