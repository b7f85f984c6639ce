//! Progress reporting for deliberation rounds

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mrce_application::DeliberationProgress;
use mrce_domain::{Persona, RoundRecord, Stage};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner per round showing the active stage
pub struct ProgressReporter {
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stage_display_name(stage: Stage) -> &'static str {
        match stage {
            Stage::Init => "Starting",
            Stage::Routing => "Routing query",
            Stage::Scheduling => "Gating experts",
            Stage::Judging => "Judging candidates",
            Stage::Critiquing => "Critiquing round",
            Stage::Summarizing => "Summarizing",
            Stage::Continue => "Next round",
            Stage::Terminated => "Done",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.round_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationProgress for ProgressReporter {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}/{}", round, max_rounds));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.round_bar.lock()
            && let Some(previous) = guard.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_stage(&self, _round: u32, stage: Stage) {
        self.with_bar(|pb| pb.set_message(Self::stage_display_name(stage)));
    }

    fn on_gate_complete(&self, persona: Persona, eligible: bool) {
        let mark = if eligible { "v".green() } else { "-".dimmed() };
        self.with_bar(|pb| {
            pb.set_message(format!("Gating experts {} {}", mark, persona.display_name()))
        });
    }

    fn on_candidate_complete(&self, persona: Persona, success: bool) {
        let mark = if success { "v".green() } else { "x".red() };
        self.with_bar(|pb| pb.set_message(format!("Answers {} {}", mark, persona.display_name())));
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        if let Ok(mut guard) = self.round_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(record.summary_entry.clone());
        }
    }
}

/// Plain line-per-event progress on stderr, for non-terminal output
pub struct SimpleProgress;

impl DeliberationProgress for SimpleProgress {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        eprintln!("{} {}", "->".cyan(), format!("Round {}/{}", round, max_rounds).bold());
    }

    fn on_stage(&self, _round: u32, stage: Stage) {
        eprintln!("  {}", ProgressReporter::stage_display_name(stage));
    }

    fn on_candidate_complete(&self, persona: Persona, success: bool) {
        if !success {
            eprintln!("  {} {} (no answer)", "x".red(), persona.display_name());
        }
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        eprintln!("  {}", record.summary_entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_name() {
        for stage in [
            Stage::Init,
            Stage::Routing,
            Stage::Scheduling,
            Stage::Judging,
            Stage::Critiquing,
            Stage::Summarizing,
            Stage::Continue,
            Stage::Terminated,
        ] {
            assert!(!ProgressReporter::stage_display_name(stage).is_empty());
        }
    }

    #[test]
    fn test_events_without_round_are_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_stage(1, Stage::Routing);
        reporter.on_gate_complete(Persona::Critic, true);
        assert!(reporter.round_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_round_lifecycle_clears_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_round_start(1, 3);
        assert!(reporter.round_bar.lock().unwrap().is_some());
        reporter.on_round_start(2, 3);
        assert!(reporter.round_bar.lock().unwrap().is_some());
    }
}
