//! Console output for deliberation outcomes

use colored::Colorize;
use mrce_application::DeliberationOutcome;
use mrce_domain::{Query, RoundRecord, VerdictSource};

/// Judge payloads longer than this are cut when printed.
pub const JUDGE_PAYLOAD_PRINT_LIMIT: usize = 4000;

/// Answers in the per-round trace are cut to this many characters.
const TRACE_ANSWER_LIMIT: usize = 600;

/// Formats deliberation outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Per-round trace followed by the final answer
    pub fn format_full(query: &Query, outcome: &DeliberationOutcome, show_payload: bool) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Deliberation"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), query));
        output.push_str(&format!("{} {}\n", "Goal:".cyan().bold(), query.goal()));
        output.push_str(&format!("{} {}\n", "Mode:".cyan().bold(), query.mode()));

        for record in &outcome.trace {
            output.push_str(&Self::format_round(record, show_payload));
        }

        output.push_str(&Self::section_header("Final"));
        output.push_str(&Self::format_conclusion(outcome));
        output.push_str(&Self::footer());
        output
    }

    /// One round of the trace
    pub fn format_round(record: &RoundRecord, show_payload: bool) -> String {
        let mut output = String::new();

        let title = format!("Round {} | vibe: {}", record.round, record.vibe);
        output.push_str(&Self::section_header(&title));
        if record.routing_degraded() {
            output.push_str(&format!("{}\n", "(router unavailable, default vibe)".dimmed()));
        }

        output.push_str(&format!("{}\n", "Gates:".bold()));
        for gate in &record.gates {
            let selected = record.selected.contains(&gate.persona);
            let mark = if selected {
                "+".green().bold()
            } else if gate.respond {
                "-".yellow()
            } else {
                "x".red()
            };
            let tags = if gate.coverage_tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", gate.coverage_tags.join(", "))
            };
            output.push_str(&format!(
                "  {} {:<22} conf={:.2}{}\n",
                mark,
                gate.persona.display_name(),
                gate.confidence,
                tags.dimmed()
            ));
        }

        if record.is_no_consensus() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Verdict:".yellow().bold(),
                record.verdict.rationale
            ));
        } else {
            for candidate in &record.candidates {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", candidate.label()).yellow().bold(),
                    Self::indent(&truncate(&candidate.answer, TRACE_ANSWER_LIMIT), "  ")
                ));
            }

            let ranking = record
                .verdict
                .ranking
                .iter()
                .map(|p| p.display_name())
                .collect::<Vec<_>>()
                .join(" > ");
            let source = match record.verdict.source {
                VerdictSource::Oracle => "judge",
                VerdictSource::SingleCandidate => "single candidate",
                VerdictSource::Fallback => "heuristic fallback",
                VerdictSource::NoConsensus => "no consensus",
            };
            output.push_str(&format!(
                "\n{} {} {}\n",
                "Ranking:".green().bold(),
                ranking,
                format!("({})", source).dimmed()
            ));
            output.push_str(&format!("{} {}\n", "Rationale:".bold(), record.verdict.rationale));
        }

        if show_payload && let Some(payload) = &record.verdict.payload {
            let text = serde_json::to_string_pretty(payload).unwrap_or_default();
            output.push_str(&format!(
                "{}\n{}\n",
                "Judge payload:".magenta().bold(),
                truncate(&text, JUDGE_PAYLOAD_PRINT_LIMIT)
            ));
        }

        if let Some(score) = &record.score {
            output.push_str(&format!(
                "{} route={:.2} quality={:.2} align={:.2} stop={}\n",
                "Scores:".bold(),
                score.route_quality,
                score.candidate_quality,
                score.goal_alignment,
                score.stop_label.as_str()
            ));
            if !score.router_hint.trim().is_empty() {
                output.push_str(&format!("  router hint: {}\n", score.router_hint.trim()));
            }
            for (persona, hint) in &score.expert_hints {
                if !hint.trim().is_empty() {
                    output.push_str(&format!("  {} hint: {}\n", persona, hint.trim()));
                }
            }
        }

        for anomaly in &record.anomalies {
            output.push_str(&format!("  {} {}\n", "!".yellow().bold(), anomaly));
        }

        output
    }

    /// Final answer and condensed summary only
    pub fn format_summary(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", "=== Deliberation Result ===".cyan().bold()));
        output.push_str(&Self::format_conclusion(outcome));
        output
    }

    /// Whole outcome as JSON
    pub fn format_json(outcome: &DeliberationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_conclusion(outcome: &DeliberationOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n{}\n\n", "Answer:".green().bold(), outcome.answer));
        if !outcome.rationale.is_empty() {
            output.push_str(&format!("{} {}\n\n", "Rationale:".bold(), outcome.rationale));
        }
        output.push_str(&format!(
            "{} {} after {} round(s)\n",
            "Stopped:".bold(),
            outcome.termination,
            outcome.rounds()
        ));
        if !outcome.summary.is_empty() {
            output.push_str(&format!("\n{}\n", "Summary:".dimmed()));
            output.push_str(&Self::indent(&outcome.summary, "  "));
            output.push('\n');
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Turn colored output off for the whole process when disabled.
pub fn configure_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// Cut `text` to at most `limit` characters, marking the cut.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}... [truncated]", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrce_domain::{
        Candidate, GateResult, OrchestratorState, Persona, RoundScore, Termination, Verdict,
        VibeLabel,
    };

    fn record(with_payload: bool) -> RoundRecord {
        let candidates = vec![
            Candidate::new(Persona::Critic, "CLAIMS: it fails at n = 0", 0.8),
            Candidate::new(Persona::Analyst, "CLAIMS: holds for n > 0", 0.6),
        ];
        RoundRecord {
            round: 1,
            vibe: VibeLabel::Critical,
            gates: vec![
                GateResult::new(Persona::Critic, true, 0.8),
                GateResult::new(Persona::Analyst, true, 0.6),
                GateResult::new(Persona::Theorist, false, 0.1),
            ],
            selected: vec![Persona::Critic, Persona::Analyst],
            candidates,
            verdict: Verdict {
                ranking: vec![Persona::Critic, Persona::Analyst],
                rationale: "the base case breaks".to_string(),
                source: VerdictSource::Oracle,
                payload: with_payload.then(|| serde_json::json!({"question": "x".repeat(5000)})),
            },
            score: Some(RoundScore::neutral()),
            anomalies: vec![],
            summary_entry: "Round 1 | vibe=critical | top=Critic".to_string(),
        }
    }

    fn outcome() -> DeliberationOutcome {
        DeliberationOutcome {
            answer: "CLAIMS: it fails at n = 0".to_string(),
            rationale: "the base case breaks".to_string(),
            final_vibe: Some(VibeLabel::Critical),
            summary: "Round 1 | vibe=critical | top=Critic".to_string(),
            trace: vec![record(false)],
            snapshot: Default::default(),
            state: OrchestratorState {
                round: 1,
                ..Default::default()
            },
            termination: Termination::BudgetExhausted,
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate("ééééé", 2);
        assert!(cut.starts_with("éé..."));
    }

    #[test]
    fn test_round_lists_gates_and_ranking() {
        let text = ConsoleFormatter::format_round(&record(false), false);
        assert!(text.contains("Theorist"));
        assert!(text.contains("Critic > Analyst"));
        assert!(text.contains("the base case breaks"));
        assert!(!text.contains("Judge payload"));
    }

    #[test]
    fn test_payload_printed_and_truncated() {
        let text = ConsoleFormatter::format_round(&record(true), true);
        assert!(text.contains("Judge payload"));
        assert!(text.contains("[truncated]"));
        assert!(!text.contains(&"x".repeat(4500)));
    }

    #[test]
    fn test_summary_contains_answer_and_termination() {
        let text = ConsoleFormatter::format_summary(&outcome());
        assert!(text.contains("it fails at n = 0"));
        assert!(text.contains("round budget exhausted"));
    }

    #[test]
    fn test_json_round_trips_answer() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&outcome())).unwrap();
        assert_eq!(json["answer"], "CLAIMS: it fails at n = 0");
        assert_eq!(json["termination"]["kind"], "budget_exhausted");
    }

    #[test]
    fn test_full_includes_query() {
        let query = Query::try_new("Does induction hold here?").unwrap();
        let text = ConsoleFormatter::format_full(&query, &outcome(), false);
        assert!(text.contains("Does induction hold here?"));
        assert!(text.contains("Round 1"));
    }
}
