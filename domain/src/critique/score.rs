//! Round scoring.
//!
//! A critique reply carries three scores, a stop label and hints. Scores
//! missing from the reply read as neutral (0.5); an unusable reply yields
//! [`RoundScore::neutral`], which changes nothing.

use crate::core::query::Query;
use crate::deliberation::vibe::VibeLabel;
use crate::expert::Persona;
use crate::oracle::reply::{OracleReply, ReplyFields};
use crate::oracle::request::{Capability, OracleRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Any score below this marks the round as low quality.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.3;

const NEUTRAL_SCORE: f64 = 0.5;

const ROUTE_FIELDS: &[&str] = &["route_score", "route_quality", "routing_score", "routing"];
const QUALITY_FIELDS: &[&str] = &["quality_score", "candidate_quality", "answer_quality", "quality"];
const ALIGNMENT_FIELDS: &[&str] = &["alignment_score", "goal_alignment", "alignment"];
const STOP_FIELDS: &[&str] = &["stop_label", "stop", "status", "decision"];
const ROUTER_HINT_FIELDS: &[&str] = &["router_hint", "router_guidance", "routing_hint"];
const NESTED_HINT_FIELDS: &[&str] = &["expert_hints", "hints", "persona_hints"];

/// Meta-critic's call on whether deliberation should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLabel {
    #[default]
    Continue,
    IrreducibleTruth,
    Contradiction,
}

impl StopLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopLabel::Continue => "continue",
            StopLabel::IrreducibleTruth => "irreducible_truth",
            StopLabel::Contradiction => "contradiction",
        }
    }

    pub fn is_stop(&self) -> bool {
        !matches!(self, StopLabel::Continue)
    }

    /// Lenient read of a stop label from free text.
    ///
    /// An exact label wins; otherwise the earliest label word in the text
    /// decides, so "continue (no irreducible truth yet)" stays `Continue`.
    pub fn find_in(text: &str) -> Option<StopLabel> {
        let lowered = text.trim().to_lowercase().replace([' ', '-'], "_");
        let exact = lowered.trim_matches(|c: char| !c.is_alphanumeric() && c != '_');
        match exact {
            "continue" => return Some(StopLabel::Continue),
            "irreducible_truth" => return Some(StopLabel::IrreducibleTruth),
            "contradiction" => return Some(StopLabel::Contradiction),
            _ => {}
        }

        const MARKERS: [(&str, StopLabel); 4] = [
            ("continue", StopLabel::Continue),
            ("irreducible", StopLabel::IrreducibleTruth),
            ("truth", StopLabel::IrreducibleTruth),
            ("contradict", StopLabel::Contradiction),
        ];
        MARKERS
            .iter()
            .filter_map(|(marker, label)| lowered.find(marker).map(|pos| (pos, *label)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, label)| label)
    }
}

impl fmt::Display for StopLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meta-critic output for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundScore {
    pub route_quality: f64,
    pub candidate_quality: f64,
    pub goal_alignment: f64,
    pub stop_label: StopLabel,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub router_hint: String,
    /// Only personas that took part in the round appear here.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expert_hints: BTreeMap<Persona, String>,
}

impl Default for RoundScore {
    fn default() -> Self {
        Self::neutral()
    }
}

impl RoundScore {
    /// Scores used when critique is unavailable.
    pub fn neutral() -> Self {
        Self {
            route_quality: NEUTRAL_SCORE,
            candidate_quality: NEUTRAL_SCORE,
            goal_alignment: NEUTRAL_SCORE,
            stop_label: StopLabel::Continue,
            router_hint: String::new(),
            expert_hints: BTreeMap::new(),
        }
    }

    /// Read a critique reply. Hints for non-participants are dropped.
    pub fn from_reply(reply: &OracleReply, participants: &[Persona]) -> Self {
        let Some(fields) = reply.fields() else {
            return Self::neutral();
        };

        Self {
            route_quality: score(fields, ROUTE_FIELDS),
            candidate_quality: score(fields, QUALITY_FIELDS),
            goal_alignment: score(fields, ALIGNMENT_FIELDS),
            stop_label: fields
                .text(STOP_FIELDS)
                .and_then(|t| StopLabel::find_in(&t))
                .unwrap_or_default(),
            router_hint: fields.text(ROUTER_HINT_FIELDS).unwrap_or_default(),
            expert_hints: expert_hints(fields, participants),
        }
    }

    /// True when any of the three scores falls below the threshold.
    pub fn is_low_quality(&self) -> bool {
        [self.route_quality, self.candidate_quality, self.goal_alignment]
            .iter()
            .any(|s| *s < LOW_QUALITY_THRESHOLD)
    }
}

fn score(fields: &ReplyFields, aliases: &[&str]) -> f64 {
    fields
        .number(aliases)
        .map(|n| n.clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL_SCORE)
}

fn expert_hints(fields: &ReplyFields, participants: &[Persona]) -> BTreeMap<Persona, String> {
    let nested: BTreeMap<Persona, String> = fields
        .map(NESTED_HINT_FIELDS)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, hint)| {
            let key = key.strip_suffix("_hint").unwrap_or(&key);
            key.parse::<Persona>().ok().map(|p| (p, hint))
        })
        .collect();

    let mut hints = BTreeMap::new();
    for persona in participants {
        let flat_keys = flat_hint_keys(*persona);
        let flat_refs: Vec<&str> = flat_keys.iter().map(String::as_str).collect();
        let hint = fields
            .text(&flat_refs)
            .or_else(|| nested.get(persona).cloned())
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        if let Some(hint) = hint {
            hints.insert(*persona, hint);
        }
    }
    hints
}

/// `<persona>_hint` keys, including the short form some replies use.
fn flat_hint_keys(persona: Persona) -> Vec<String> {
    let mut keys = vec![format!("{}_hint", persona.as_str())];
    if persona == Persona::Synthesizer {
        keys.push("synth_hint".to_string());
    }
    keys
}

/// Build the critique request for a completed round.
pub fn critique_request(
    query: &Query,
    vibe: VibeLabel,
    answer: &str,
    rationale: &str,
    summary: &str,
    participants: &[Persona],
) -> OracleRequest {
    let hint_keys: Vec<String> = participants
        .iter()
        .map(|p| format!("{}_hint", p.as_str()))
        .collect();

    OracleRequest::new(Capability::Critique)
        .with_field("query", query.content())
        .with_field("goal", query.goal())
        .with_field("mode", query.mode().as_str())
        .with_field("chosen_vibe", vibe.as_str())
        .with_field("answer", answer)
        .with_field("rationale", rationale)
        .with_field("summary_so_far", summary)
        .with_field(
            "participants",
            participants.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        )
        .with_field(
            "expected",
            format!(
                "stop_label (continue|irreducible_truth|contradiction), route_score, quality_score, alignment_score in [0,1], router_hint, {}",
                hint_keys.join(", ")
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reply() {
        let reply = OracleReply::parse(
            r#"{
                "stop_label": "irreducible_truth",
                "route_score": 0.9,
                "quality_score": "0.7",
                "alignment_score": 1.4,
                "router_hint": "prefer critical",
                "critic_hint": "name one kill-shot",
                "synth_hint": "fewer options"
            }"#,
        );
        let score = RoundScore::from_reply(&reply, &[Persona::Critic, Persona::Synthesizer]);

        assert_eq!(score.stop_label, StopLabel::IrreducibleTruth);
        assert_eq!(score.route_quality, 0.9);
        assert_eq!(score.candidate_quality, 0.7);
        assert_eq!(score.goal_alignment, 1.0);
        assert_eq!(score.router_hint, "prefer critical");
        assert_eq!(score.expert_hints[&Persona::Critic], "name one kill-shot");
        assert_eq!(score.expert_hints[&Persona::Synthesizer], "fewer options");
    }

    #[test]
    fn test_hints_for_non_participants_dropped() {
        let reply = OracleReply::parse(r#"{"analyst_hint": "x", "critic_hint": "y"}"#);
        let score = RoundScore::from_reply(&reply, &[Persona::Critic]);
        assert_eq!(score.expert_hints.len(), 1);
        assert!(score.expert_hints.contains_key(&Persona::Critic));
    }

    #[test]
    fn test_nested_hints() {
        let reply = OracleReply::parse(
            r#"{"expert_hints": {"Systems Engineer": "order the steps", "critic": ""}}"#,
        );
        let score = RoundScore::from_reply(
            &reply,
            &[Persona::SystemsEngineer, Persona::Critic],
        );
        assert_eq!(
            score.expert_hints.get(&Persona::SystemsEngineer).map(String::as_str),
            Some("order the steps")
        );
        assert!(!score.expert_hints.contains_key(&Persona::Critic));
    }

    #[test]
    fn test_missing_scores_are_neutral() {
        let reply = OracleReply::parse("STOP_LABEL: continue");
        let score = RoundScore::from_reply(&reply, &[]);
        assert_eq!(score.route_quality, 0.5);
        assert_eq!(score.stop_label, StopLabel::Continue);
        assert!(!score.is_low_quality());
    }

    #[test]
    fn test_continue_with_explanation_stays_continue() {
        let reply = OracleReply::parse("STOP_LABEL: continue (no irreducible truth yet)\nROUTE_SCORE: 0.8");
        let score = RoundScore::from_reply(&reply, &[]);
        assert_eq!(score.stop_label, StopLabel::Continue);
        assert_eq!(score.route_quality, 0.8);
    }

    #[test]
    fn test_unparseable_is_neutral() {
        assert_eq!(
            RoundScore::from_reply(&OracleReply::Unparseable, &[Persona::Analyst]),
            RoundScore::neutral()
        );
    }

    #[test]
    fn test_low_quality() {
        let mut score = RoundScore::neutral();
        score.goal_alignment = 0.29;
        assert!(score.is_low_quality());
        score.goal_alignment = 0.3;
        assert!(!score.is_low_quality());
    }

    #[test]
    fn test_stop_label_find_in() {
        assert_eq!(StopLabel::find_in("Contradiction"), Some(StopLabel::Contradiction));
        assert_eq!(
            StopLabel::find_in("irreducible truth"),
            Some(StopLabel::IrreducibleTruth)
        );
        assert_eq!(StopLabel::find_in("keep going"), None);
        assert_eq!(
            StopLabel::find_in("continue - truth not reached"),
            Some(StopLabel::Continue)
        );
        assert_eq!(
            StopLabel::find_in("\"irreducible_truth\""),
            Some(StopLabel::IrreducibleTruth)
        );
    }

    #[test]
    fn test_critique_request_lists_hint_keys() {
        let query = Query::try_new("q").unwrap();
        let req = critique_request(
            &query,
            VibeLabel::Plan,
            "answer",
            "why",
            "",
            &[Persona::SystemsEngineer],
        );
        let expected = req.field("expected").unwrap().as_str().unwrap();
        assert!(expected.contains("systems_engineer_hint"));
        assert_eq!(req.field("chosen_vibe").unwrap(), "plan");
    }
}
