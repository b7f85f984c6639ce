//! Gate results: the per-round eligibility check for one expert.

use crate::expert::persona::Persona;
use crate::oracle::reply::OracleReply;
use serde::{Deserialize, Serialize};

const RESPOND_FIELDS: &[&str] = &["respond", "should_respond", "decision", "eligible", "answer"];
const CONFIDENCE_FIELDS: &[&str] = &["confidence", "conf", "score", "probability"];
const COVERAGE_FIELDS: &[&str] = &["coverage_tags", "coverage", "tags", "topics"];

/// Confidence assumed when the gate says "yes" without a number.
const IMPLIED_CONFIDENCE: f64 = 0.5;

/// Outcome of an expert's gate check. Recomputed every round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub persona: Persona,
    pub respond: bool,
    /// Clamped to [0, 1]
    pub confidence: f64,
    /// Topical tags the gate reported for this round
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coverage_tags: Vec<String>,
}

impl GateResult {
    pub fn new(persona: Persona, respond: bool, confidence: f64) -> Self {
        Self {
            persona,
            respond,
            confidence: clamp_confidence(confidence),
            coverage_tags: Vec::new(),
        }
    }

    pub fn with_coverage_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coverage_tags = tags
            .into_iter()
            .map(|t| t.into().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// A gate that failed, timed out, or could not be read.
    pub fn failed(persona: Persona) -> Self {
        Self::new(persona, false, 0.0)
    }

    /// Read a gate reply. Anything unusable counts as a failed gate.
    pub fn from_reply(persona: Persona, reply: &OracleReply) -> Self {
        let Some(fields) = reply.fields() else {
            return Self::failed(persona);
        };

        let respond = fields.flag(RESPOND_FIELDS);
        let confidence = fields.number(CONFIDENCE_FIELDS);

        let (respond, confidence) = match (respond, confidence) {
            (Some(respond), Some(conf)) => (respond, conf),
            (Some(true), None) => (true, IMPLIED_CONFIDENCE),
            (Some(false), None) => (false, 0.0),
            (None, Some(conf)) => (conf > 0.0, conf),
            (None, None) => return Self::failed(persona),
        };

        let tags = fields.list(COVERAGE_FIELDS).unwrap_or_default();
        Self::new(persona, respond, confidence).with_coverage_tags(tags)
    }

    /// Passes the hard confidence floor and agreed to respond.
    pub fn is_eligible(&self, min_confidence: f64) -> bool {
        self.respond && self.confidence >= min_confidence
    }
}

/// Clamp to [0, 1], reading values in (1, 100] as percentages.
fn clamp_confidence(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let value = if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    };
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_reply() {
        let reply = OracleReply::parse(
            r#"{"respond": "yes", "confidence": 0.82, "coverage_tags": "Risks, edge cases"}"#,
        );
        let gate = GateResult::from_reply(Persona::Critic, &reply);

        assert!(gate.respond);
        assert!((gate.confidence - 0.82).abs() < 1e-9);
        assert_eq!(gate.coverage_tags, vec!["risks", "edge cases"]);
    }

    #[test]
    fn test_from_labelled_reply_with_percentage() {
        let reply = OracleReply::parse("RESPOND: yes\nCONFIDENCE: 75");
        let gate = GateResult::from_reply(Persona::Analyst, &reply);
        assert!((gate.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_declined_gate_is_not_eligible() {
        let reply = OracleReply::parse(r#"{"respond": "no", "confidence": 0.9}"#);
        let gate = GateResult::from_reply(Persona::Theorist, &reply);
        assert!(!gate.is_eligible(0.1));
    }

    #[test]
    fn test_missing_fields() {
        let yes_only = GateResult::from_reply(Persona::Analyst, &OracleReply::parse("respond: yes"));
        assert_eq!(yes_only.confidence, IMPLIED_CONFIDENCE);

        let unusable = GateResult::from_reply(Persona::Analyst, &OracleReply::parse("hmm"));
        assert_eq!(unusable, GateResult::failed(Persona::Analyst));
    }

    #[test]
    fn test_eligibility_floor_is_inclusive() {
        let gate = GateResult::new(Persona::Empiricist, true, 0.5);
        assert!(gate.is_eligible(0.5));
        assert!(!gate.is_eligible(0.51));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(GateResult::new(Persona::Analyst, true, -0.3).confidence, 0.0);
        assert_eq!(GateResult::new(Persona::Analyst, true, 250.0).confidence, 1.0);
        assert_eq!(GateResult::new(Persona::Analyst, true, f64::NAN).confidence, 0.0);
    }
}
