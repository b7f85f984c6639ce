//! The shared `{gate, respond}` capability every expert offers.

use crate::core::query::Query;
use crate::deliberation::vibe::VibeLabel;
use crate::expert::persona::Persona;
use crate::oracle::request::{Capability, OracleRequest};

/// Sections every expert answer is asked to carry.
pub const ANSWER_SECTIONS: [&str; 5] = ["CLAIMS", "EVIDENCE", "ASSUMPTIONS", "TESTS", "RISKS"];

/// Per-round inputs shared by all experts.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub query: &'a Query,
    pub vibe: VibeLabel,
    /// Running summary of earlier rounds (empty in round 1)
    pub summary: &'a str,
}

/// An expert that can be gated and asked to respond.
///
/// The default request builders cover every persona; an implementor only
/// needs to say who it is and what hint it carries.
pub trait Expert {
    fn persona(&self) -> Persona;

    /// Coaching hint carried over from earlier rounds.
    fn hint(&self) -> &str;

    /// Cheap eligibility check: should this persona answer, and how sure is it.
    fn gate_request(&self, round: &RoundContext<'_>) -> OracleRequest {
        base_request(Capability::Gate, self.persona(), self.hint(), round)
            .with_field("expected", "respond (yes|no), confidence in [0,1], coverage_tags (comma-separated)")
    }

    /// Full structured answer for the round.
    fn respond_request(&self, round: &RoundContext<'_>) -> OracleRequest {
        base_request(Capability::Respond, self.persona(), self.hint(), round)
            .with_field("sections", ANSWER_SECTIONS.to_vec())
    }
}

fn base_request(
    capability: Capability,
    persona: Persona,
    hint: &str,
    round: &RoundContext<'_>,
) -> OracleRequest {
    OracleRequest::new(capability)
        .with_persona(persona)
        .with_field("persona", persona.display_name())
        .with_field("persona_text", persona.description())
        .with_field("query", round.query.content())
        .with_field("goal", round.query.goal())
        .with_field("mode", round.query.mode().as_str())
        .with_field("vibe", round.vibe.as_str())
        .with_field("hint", hint)
        .with_field("summary", round.summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Persona, &'static str);

    impl Expert for Fixed {
        fn persona(&self) -> Persona {
            self.0
        }
        fn hint(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn test_gate_request_carries_context() {
        let query = Query::try_new("Is X valid?").unwrap();
        let round = RoundContext {
            query: &query,
            vibe: VibeLabel::Critical,
            summary: "",
        };
        let req = Fixed(Persona::Critic, "be concrete").gate_request(&round);

        assert_eq!(req.capability, Capability::Gate);
        assert_eq!(req.persona, Some(Persona::Critic));
        assert_eq!(req.field("hint").unwrap(), "be concrete");
        assert_eq!(req.field("vibe").unwrap(), "critical");
        assert_eq!(req.field("mode").unwrap(), "verify");
    }

    #[test]
    fn test_respond_request_lists_sections() {
        let query = Query::try_new("q").unwrap();
        let round = RoundContext {
            query: &query,
            vibe: VibeLabel::Analytic,
            summary: "Round 1 ...",
        };
        let req = Fixed(Persona::Analyst, "").respond_request(&round);

        assert_eq!(req.capability, Capability::Respond);
        assert_eq!(req.field("sections").unwrap().as_array().unwrap().len(), 5);
        assert_eq!(req.field("summary").unwrap(), "Round 1 ...");
    }
}
