//! Request payload for the multi-candidate comparison capability.
//!
//! The comparison schema is not stable across oracle versions, so the
//! payload is a superset: candidates appear under every key a version has
//! been seen to read, and the question under both `question` and `query`.

use crate::core::query::Query;
use crate::judging::candidate::Candidate;
use crate::oracle::request::{Capability, OracleRequest};
use serde_json::{Value, json};

const CANDIDATE_KEYS: &[&str] = &["candidates", "completions", "responses", "answers"];
const QUESTION_KEYS: &[&str] = &["question", "query"];

/// Build the comparison request for two or more candidates.
pub fn comparison_request(query: &Query, candidates: &[Candidate]) -> OracleRequest {
    let entries: Vec<Value> = candidates
        .iter()
        .map(|c| {
            json!({
                "label": c.label(),
                "persona": c.persona.as_str(),
                "text": c.answer,
            })
        })
        .collect();
    let labels: Vec<&str> = candidates.iter().map(Candidate::label).collect();

    OracleRequest::new(Capability::Judge)
        .with_aliased_field(QUESTION_KEYS, query.content())
        .with_aliased_field(CANDIDATE_KEYS, entries)
        .with_field("labels", labels)
        .with_field("candidates_text", labelled_block(candidates))
        .with_field("goal", query.goal())
        .with_field("mode", query.mode().as_str())
        .with_field(
            "expected",
            "best (label), rankings (labels best-first, '>' separated), rationale",
        )
}

fn labelled_block(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("[{}]\n{}", c.label(), c.answer.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expert::Persona;

    #[test]
    fn test_payload_is_superset() {
        let query = Query::try_new("Is X valid?").unwrap();
        let candidates = vec![
            Candidate::new(Persona::Analyst, "yes", 0.9),
            Candidate::new(Persona::Critic, "no", 0.6),
        ];
        let req = comparison_request(&query, &candidates);

        for key in CANDIDATE_KEYS {
            assert_eq!(req.field(key).unwrap().as_array().unwrap().len(), 2);
        }
        assert_eq!(req.field("question"), req.field("query"));
        let block = req.field("candidates_text").unwrap().as_str().unwrap();
        assert!(block.contains("[Critic]\nno"));
    }
}
