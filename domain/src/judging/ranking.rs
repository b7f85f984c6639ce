//! Turning a comparison reply into a ranking, and the fallback ranker.

use crate::expert::Persona;
use crate::expert::capability::ANSWER_SECTIONS;
use crate::judging::candidate::Candidate;
use crate::oracle::reply::{OracleReply, ReplyFields};

pub const FALLBACK_RATIONALE: &str = "fallback: structured comparison unavailable.";

const RANKING_FIELDS: &[&str] = &["rankings", "ranking", "ranked", "order", "ordering"];
const BEST_FIELDS: &[&str] = &["best", "best_label", "winner", "top", "choice"];
const RATIONALE_FIELDS: &[&str] = &["rationale", "reasoning", "justification", "explanation"];

/// Answer length at which the length factor saturates.
const FULL_LENGTH: f64 = 400.0;
const SECTION_BONUS: f64 = 0.05;

/// Ranking and rationale read from a comparison reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRanking {
    pub ranking: Vec<Persona>,
    pub rationale: Option<String>,
}

/// Read a usable ranking out of a comparison reply.
///
/// Returns `None` when the reply is unparseable or names no known
/// candidate; callers then fall back to [`fallback_ranking`]. A `best`
/// field, when present and known, always leads. Candidates the reply left
/// out are appended in declared order.
pub fn resolve_ranking(reply: &OracleReply, candidates: &[Candidate]) -> Option<ResolvedRanking> {
    let fields = reply.fields()?;
    let mut ranking = ranked_labels(fields, candidates);

    if let Some(best) = fields
        .text(BEST_FIELDS)
        .and_then(|label| match_label(&label, candidates))
    {
        ranking.retain(|p| *p != best);
        ranking.insert(0, best);
    }

    if ranking.is_empty() {
        return None;
    }

    for candidate in candidates {
        if !ranking.contains(&candidate.persona) {
            ranking.push(candidate.persona);
        }
    }

    Some(ResolvedRanking {
        ranking,
        rationale: fields.text(RATIONALE_FIELDS),
    })
}

fn ranked_labels(fields: &ReplyFields, candidates: &[Candidate]) -> Vec<Persona> {
    let mut ranking = Vec::new();
    for label in fields.list(RANKING_FIELDS).unwrap_or_default() {
        if let Some(persona) = match_label(&label, candidates)
            && !ranking.contains(&persona)
        {
            ranking.push(persona);
        }
    }
    ranking
}

/// Match a judge label against this round's candidates.
///
/// Accepts persona keys and aliases, display labels, `Candidate N` and bare
/// 1-based positions. Labels naming no candidate of this round yield `None`.
fn match_label(label: &str, candidates: &[Candidate]) -> Option<Persona> {
    let cleaned = label
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '[' | ']' | '(' | ')' | '*' | '.'))
        .trim();
    if cleaned.is_empty() {
        return None;
    }

    let lowered = cleaned.to_lowercase();
    let position = lowered
        .strip_prefix("candidate")
        .unwrap_or(&lowered)
        .trim()
        .parse::<usize>()
        .ok();
    if let Some(n) = position {
        return n
            .checked_sub(1)
            .and_then(|idx| candidates.get(idx))
            .map(|c| c.persona);
    }

    let persona = cleaned.parse::<Persona>().ok().or_else(|| {
        candidates
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(cleaned))
            .map(|c| c.persona)
    })?;
    candidates
        .iter()
        .any(|c| c.persona == persona)
        .then_some(persona)
}

/// Heuristic quality score used when no comparison is available.
///
/// Gate confidence scaled by answer length (saturating at 400 characters),
/// plus a small bonus for each recognized section header.
pub fn fallback_score(candidate: &Candidate) -> f64 {
    let length = candidate.answer.trim().chars().count() as f64;
    let length_factor = (length / FULL_LENGTH).min(1.0);
    candidate.confidence * length_factor + SECTION_BONUS * section_count(&candidate.answer) as f64
}

fn section_count(answer: &str) -> usize {
    ANSWER_SECTIONS
        .iter()
        .filter(|section| {
            answer.lines().any(|line| {
                line.trim_start_matches(|c: char| c == '#' || c == '*' || c == '-' || c.is_whitespace())
                    .to_uppercase()
                    .starts_with(*section)
            })
        })
        .count()
}

/// Rank candidates by [`fallback_score`], ties by declared order. Never fails.
pub fn fallback_ranking(candidates: &[Candidate]) -> Vec<Persona> {
    let mut scored: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (idx, fallback_score(c)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
        .into_iter()
        .map(|(idx, _)| candidates[idx].persona)
        .collect()
}
