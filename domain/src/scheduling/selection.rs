//! Diversity selection (maximal marginal relevance) and vibe ordering.
//!
//! Selection runs in two passes. The first greedily picks up to `top_k`
//! eligible experts, each pick maximizing
//! `confidence - lambda * max_similarity_to_selected`. The second reorders
//! the picks with a per-vibe priority table.

use crate::deliberation::vibe::VibeLabel;
use crate::expert::{Expert, ExpertDescriptor, GateResult, Persona};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Knobs for one selection pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    pub top_k: usize,
    /// Hard floor; experts below it never qualify
    pub min_confidence: f64,
    /// Diversity penalty weight
    pub lambda: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_confidence: 0.35,
            lambda: 0.3,
        }
    }
}

/// An expert paired with this round's gate result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatedExpert {
    pub expert: ExpertDescriptor,
    pub gate: GateResult,
}

impl GatedExpert {
    pub fn new(expert: ExpertDescriptor, gate: GateResult) -> Self {
        Self { expert, gate }
    }

    pub fn persona(&self) -> Persona {
        self.expert.persona()
    }

    pub fn confidence(&self) -> f64 {
        self.gate.confidence
    }

    /// Static capability tags plus this round's coverage tags.
    pub fn tags(&self) -> BTreeSet<String> {
        self.expert
            .tags()
            .iter()
            .cloned()
            .chain(self.gate.coverage_tags.iter().cloned())
            .collect()
    }
}

/// Jaccard overlap of two tag sets. Two empty sets are treated as disjoint.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Pick up to `top_k` confident, diverse experts.
///
/// `gated` must be in registry order; ties go to the earlier entry. The
/// result is in pick order and may be shorter than `top_k` (no padding).
pub fn select_diverse(gated: &[GatedExpert], params: &SelectionParams) -> Vec<GatedExpert> {
    let mut remaining: Vec<(&GatedExpert, BTreeSet<String>)> = gated
        .iter()
        .filter(|g| g.gate.is_eligible(params.min_confidence))
        .map(|g| (g, g.tags()))
        .collect();
    let mut selected: Vec<(&GatedExpert, BTreeSet<String>)> = Vec::new();

    while selected.len() < params.top_k && !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (candidate, tags)) in remaining.iter().enumerate() {
            let redundancy = selected
                .iter()
                .map(|(_, chosen)| jaccard(tags, chosen))
                .fold(0.0_f64, f64::max);
            let score = candidate.confidence() - params.lambda * redundancy;
            // Strict comparison keeps the earliest expert on ties.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((idx, score));
            }
        }
        let Some((idx, _)) = best else { break };
        selected.push(remaining.remove(idx));
    }

    selected.into_iter().map(|(g, _)| g.clone()).collect()
}

/// Preferred leading personas for each vibe.
fn priority_table(vibe: VibeLabel) -> &'static [Persona] {
    match vibe {
        VibeLabel::Analytic => &[
            Persona::Analyst,
            Persona::Statistician,
            Persona::Critic,
            Persona::Synthesizer,
        ],
        VibeLabel::Creative => &[
            Persona::Synthesizer,
            Persona::Theorist,
            Persona::Analyst,
            Persona::Critic,
        ],
        VibeLabel::Critical => &[
            Persona::Critic,
            Persona::CounterexampleHunter,
            Persona::Analyst,
            Persona::Synthesizer,
        ],
        VibeLabel::Plan => &[
            Persona::SystemsEngineer,
            Persona::Analyst,
            Persona::Critic,
            Persona::Synthesizer,
        ],
    }
}

/// Reorder selected experts by the vibe's priority table.
///
/// Personas in the table come first, in table order; the rest keep their
/// selection order behind them.
pub fn order_for_vibe(mut selected: Vec<GatedExpert>, vibe: VibeLabel) -> Vec<GatedExpert> {
    let table = priority_table(vibe);
    selected.sort_by_key(|g| {
        table
            .iter()
            .position(|p| *p == g.persona())
            .unwrap_or(usize::MAX)
    });
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated(persona: Persona, confidence: f64) -> GatedExpert {
        GatedExpert::new(
            ExpertDescriptor::new(persona),
            GateResult::new(persona, true, confidence),
        )
    }

    fn personas(experts: &[GatedExpert]) -> Vec<Persona> {
        experts.iter().map(GatedExpert::persona).collect()
    }

    #[test]
    fn test_floor_excludes_low_confidence() {
        // Three eligible experts, only one clears the floor.
        let pool = vec![
            gated(Persona::Analyst, 0.9),
            gated(Persona::Synthesizer, 0.4),
            gated(Persona::Critic, 0.2),
        ];
        let params = SelectionParams {
            top_k: 2,
            min_confidence: 0.5,
            lambda: 0.3,
        };

        let picked = select_diverse(&pool, &params);
        assert_eq!(personas(&picked), vec![Persona::Analyst]);
    }

    #[test]
    fn test_declined_experts_never_selected() {
        let mut declined = gated(Persona::Critic, 0.99);
        declined.gate.respond = false;
        let pool = vec![declined, gated(Persona::Analyst, 0.6)];

        let picked = select_diverse(&pool, &SelectionParams::default());
        assert_eq!(personas(&picked), vec![Persona::Analyst]);
    }

    #[test]
    fn test_size_bounded_by_top_k() {
        let pool: Vec<_> = Persona::ALL.iter().map(|p| gated(*p, 0.8)).collect();
        let params = SelectionParams {
            top_k: 3,
            ..SelectionParams::default()
        };
        assert_eq!(select_diverse(&pool, &params).len(), 3);
    }

    #[test]
    fn test_diversity_penalty_skips_redundant_expert() {
        let a = GatedExpert::new(
            ExpertDescriptor::new(Persona::Analyst).with_tags(["logic", "math"]),
            GateResult::new(Persona::Analyst, true, 0.9),
        );
        let b = GatedExpert::new(
            ExpertDescriptor::new(Persona::Theorist).with_tags(["logic", "math"]),
            GateResult::new(Persona::Theorist, true, 0.85),
        );
        let c = GatedExpert::new(
            ExpertDescriptor::new(Persona::Empiricist).with_tags(["data"]),
            GateResult::new(Persona::Empiricist, true, 0.7),
        );
        let params = SelectionParams {
            top_k: 2,
            min_confidence: 0.1,
            lambda: 0.5,
        };

        // b scores 0.85 - 0.5 * 1.0 = 0.35, c scores 0.7.
        let picked = select_diverse(&[a, b, c], &params);
        assert_eq!(personas(&picked), vec![Persona::Analyst, Persona::Empiricist]);
    }

    #[test]
    fn test_zero_lambda_is_pure_confidence() {
        let pool = vec![
            gated(Persona::Analyst, 0.5),
            gated(Persona::Critic, 0.9),
            gated(Persona::Theorist, 0.7),
        ];
        let params = SelectionParams {
            top_k: 3,
            min_confidence: 0.0,
            lambda: 0.0,
        };
        let picked = select_diverse(&pool, &params);
        assert_eq!(
            personas(&picked),
            vec![Persona::Critic, Persona::Theorist, Persona::Analyst]
        );
    }

    #[test]
    fn test_ties_go_to_declaration_order() {
        let pool = vec![
            GatedExpert::new(
                ExpertDescriptor::new(Persona::Empiricist).with_tags(["x"]),
                GateResult::new(Persona::Empiricist, true, 0.6),
            ),
            GatedExpert::new(
                ExpertDescriptor::new(Persona::Statistician).with_tags(["y"]),
                GateResult::new(Persona::Statistician, true, 0.6),
            ),
        ];
        let params = SelectionParams {
            top_k: 1,
            ..SelectionParams::default()
        };
        for _ in 0..5 {
            assert_eq!(
                personas(&select_diverse(&pool, &params)),
                vec![Persona::Empiricist]
            );
        }
    }

    #[test]
    fn test_coverage_tags_join_similarity() {
        let expert = GatedExpert::new(
            ExpertDescriptor::new(Persona::Analyst).with_tags(["logic"]),
            GateResult::new(Persona::Analyst, true, 0.9).with_coverage_tags(["physics"]),
        );
        assert_eq!(expert.tags().len(), 2);
    }

    #[test]
    fn test_jaccard() {
        let a: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_order_for_vibe() {
        let picked = vec![
            gated(Persona::Empiricist, 0.9),
            gated(Persona::Synthesizer, 0.8),
            gated(Persona::Critic, 0.7),
        ];

        let critical = order_for_vibe(picked.clone(), VibeLabel::Critical);
        assert_eq!(
            personas(&critical),
            vec![Persona::Critic, Persona::Synthesizer, Persona::Empiricist]
        );

        let creative = order_for_vibe(picked, VibeLabel::Creative);
        assert_eq!(
            personas(&creative),
            vec![Persona::Synthesizer, Persona::Critic, Persona::Empiricist]
        );
    }

    #[test]
    fn test_unlisted_personas_keep_selection_order() {
        let picked = vec![
            gated(Persona::Theorist, 0.9),
            gated(Persona::Empiricist, 0.8),
            gated(Persona::Analyst, 0.7),
        ];
        let ordered = order_for_vibe(picked, VibeLabel::Analytic);
        assert_eq!(
            personas(&ordered),
            vec![Persona::Analyst, Persona::Theorist, Persona::Empiricist]
        );
    }
}
