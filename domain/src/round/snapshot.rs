//! Hint snapshots: the persisted form of cross-round guidance.
//!
//! A snapshot holds `router_guidance` and `expert_hints` only. Keys are
//! normalized on load (`synth` becomes `synthesizer`), so a snapshot with
//! canonical keys survives load/save unchanged.

use crate::expert::Persona;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HintSnapshot {
    #[serde(default)]
    pub router_guidance: String,
    #[serde(default)]
    pub expert_hints: BTreeMap<String, String>,
}

impl HintSnapshot {
    /// Parse a stored snapshot and normalize its persona keys.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let snapshot: HintSnapshot = serde_json::from_str(raw)?;
        Ok(snapshot.normalized())
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Canonicalize persona keys. Hints stored under two spellings of the
    /// same persona are merged.
    pub fn normalized(self) -> Self {
        let mut expert_hints: BTreeMap<String, String> = BTreeMap::new();
        for (key, hint) in self.expert_hints {
            let key = Persona::normalize_key(&key);
            let merged = match expert_hints.remove(&key) {
                Some(existing) => merge_hint(&existing, &hint),
                None => hint,
            };
            expert_hints.insert(key, merged);
        }
        Self {
            router_guidance: self.router_guidance,
            expert_hints,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.router_guidance.is_empty() && self.expert_hints.values().all(String::is_empty)
    }
}

/// Append `new` to `old` on a new line. Blank updates keep `old`.
pub fn merge_hint(old: &str, new: &str) -> String {
    if new.trim().is_empty() {
        return old.to_string();
    }
    format!("{}\n{}", old, new).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut snapshot = HintSnapshot {
            router_guidance: "prefer critical on safety questions".to_string(),
            expert_hints: BTreeMap::new(),
        };
        snapshot
            .expert_hints
            .insert("critic".into(), "name a kill-shot".into());
        snapshot.expert_hints.insert("analyst".into(), String::new());

        let saved = snapshot.to_json_pretty().unwrap();
        let reloaded = HintSnapshot::from_json(&saved).unwrap();
        assert_eq!(reloaded, snapshot);
        assert_eq!(reloaded.to_json_pretty().unwrap(), saved);
    }

    #[test]
    fn test_aliases_normalized_on_load() {
        let snapshot =
            HintSnapshot::from_json(r#"{"expert_hints": {"synth": "vary options", "Critic": "x"}}"#)
                .unwrap();
        assert_eq!(snapshot.expert_hints["synthesizer"], "vary options");
        assert_eq!(snapshot.expert_hints["critic"], "x");
        assert_eq!(snapshot.router_guidance, "");
    }

    #[test]
    fn test_alias_collision_merges() {
        let snapshot = HintSnapshot::from_json(
            r#"{"expert_hints": {"synth": "a", "synthesizer": "b"}}"#,
        )
        .unwrap();
        // BTreeMap iterates "synth" before "synthesizer".
        assert_eq!(snapshot.expert_hints["synthesizer"], "a\nb");
    }

    #[test]
    fn test_merge_hint() {
        assert_eq!(merge_hint("", "be concrete"), "be concrete");
        assert_eq!(merge_hint("a", "b"), "a\nb");
        assert_eq!(merge_hint("a", "   "), "a");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(HintSnapshot::from_json("not json").is_err());
    }
}
