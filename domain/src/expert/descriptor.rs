//! Expert descriptors: a persona plus the state it carries into a round.

use crate::expert::capability::Expert;
use crate::expert::persona::Persona;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identity, capability tags and current hint for one expert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertDescriptor {
    persona: Persona,
    tags: BTreeSet<String>,
    hint: String,
}

impl ExpertDescriptor {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            tags: persona
                .capability_tags()
                .iter()
                .map(|t| t.to_string())
                .collect(),
            hint: String::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Replace the capability tags (mostly for tests and custom panels).
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The full panel in registry order, each carrying its stored hint.
    pub fn registry(hints: &BTreeMap<String, String>) -> Vec<Self> {
        Persona::ALL
            .iter()
            .map(|persona| {
                let hint = hints.get(persona.as_str()).cloned().unwrap_or_default();
                Self::new(*persona).with_hint(hint)
            })
            .collect()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

impl Expert for ExpertDescriptor {
    fn persona(&self) -> Persona {
        self.persona
    }

    fn hint(&self) -> &str {
        &self.hint
    }
}
