//! Structured oracle requests

use crate::expert::persona::Persona;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// What the oracle is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Classify the query into a vibe label
    Route,
    /// Cheap per-expert eligibility check
    Gate,
    /// Full expert answer
    Respond,
    /// Multi-candidate comparison
    Judge,
    /// Round scoring and coaching hints
    Critique,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Route => "route",
            Capability::Gate => "gate",
            Capability::Respond => "respond",
            Capability::Judge => "judge",
            Capability::Critique => "critique",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to the reasoning oracle.
///
/// Fields are an open JSON object: adapters serialize them as-is, so a
/// component can send redundant aliases when the receiving schema is not
/// stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub capability: Capability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    pub fields: Map<String, Value>,
}

impl OracleRequest {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            persona: None,
            fields: Map::new(),
        }
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = Some(persona);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Insert the same value under several keys.
    pub fn with_aliased_field(mut self, keys: &[&str], value: impl Into<Value>) -> Self {
        let value = value.into();
        for key in keys {
            self.fields.insert((*key).to_string(), value.clone());
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The request body as a single JSON value.
    pub fn payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let req = OracleRequest::new(Capability::Gate)
            .with_persona(Persona::Critic)
            .with_field("query", "Is X valid?");

        assert_eq!(req.capability, Capability::Gate);
        assert_eq!(req.persona, Some(Persona::Critic));
        assert_eq!(req.field("query").unwrap(), "Is X valid?");
    }

    #[test]
    fn test_aliased_field() {
        let req = OracleRequest::new(Capability::Judge)
            .with_aliased_field(&["question", "query"], "Is X valid?");
        assert_eq!(req.field("question"), req.field("query"));
    }

    #[test]
    fn test_payload_shape() {
        let req = OracleRequest::new(Capability::Route).with_field("guidance", "");
        let payload = req.payload();
        assert_eq!(payload["capability"], "route");
        assert!(payload.get("persona").is_none());
        assert_eq!(payload["fields"]["guidance"], "");
    }
}
