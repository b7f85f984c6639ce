//! Router: classify a query into a vibe.
//!
//! Routing never fails the round. An oracle error or an unreadable reply
//! yields the default vibe and marks routing as degraded.

use crate::use_cases::shared::OracleClient;
use crate::ports::reasoning_oracle::ReasoningOracle;
use mrce_domain::{Capability, OracleReply, OracleRequest, Query, VibeLabel};
use tracing::{debug, warn};

const VIBE_FIELDS: &[&str] = &["vibe", "label", "route", "classification", "category"];

/// Router output for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOutcome {
    pub vibe: VibeLabel,
    /// The default vibe was used because routing failed
    pub degraded: bool,
}

pub struct RouterUseCase<O: ReasoningOracle + 'static> {
    client: OracleClient<O>,
}

impl<O: ReasoningOracle + 'static> RouterUseCase<O> {
    pub fn new(client: OracleClient<O>) -> Self {
        Self { client }
    }

    /// Classify `query`, steered by the accumulated router guidance.
    pub async fn classify(&self, query: &Query, guidance: &str) -> RouteOutcome {
        let request = route_request(query, guidance);

        let vibe = match self.client.ask(&request).await {
            Ok(raw) => read_vibe(&raw),
            Err(e) => {
                warn!("Degraded routing: oracle error: {}", e);
                None
            }
        };

        match vibe {
            Some(vibe) => {
                debug!("Routed to {}", vibe);
                RouteOutcome {
                    vibe,
                    degraded: false,
                }
            }
            None => {
                warn!("Degraded routing: falling back to {}", VibeLabel::default());
                RouteOutcome {
                    vibe: VibeLabel::default(),
                    degraded: true,
                }
            }
        }
    }
}

fn route_request(query: &Query, guidance: &str) -> OracleRequest {
    OracleRequest::new(Capability::Route)
        .with_field("query", query.content())
        .with_field("goal", query.goal())
        .with_field("mode", query.mode().as_str())
        .with_field("guidance", guidance)
        .with_field(
            "labels",
            VibeLabel::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
        )
}

/// Read a vibe from a structured field, else from the raw text.
fn read_vibe(raw: &str) -> Option<VibeLabel> {
    if let OracleReply::Parsed(fields) = OracleReply::parse(raw)
        && let Some(vibe) = fields.text(VIBE_FIELDS).and_then(|t| VibeLabel::find_in(&t))
    {
        return Some(vibe);
    }
    VibeLabel::find_in(raw)
}
