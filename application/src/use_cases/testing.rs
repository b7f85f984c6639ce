//! Scripted oracle for use case tests.

use crate::ports::reasoning_oracle::{OracleError, ReasoningOracle};
use async_trait::async_trait;
use mrce_domain::{Capability, OracleRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type Handler = Box<dyn Fn(&OracleRequest) -> Result<String, OracleError> + Send + Sync>;

/// Answers each capability with a scripted handler and records every call.
///
/// Capabilities without a handler fail with `RequestFailed`.
pub(crate) struct ScriptedOracle {
    handlers: HashMap<Capability, Handler>,
    calls: Mutex<Vec<OracleRequest>>,
    delay: Option<Duration>,
}

impl ScriptedOracle {
    pub(crate) fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub(crate) fn on<F>(mut self, capability: Capability, handler: F) -> Self
    where
        F: Fn(&OracleRequest) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        self.handlers.insert(capability, Box::new(handler));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn count(&self, capability: Capability) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.capability == capability)
            .count()
    }

    pub(crate) fn calls(&self, capability: Capability) -> Vec<OracleRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.capability == capability)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReasoningOracle for ScriptedOracle {
    async fn invoke(&self, request: &OracleRequest) -> Result<String, OracleError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.handlers.get(&request.capability) {
            Some(handler) => handler(request),
            None => Err(OracleError::RequestFailed(format!(
                "no script for {}",
                request.capability
            ))),
        }
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }
}
