//! Shared plumbing for the round stages.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::reasoning_oracle::{OracleError, ReasoningOracle};
use mrce_domain::{OracleReply, OracleRequest};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// True when a cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}

/// Oracle handle shared by every stage of a session.
///
/// Applies the per-call timeout and records each exchange in the transcript.
pub struct OracleClient<O: ReasoningOracle + 'static> {
    oracle: Arc<O>,
    timeout: Option<Duration>,
    logger: Arc<dyn ConversationLogger>,
}

impl<O: ReasoningOracle + 'static> Clone for OracleClient<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
            timeout: self.timeout,
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<O: ReasoningOracle + 'static> OracleClient<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self {
            oracle,
            timeout: None,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Invoke the oracle and return the raw reply text.
    ///
    /// A timed-out call is reported as [`OracleError::Timeout`]; blank
    /// replies as [`OracleError::EmptyReply`].
    pub async fn ask(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let started = Instant::now();
        let call = self.oracle.invoke(request);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(OracleError::Timeout),
            },
            None => call.await,
        };
        let result = result.and_then(|text| {
            if text.trim().is_empty() {
                Err(OracleError::EmptyReply)
            } else {
                Ok(text)
            }
        });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(text) => {
                debug!(
                    "{} {} replied in {}ms ({} chars)",
                    self.oracle.name(),
                    request.capability,
                    elapsed_ms,
                    text.len()
                );
            }
            Err(e) => {
                warn!(
                    "{} {} call failed after {}ms: {}",
                    self.oracle.name(),
                    request.capability,
                    elapsed_ms,
                    e
                );
            }
        }

        self.logger.log(ConversationEvent::new(
            "oracle_exchange",
            json!({
                "oracle": self.oracle.name(),
                "capability": request.capability.as_str(),
                "persona": request.persona.map(|p| p.as_str()),
                "request": request.payload(),
                "reply": result.as_ref().ok(),
                "error": result.as_ref().err().map(|e| e.to_string()),
                "elapsed_ms": elapsed_ms,
            }),
        ));

        result
    }

    /// Invoke the oracle and tag the reply.
    pub async fn ask_parsed(&self, request: &OracleRequest) -> Result<OracleReply, OracleError> {
        let raw = self.ask(request).await?;
        Ok(OracleReply::parse(&raw))
    }

    pub fn logger(&self) -> &Arc<dyn ConversationLogger> {
        &self.logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::ScriptedOracle;
    use mrce_domain::Capability;
    use std::sync::Mutex;

    struct RecordingLogger(Mutex<Vec<String>>);

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.0.lock().unwrap().push(event.event_type.to_string());
        }
    }

    #[tokio::test]
    async fn test_ask_logs_exchange() {
        let oracle = Arc::new(ScriptedOracle::new().on(Capability::Route, |_| Ok("critical".into())));
        let logger = Arc::new(RecordingLogger(Mutex::new(Vec::new())));
        let client = OracleClient::new(oracle).with_logger(logger.clone());

        let reply = client.ask(&OracleRequest::new(Capability::Route)).await.unwrap();
        assert_eq!(reply, "critical");
        assert_eq!(*logger.0.lock().unwrap(), vec!["oracle_exchange"]);
    }

    #[tokio::test]
    async fn test_blank_reply_is_error() {
        let oracle = Arc::new(ScriptedOracle::new().on(Capability::Gate, |_| Ok("  \n".into())));
        let client = OracleClient::new(oracle);
        assert_eq!(
            client.ask(&OracleRequest::new(Capability::Gate)).await,
            Err(OracleError::EmptyReply)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .on(Capability::Judge, |_| Ok("late".into()))
                .with_delay(Duration::from_secs(30)),
        );
        let client = OracleClient::new(oracle).with_timeout(Some(Duration::from_secs(1)));
        assert_eq!(
            client.ask(&OracleRequest::new(Capability::Judge)).await,
            Err(OracleError::Timeout)
        );
    }

    #[test]
    fn test_is_cancelled() {
        assert!(!is_cancelled(&None));
        let token = CancellationToken::new();
        let held = Some(token.clone());
        assert!(!is_cancelled(&held));
        token.cancel();
        assert!(is_cancelled(&held));
    }
}
