//! Intent Classifier Port - Interface to the reasoning oracle.
//!
//! The router consumes this port to classify the latest user turn. The
//! contract is deliberately forgiving: `classify` may fail (network, quota,
//! malformed output the adapter could not repair), and the router maps any
//! failure to the default `Unclear` result — a classification failure is
//! never fatal, since `Unclear` always has a defined clarification path.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::routing::{Intent, IntentResult};

/// Fixed clarification fallback, used when the oracle cannot produce one.
pub const DEFAULT_CLARIFICATION: &str = "I'm sorry, I didn't quite catch what you need. \
Are you looking to record a blood pressure reading, manage a follow-up appointment, \
or ask about symptoms?";

/// Errors surfaced by classifier adapters.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// The oracle endpoint could not be reached or answered non-2xx.
    #[error("classifier request failed: {0}")]
    Request(String),

    /// The oracle answered but the payload was unusable.
    #[error("classifier response malformed: {0}")]
    MalformedResponse(String),

    /// The request exceeded the configured deadline.
    #[error("classifier timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Port for intent classification and clarification prompts.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classifies the latest user turn.
    ///
    /// # Arguments
    /// * `query` - content of the latest user turn
    /// * `history_window` - bounded formatted history for context
    /// * `current_intent` - the intent active before this turn
    async fn classify(
        &self,
        query: &str,
        history_window: Option<&str>,
        current_intent: Option<Intent>,
    ) -> Result<IntentResult, ClassificationError>;

    /// Produces a clarification question for an unclear turn.
    ///
    /// Must not fail: adapters degrade to [`DEFAULT_CLARIFICATION`]
    /// internally.
    async fn clarify(&self, query: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_error_display() {
        let err = ClassificationError::Request("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = ClassificationError::Timeout { timeout_secs: 60 };
        assert_eq!(err.to_string(), "classifier timed out after 60s");
    }
}
