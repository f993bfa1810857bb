//! Mock intent classifier for testing.
//!
//! Configurable to return scripted results, inject errors, and track
//! calls, allowing router and service tests to run without a live oracle.
//!
//! # Example
//!
//! ```ignore
//! let classifier = MockIntentClassifier::new()
//!     .with_result(IntentResult::new(Intent::Appointment, 0.9, "booking"))
//!     .with_error("oracle down");
//!
//! let result = classifier.classify("book me in", None, None).await?;
//! assert_eq!(classifier.call_count(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::routing::{Intent, IntentResult};
use crate::ports::{ClassificationError, IntentClassifier, DEFAULT_CLARIFICATION};

/// One scripted classification outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    Success(IntentResult),
    Error(String),
}

/// A recorded classify call, for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub query: String,
    pub history_window: Option<String>,
    pub current_intent: Option<Intent>,
}

/// Mock classifier returning scripted outcomes in order.
///
/// When the script is exhausted, further calls return the default
/// `Unclear` result.
#[derive(Clone, Default)]
pub struct MockIntentClassifier {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    clarification: Option<String>,
}

impl MockIntentClassifier {
    /// Creates an empty mock; every call yields `Unclear`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful classification.
    pub fn with_result(self, result: IntentResult) -> Self {
        self.outcomes
            .lock()
            .expect("mock outcomes lock poisoned")
            .push_back(MockOutcome::Success(result));
        self
    }

    /// Queues a classification failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .expect("mock outcomes lock poisoned")
            .push_back(MockOutcome::Error(message.into()));
        self
    }

    /// Fixes the clarification reply.
    pub fn with_clarification(mut self, text: impl Into<String>) -> Self {
        self.clarification = Some(text.into());
        self
    }

    /// Number of classify calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock calls lock poisoned").len()
    }

    /// All recorded classify calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("mock calls lock poisoned")
            .clone()
    }
}

#[async_trait]
impl IntentClassifier for MockIntentClassifier {
    async fn classify(
        &self,
        query: &str,
        history_window: Option<&str>,
        current_intent: Option<Intent>,
    ) -> Result<IntentResult, ClassificationError> {
        self.calls
            .lock()
            .expect("mock calls lock poisoned")
            .push(RecordedCall {
                query: query.to_string(),
                history_window: history_window.map(|s| s.to_string()),
                current_intent,
            });

        let outcome = self
            .outcomes
            .lock()
            .expect("mock outcomes lock poisoned")
            .pop_front();

        match outcome {
            Some(MockOutcome::Success(result)) => Ok(result),
            Some(MockOutcome::Error(message)) => Err(ClassificationError::Request(message)),
            None => Ok(IntentResult::unclear("mock classifier exhausted")),
        }
    }

    async fn clarify(&self, _query: &str) -> String {
        self.clarification
            .clone()
            .unwrap_or_else(|| DEFAULT_CLARIFICATION.to_string())
    }
}
