//! Input classifier: one freeform utterance in, a structured decomposition
//! out. The caller awaits the single response before creating any entities,
//! so this path has no concurrent-merge concern.

use crate::ai::AiCapability;
use crate::types::ClassifiedInput;
use std::sync::Arc;
use tracing::debug;

/// Wraps the AI capability with the fallback policy: on unavailability or
/// any failure, the entire input becomes a single task with no journal
/// content and no mood. User input is never silently discarded.
pub struct Classifier {
    ai: Arc<dyn AiCapability>,
}

impl Classifier {
    pub fn new(ai: Arc<dyn AiCapability>) -> Self {
        Self { ai }
    }

    /// Classify `text` with the given model, normalizing the result: blank
    /// task strings are dropped and whitespace-only journal content becomes
    /// `None`.
    pub async fn classify(&self, text: &str, model: &str) -> ClassifiedInput {
        if !self.ai.is_available() {
            return ClassifiedInput::fallback(text);
        }
        match self.ai.classify_input(text, model).await {
            Ok(raw) => normalize(raw),
            Err(e) => {
                debug!(error = %e, "classification failed, falling back to single task");
                ClassifiedInput::fallback(text)
            }
        }
    }
}

fn normalize(raw: ClassifiedInput) -> ClassifiedInput {
    ClassifiedInput {
        tasks: raw
            .tasks
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        journal_content: raw
            .journal_content
            .filter(|c| !c.trim().is_empty()),
        mood: raw.mood.filter(|m| !m.trim().is_empty()),
    }
}
