//! AI capability boundary.
//!
//! The enrichment coordinator treats each AI operation as an opaque async
//! call that may fail. The trait is the seam: [`gemini::GeminiCapability`]
//! talks to the real backend, [`Disabled`] stands in when no credential is
//! present, and tests script their own implementations.

pub mod gemini;

use crate::error::AiResult;
use crate::types::{ClassifiedInput, EditMode, ExtractedTask};
use async_trait::async_trait;

/// The six AI operations the enrichment pipeline consumes.
///
/// Every operation takes the selected model identifier; implementations
/// return typed errors and leave degradation policy to the caller.
#[async_trait]
pub trait AiCapability: Send + Sync {
    /// Split one freeform utterance into tasks, journal narrative, and mood.
    async fn classify_input(&self, text: &str, model: &str) -> AiResult<ClassifiedInput>;

    /// Extract actionable tasks (with priorities) from journal content.
    async fn extract_tasks(&self, journal_text: &str, model: &str)
        -> AiResult<Vec<ExtractedTask>>;

    /// Break a task down into ordered steps.
    async fn breakdown_task(&self, task_text: &str, model: &str) -> AiResult<Vec<String>>;

    /// One reflective sentence for a journal entry.
    async fn generate_insight(&self, entry_text: &str, model: &str) -> AiResult<String>;

    /// Rewrite journal text in the given mode.
    async fn edit_text(&self, text: &str, mode: EditMode, model: &str) -> AiResult<String>;

    /// Generate a cover image for the given context. `None` when the model
    /// produced no image.
    async fn generate_cover_image(&self, prompt: &str) -> AiResult<Option<String>>;

    /// Whether a credential is present. When false, the coordinator skips
    /// enrichment dispatch entirely rather than merely degrading.
    fn is_available(&self) -> bool;
}

/// Capability used when no credential is configured. Never dispatched by the
/// coordinator (`is_available` is false); any direct call reports transient
/// failure so callers exercise their fallbacks.
pub struct Disabled;

#[async_trait]
impl AiCapability for Disabled {
    async fn classify_input(&self, _text: &str, _model: &str) -> AiResult<ClassifiedInput> {
        Err(crate::error::AiError::Transient("AI disabled".into()))
    }

    async fn extract_tasks(
        &self,
        _journal_text: &str,
        _model: &str,
    ) -> AiResult<Vec<ExtractedTask>> {
        Err(crate::error::AiError::Transient("AI disabled".into()))
    }

    async fn breakdown_task(&self, _task_text: &str, _model: &str) -> AiResult<Vec<String>> {
        Err(crate::error::AiError::Transient("AI disabled".into()))
    }

    async fn generate_insight(&self, _entry_text: &str, _model: &str) -> AiResult<String> {
        Err(crate::error::AiError::Transient("AI disabled".into()))
    }

    async fn edit_text(&self, _text: &str, _mode: EditMode, _model: &str) -> AiResult<String> {
        Err(crate::error::AiError::Transient("AI disabled".into()))
    }

    async fn generate_cover_image(&self, _prompt: &str) -> AiResult<Option<String>> {
        Err(crate::error::AiError::Transient("AI disabled".into()))
    }

    fn is_available(&self) -> bool {
        false
    }
}
