//! Enrichment coordinator.
//!
//! Bridges the synchronous entity store to the delayed AI capabilities.
//! Dispatch is fire-and-forget: each spawned branch carries the target id
//! captured at dispatch time and merges through the store's id-checked
//! operations, so a result that resolves after its target was deleted (or
//! its slot re-saved) is discarded rather than applied to stale state.
//! In-flight requests are never cancelled; merge-by-id is the correctness
//! floor.

use crate::ai::AiCapability;
use crate::classify::Classifier;
use crate::error::AiError;
use crate::store::Store;
use crate::types::{ClassifiedInput, EditMode};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The asynchronous enrichment kinds. No two kinds write the same entity
/// field, so merges never conflict with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentKind {
    Insight,
    TaskExtraction,
    SubtaskBreakdown,
}

/// A dispatched enrichment, tagged with the id captured at dispatch time.
#[derive(Debug, Clone)]
pub struct EnrichmentRequest {
    pub target_id: String,
    pub kind: EnrichmentKind,
}

/// What a freeform intake produced.
#[derive(Debug, Default)]
pub struct IntakeOutcome {
    pub task_ids: Vec<String>,
    pub entry_id: Option<String>,
}

/// Issues AI requests and merges their eventual results into the store.
///
/// Holds only (id, kind) handles for in-flight work; it never mutates an
/// entity directly.
#[derive(Clone)]
pub struct Coordinator {
    store: Store,
    ai: Arc<dyn AiCapability>,
    needs_credential: Arc<AtomicBool>,
}

impl Coordinator {
    pub fn new(store: Store, ai: Arc<dyn AiCapability>) -> Self {
        Self {
            store,
            ai,
            needs_credential: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a credential failure has been observed. Latched until
    /// [`Coordinator::reset_credential_flag`]; the surrounding application
    /// routes the user back to credential selection while this is set.
    pub fn needs_credential(&self) -> bool {
        self.needs_credential.load(Ordering::Relaxed)
    }

    pub fn reset_credential_flag(&self) {
        self.needs_credential.store(false, Ordering::Relaxed);
    }

    /// Dispatch the two post-save enrichments for a journal entry: insight
    /// generation and task extraction. The branches run independently with
    /// no ordering between them; each merges whenever it resolves. Returns
    /// the join handles so callers that want completion (the CLI, tests)
    /// can await them; a UI can drop them.
    pub fn enrich_saved_entry(&self, entry_id: &str, content: &str) -> Vec<JoinHandle<()>> {
        if !self.ai.is_available() {
            info!(entry_id, "AI capability unavailable, skipping enrichment");
            return Vec::new();
        }
        let model = self.store.settings().model;

        let insight = {
            let request = EnrichmentRequest {
                target_id: entry_id.to_string(),
                kind: EnrichmentKind::Insight,
            };
            let this = self.clone();
            let content = content.to_string();
            let model = model.clone();
            tokio::spawn(async move {
                match this.ai.generate_insight(&content, &model).await {
                    Ok(insight) if !insight.trim().is_empty() => {
                        this.apply_insight(&request, insight);
                    }
                    Ok(_) => debug!(entry_id = %request.target_id, "empty insight, nothing to merge"),
                    Err(e) => this.note_failure(&request, e),
                }
            })
        };

        let extraction = {
            let request = EnrichmentRequest {
                target_id: entry_id.to_string(),
                kind: EnrichmentKind::TaskExtraction,
            };
            let this = self.clone();
            let content = content.to_string();
            tokio::spawn(async move {
                match this.ai.extract_tasks(&content, &model).await {
                    Ok(items) if !items.is_empty() => {
                        if let Err(e) = this.store.append_extracted_tasks(items) {
                            error!(error = %e, "persisting extracted tasks failed");
                        }
                    }
                    Ok(_) => debug!(entry_id = %request.target_id, "no tasks extracted"),
                    Err(e) => this.note_failure(&request, e),
                }
            })
        };

        vec![insight, extraction]
    }

    /// Dispatch an AI breakdown for a task. Not dispatched at all when the
    /// capability is unavailable, the task is gone, or it already carries
    /// subtasks; the merge re-checks populate-once, so two racing requests
    /// for the same task cannot double-populate.
    pub fn request_breakdown(&self, task_id: &str) -> Option<JoinHandle<()>> {
        if !self.ai.is_available() {
            info!(task_id, "AI capability unavailable, skipping breakdown");
            return None;
        }
        let task = self.store.get_task(task_id)?;
        if task.subtasks.as_ref().is_some_and(|s| !s.is_empty()) {
            debug!(task_id, "task already has subtasks, not dispatching");
            return None;
        }
        let model = self.store.settings().model;
        let request = EnrichmentRequest {
            target_id: task_id.to_string(),
            kind: EnrichmentKind::SubtaskBreakdown,
        };
        let this = self.clone();
        Some(tokio::spawn(async move {
            match this.ai.breakdown_task(&task.text, &model).await {
                Ok(steps) if !steps.is_empty() => {
                    match this.store.populate_subtasks(&request.target_id, steps) {
                        Ok(true) => {}
                        Ok(false) => {
                            debug!(task_id = %request.target_id, "breakdown result discarded")
                        }
                        Err(e) => error!(error = %e, "persisting subtasks failed"),
                    }
                }
                Ok(_) => debug!(task_id = %request.target_id, "empty breakdown"),
                Err(e) => this.note_failure(&request, e),
            }
        }))
    }

    /// Classify one freeform utterance, with the single-task fallback.
    pub async fn classify(&self, text: &str) -> ClassifiedInput {
        let model = self.store.settings().model;
        Classifier::new(Arc::clone(&self.ai))
            .classify(text, &model)
            .await
    }

    /// Classify freeform input and create the resulting entities: one task
    /// per classified string (default priority), and one journal entry with
    /// the classified mood when there is narrative content. Entities are
    /// created only after the single classification response is known.
    pub async fn ingest_freeform(&self, text: &str) -> Result<IntakeOutcome> {
        let classified = self.classify(text).await;

        let mut outcome = IntakeOutcome::default();
        for task_text in classified.tasks {
            outcome.task_ids.push(self.store.create_task(task_text)?.id);
        }
        if let Some(content) = classified.journal_content {
            outcome.entry_id = Some(self.store.create_entry_with_mood(content, classified.mood)?);
        }
        Ok(outcome)
    }

    /// Generate a cover image for a draft. Awaited by the caller, degrades
    /// to `None`; the image is only persisted when the surrounding save
    /// commits it.
    pub async fn generate_cover(&self, context: &str) -> Option<String> {
        if !self.ai.is_available() {
            return None;
        }
        match self.ai.generate_cover_image(context).await {
            Ok(image) => image,
            Err(e) => {
                self.note_plain_failure(e);
                None
            }
        }
    }

    /// Rewrite journal text in the given mode, degrading to the input.
    pub async fn edit_entry_text(&self, text: &str, mode: EditMode) -> String {
        if !self.ai.is_available() {
            return text.to_string();
        }
        let model = self.store.settings().model;
        match self.ai.edit_text(text, mode, &model).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                self.note_plain_failure(e);
                text.to_string()
            }
        }
    }

    fn apply_insight(&self, request: &EnrichmentRequest, insight: String) {
        match self.store.merge_journal_insight(&request.target_id, insight) {
            Ok(true) => {}
            Ok(false) => debug!(entry_id = %request.target_id, "insight result discarded"),
            Err(e) => error!(error = %e, "persisting insight failed"),
        }
    }

    /// Failure policy: credential failures latch the surfaced flag; every
    /// other failure degrades silently and the target keeps its prior state.
    fn note_failure(&self, request: &EnrichmentRequest, err: AiError) {
        if err.is_credential() {
            self.needs_credential.store(true, Ordering::Relaxed);
            warn!(target_id = %request.target_id, kind = ?request.kind, error = %err,
                "credential rejected, enrichment blocked until a key is selected");
        } else {
            debug!(target_id = %request.target_id, kind = ?request.kind, error = %err,
                "enrichment failed, leaving target unchanged");
        }
    }

    fn note_plain_failure(&self, err: AiError) {
        if err.is_credential() {
            self.needs_credential.store(true, Ordering::Relaxed);
            warn!(error = %err, "credential rejected");
        } else {
            debug!(error = %err, "AI call failed, degrading to neutral result");
        }
    }
}
