//! Core types for the zournel store and enrichment pipeline.

use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse a priority string. Unrecognized values fall back to `Medium`,
    /// so a sloppy AI response never poisons a task.
    pub fn parse_lenient(s: &str) -> Priority {
        match s.to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// The next priority in the user-facing cycle: high -> medium -> low -> high.
    pub fn cycled(&self) -> Priority {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }
}

/// One step of an AI task breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// A task in the list.
///
/// `subtasks` is populated at most once, by an AI breakdown; `ai_analysis`
/// is a provenance tag set when the task was extracted from journal content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<SubTask>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

/// A journal entry.
///
/// `mood` is fixed at creation by the input classifier and never re-derived;
/// `ai_insight` arrives asynchronously after a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
}

/// UI theme. Stored, not interpreted, by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dawn,
    Paper,
    Midnight,
    Obsidian,
    Terminal,
}

/// Animation played when a task is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionAnimation {
    None,
    #[default]
    Confetti,
    Bounce,
    SlideRight,
}

/// Animation played when a task is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteAnimation {
    None,
    #[default]
    Shrink,
    SlideLeft,
}

/// Default model identifier used for text generation calls.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Flat application settings. Independent fields, no cross-field invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub theme: Theme,
    pub completion_animation: CompletionAnimation,
    pub delete_animation: DeleteAnimation,
    /// Selected model identifier for AI calls.
    pub model: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            completion_animation: CompletionAnimation::default(),
            delete_animation: DeleteAnimation::default(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Structured decomposition of one freeform utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedInput {
    pub tasks: Vec<String>,
    pub journal_content: Option<String>,
    pub mood: Option<String>,
}

impl ClassifiedInput {
    /// Fallback decomposition: the whole input becomes a single task, so
    /// user input is never discarded when the AI capability is unavailable.
    pub fn fallback(input: &str) -> Self {
        Self {
            tasks: vec![input.to_string()],
            journal_content: None,
            mood: None,
        }
    }
}

/// A task extracted from journal content, with the priority the model assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub text: String,
    pub priority: Priority,
}

/// Rewrite mode for journal text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Improve,
    Rephrase,
    Summarize,
}

impl EditMode {
    /// Prompt prefix for the rewrite call.
    pub fn prompt(&self) -> &'static str {
        match self {
            EditMode::Improve => "Improve grammar/flow:",
            EditMode::Rephrase => "Rephrase creatively:",
            EditMode::Summarize => "Summarize concisely:",
        }
    }
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh entity id. UUIDv7 so ids sort by creation time.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_cycle_returns_to_start() {
        let p = Priority::Medium;
        assert_eq!(p.cycled(), Priority::Low);
        assert_eq!(p.cycled().cycled(), Priority::High);
        assert_eq!(p.cycled().cycled().cycled(), Priority::Medium);
    }

    #[test]
    fn priority_parse_falls_back_to_medium() {
        assert_eq!(Priority::parse_lenient("HIGH"), Priority::High);
        assert_eq!(Priority::parse_lenient("low"), Priority::Low);
        assert_eq!(Priority::parse_lenient("urgent-ish"), Priority::Medium);
    }

    #[test]
    fn classified_fallback_keeps_input_as_single_task() {
        let c = ClassifiedInput::fallback("buy milk");
        assert_eq!(c.tasks, vec!["buy milk".to_string()]);
        assert!(c.journal_content.is_none());
        assert!(c.mood.is_none());
    }
}
