//! Gemini REST capability.
//!
//! Thin client over the `generateContent` endpoint. Structured calls ask for
//! a JSON response body and parse it strictly; anything that does not parse
//! is a malformed-response error for the coordinator to degrade. Credential
//! rejections are the one failure class surfaced upward.

use super::AiCapability;
use crate::error::{AiError, AiResult};
use crate::types::{ClassifiedInput, EditMode, ExtractedTask, Priority};
use async_trait::async_trait;
use serde_json::{json, Value};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used for cover image generation, independent of the selected
/// text model.
const IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini-backed implementation of [`AiCapability`].
pub struct GeminiCapability {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiCapability {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Build a capability from `GEMINI_API_KEY`, if set and non-empty.
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(key)),
            _ => None,
        }
    }

    /// One `generateContent` round trip, returning the first text part.
    async fn generate(&self, model: &str, prompt: &str, json_response: bool) -> AiResult<String> {
        let value = self.generate_raw(model, prompt, json_response).await?;
        first_text_part(&value)
            .map(str::to_string)
            .ok_or_else(|| AiError::Malformed("no text part in response".into()))
    }

    async fn generate_raw(
        &self,
        model: &str,
        prompt: &str,
        json_response: bool,
    ) -> AiResult<Value> {
        let url = format!("{API_BASE}/{model}:generateContent?key={}", self.api_key);
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if json_response {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transient(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AiError::Credential(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // The API reports a bad key as a 400 with this reason.
            if text.contains("API_KEY_INVALID") {
                return Err(AiError::Credential(format!("HTTP {status}: {text}")));
            }
            return Err(AiError::Transient(format!("HTTP {status}: {text}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AiError::Malformed(e.to_string()))
    }
}

/// Extract the first text part from a `generateContent` response.
fn first_text_part(value: &Value) -> Option<&str> {
    value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text").and_then(Value::as_str))
}

/// Extract the first inline image from a `generateContent` response as a
/// data URI.
fn first_inline_image(value: &Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    for part in parts {
        if let Some(inline) = part.get("inlineData") {
            let mime = inline.get("mimeType")?.as_str()?;
            let data = inline.get("data")?.as_str()?;
            return Some(format!("data:{mime};base64,{data}"));
        }
    }
    None
}

#[async_trait]
impl AiCapability for GeminiCapability {
    async fn classify_input(&self, text: &str, model: &str) -> AiResult<ClassifiedInput> {
        let prompt = format!(
            "Process this input and separate it into tasks, journal narrative, and mood. \
             Respond with a JSON object {{\"tasks\": [string], \"journal_content\": string|null, \
             \"mood\": string|null}}. Input: \"{text}\""
        );
        let body = self.generate(model, &prompt, true).await?;
        serde_json::from_str(&body).map_err(|e| AiError::Malformed(e.to_string()))
    }

    async fn extract_tasks(
        &self,
        journal_text: &str,
        model: &str,
    ) -> AiResult<Vec<ExtractedTask>> {
        let prompt = format!(
            "Extract actionable tasks from this journal entry with priority. Respond with a \
             JSON object {{\"tasks\": [{{\"text\": string, \"priority\": \"high\"|\"medium\"|\"low\"}}]}}. \
             Entry: \"{journal_text}\""
        );
        let body = self.generate(model, &prompt, true).await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| AiError::Malformed(e.to_string()))?;
        let items = value
            .get("tasks")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(items
            .iter()
            .filter_map(|item| {
                let text = item.get("text")?.as_str()?.to_string();
                let priority = item
                    .get("priority")
                    .and_then(Value::as_str)
                    .map(Priority::parse_lenient)
                    .unwrap_or_default();
                Some(ExtractedTask { text, priority })
            })
            .collect())
    }

    async fn breakdown_task(&self, task_text: &str, model: &str) -> AiResult<Vec<String>> {
        let prompt = format!(
            "Break down this task into steps. Respond with a JSON array of step strings. \
             Task: \"{task_text}\""
        );
        let body = self.generate(model, &prompt, true).await?;
        serde_json::from_str(&body).map_err(|e| AiError::Malformed(e.to_string()))
    }

    async fn generate_insight(&self, entry_text: &str, model: &str) -> AiResult<String> {
        let prompt = format!("Provide one reflective sentence for this entry: \"{entry_text}\"");
        self.generate(model, &prompt, false).await
    }

    async fn edit_text(&self, text: &str, mode: EditMode, model: &str) -> AiResult<String> {
        let prompt = format!("{} \"{text}\"", mode.prompt());
        let rewritten = self.generate(model, &prompt, false).await?;
        // An empty rewrite is useless; hand back the original.
        if rewritten.trim().is_empty() {
            Ok(text.to_string())
        } else {
            Ok(rewritten)
        }
    }

    async fn generate_cover_image(&self, prompt: &str) -> AiResult<Option<String>> {
        let full_prompt =
            format!("Minimalist, soothing cover image for theme: {prompt}. No text.");
        let value = self.generate_raw(IMAGE_MODEL, &full_prompt, false).await?;
        Ok(first_inline_image(&value))
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_text_part_reads_generate_content_shape() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hello" }] }
            }]
        });
        assert_eq!(first_text_part(&value), Some("hello"));
        assert_eq!(first_text_part(&json!({})), None);
    }

    #[test]
    fn first_inline_image_builds_data_uri() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "caption" },
                    { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
                ] }
            }]
        });
        assert_eq!(
            first_inline_image(&value).as_deref(),
            Some("data:image/png;base64,QUJD")
        );
        assert_eq!(first_inline_image(&json!({"candidates": []})), None);
    }
}
