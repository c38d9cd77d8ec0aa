//! Settings operations and lenient decoding of the persisted document.

use super::Store;
use crate::subscriptions::MutationKind;
use crate::types::AppSettings;
use anyhow::Result;
use serde_json::Value;
use tracing::warn;

impl Store {
    /// Current settings snapshot.
    pub fn settings(&self) -> AppSettings {
        self.read(|inner| inner.settings.clone())
    }

    /// Replace the settings wholesale.
    pub fn update_settings(&self, settings: AppSettings) -> Result<()> {
        self.mutate(MutationKind::SettingsChanged, move |inner| {
            let changed = inner.settings != settings;
            inner.settings = settings;
            ((), changed)
        })
    }
}

/// Decode the persisted settings document field by field. Unrecognized
/// values fall back to the default for that field instead of failing the
/// load; users keep the rest of their settings when one value goes stale.
pub(crate) fn decode_lenient(raw: &str) -> AppSettings {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Corrupt settings document, using defaults");
            return AppSettings::default();
        }
    };
    let defaults = AppSettings::default();
    AppSettings {
        theme: field_or(&value, "theme", defaults.theme),
        completion_animation: field_or(&value, "completion_animation", defaults.completion_animation),
        delete_animation: field_or(&value, "delete_animation", defaults.delete_animation),
        model: value
            .get("model")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.model),
    }
}

fn field_or<T: serde::de::DeserializeOwned>(value: &Value, key: &str, default: T) -> T {
    match value.get(key) {
        Some(v) => match serde_json::from_value(v.clone()) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(field = key, value = %v, "Unrecognized settings value, using default");
                default
            }
        },
        None => default,
    }
}
