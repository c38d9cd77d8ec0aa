//! Error taxonomy for the AI capability boundary.
//!
//! Store and persistence plumbing uses `anyhow::Result`; the capability
//! boundary has its own typed error so the coordinator can tell the one
//! failure class that must surface (credential) apart from the ones that
//! degrade to a neutral result.

use thiserror::Error;

/// Failure of a single AI capability call.
#[derive(Debug, Error)]
pub enum AiError {
    /// Network, quota, or timeout trouble. Recovered locally as an
    /// empty/neutral result; the triggering entity keeps its prior state.
    #[error("AI call failed: {0}")]
    Transient(String),

    /// The supplied credential was rejected. The only AI failure that must
    /// reach the user; blocks further enrichment until resolved.
    #[error("credential rejected: {0}")]
    Credential(String),

    /// The model answered, but the structured payload did not parse.
    /// Treated identically to a transient failure.
    #[error("malformed AI response: {0}")]
    Malformed(String),
}

impl AiError {
    /// Whether this failure must surface to the user rather than degrade.
    pub fn is_credential(&self) -> bool {
        matches!(self, AiError::Credential(_))
    }
}

/// Result type for AI capability calls.
pub type AiResult<T> = std::result::Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_the_only_surfaced_class() {
        assert!(AiError::Credential("401".into()).is_credential());
        assert!(!AiError::Transient("timeout".into()).is_credential());
        assert!(!AiError::Malformed("not json".into()).is_credential());
    }
}
