//! Error handling for the itinerary pipeline
//!
//! Only two conditions end a plan stream early: validation conflicts and
//! unexpected stage failures. Provider failures are contained at their call
//! site and surface as diagnostics inside the result instead.

use thiserror::Error;

/// Pipeline-level error taxonomy
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The request contradicts itself; halts before research
    #[error("Validation issues: {}", .conflicts.join(", "))]
    ValidationConflict { conflicts: Vec<String> },

    /// A single capability call failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any stage failure outside the taxonomy above
    #[error("{stage} failed: {message}")]
    UnexpectedStage { stage: String, message: String },

    /// Saving the final record failed (after the core finished)
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PlannerError {
    pub fn unexpected(stage: impl Into<String>, message: impl Into<String>) -> Self {
        PlannerError::UnexpectedStage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Whether this error terminates a plan stream
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlannerError::ValidationConflict { .. } | PlannerError::UnexpectedStage { .. }
        )
    }
}

/// Failures of external capabilities (search, geocode, social, generation)
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {provider}: {message}")]
    Malformed { provider: String, message: String },

    #[error("{provider} timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    #[error("{0} is not configured")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Malformed {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ProviderError {
    fn from(error: anyhow::Error) -> Self {
        ProviderError::Other(format!("{:#}", error))
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid plan id '{0}'")]
    InvalidId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_lists_every_conflict() {
        let error = PlannerError::ValidationConflict {
            conflicts: vec!["a".into(), "b".into()],
        };
        assert_eq!(error.to_string(), "Validation issues: a, b");
        assert!(error.is_fatal());
    }

    #[test]
    fn test_provider_errors_are_not_fatal() {
        let error = PlannerError::from(ProviderError::Unavailable("Place search".into()));
        assert!(!error.is_fatal());
        assert_eq!(error.to_string(), "Provider error: Place search is not configured");
    }
}
