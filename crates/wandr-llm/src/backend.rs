//! Backend Selection
//!
//! Enum for selecting the text-generation provider used for narration.

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Environment variable that selects the backend
pub const BACKEND_ENV: &str = "WANDR_LLM_BACKEND";

/// LLM backend provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentBackend {
    /// Anthropic Claude (default)
    #[default]
    Anthropic,
    /// OpenAI GPT
    OpenAi,
    /// Generation switched off
    Disabled,
}

impl AgentBackend {
    /// Read the backend from `WANDR_LLM_BACKEND`, defaulting to Anthropic
    pub fn from_env() -> Result<Self> {
        match std::env::var(BACKEND_ENV) {
            Ok(value) => value
                .parse()
                .map_err(|e: ParseBackendError| anyhow!("{}", e)),
            Err(_) => Ok(AgentBackend::default()),
        }
    }

    /// Environment variable holding the API key for this backend
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            AgentBackend::Anthropic => Some("ANTHROPIC_API_KEY"),
            AgentBackend::OpenAi => Some("OPENAI_API_KEY"),
            AgentBackend::Disabled => None,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            AgentBackend::Anthropic => "Anthropic",
            AgentBackend::OpenAi => "OpenAI",
            AgentBackend::Disabled => "disabled",
        }
    }
}

/// Error type for parsing AgentBackend
#[derive(Debug)]
pub struct ParseBackendError(String);

impl std::fmt::Display for ParseBackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseBackendError {}

impl FromStr for AgentBackend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(AgentBackend::Anthropic),
            "openai" | "gpt" => Ok(AgentBackend::OpenAi),
            "none" | "off" | "disabled" => Ok(AgentBackend::Disabled),
            other => Err(ParseBackendError(format!(
                "Unknown {} '{}'. Valid values: anthropic, openai, none",
                BACKEND_ENV, other
            ))),
        }
    }
}

impl std::fmt::Display for AgentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "claude".parse::<AgentBackend>().unwrap(),
            AgentBackend::Anthropic
        );
        assert_eq!(
            " OpenAI ".parse::<AgentBackend>().unwrap(),
            AgentBackend::OpenAi
        );
        assert_eq!(
            "none".parse::<AgentBackend>().unwrap(),
            AgentBackend::Disabled
        );
        assert!("mistral".parse::<AgentBackend>().is_err());
    }

    #[test]
    fn test_api_key_var() {
        assert_eq!(
            AgentBackend::Anthropic.api_key_var(),
            Some("ANTHROPIC_API_KEY")
        );
        assert_eq!(AgentBackend::Disabled.api_key_var(), None);
    }
}
